//! Process configuration parsed from flags and environment variables.
//!
//! Everything is constructed once in `main` and injected into the
//! services; there is no module-level configuration state.

use std::net::SocketAddr;

use clap::Parser;
use url::Url;

use crate::domain::application::DecisionPolicy;
use crate::outbound::push::DEFAULT_BROADCAST_TOPIC;

/// Runtime configuration for the portal backend.
#[derive(Debug, Clone, Parser)]
#[command(name = "sewa-backend", about = "Citizen service portal backend")]
pub struct AppConfig {
    /// Socket address the HTTP server binds to.
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8080")]
    pub bind_addr: SocketAddr,

    /// PostgreSQL connection URL. When absent the server runs on the
    /// in-memory store (data is lost at shutdown).
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Shared secret for signing bearer tokens. When absent a random
    /// per-process secret is generated and a warning is logged.
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: Option<String>,

    /// Bearer token lifetime in days.
    #[arg(long, env = "TOKEN_TTL_DAYS", default_value_t = 7)]
    pub token_ttl_days: i64,

    /// Administrator login name.
    #[arg(long, env = "ADMIN_USERNAME", default_value = "admin")]
    pub admin_username: String,

    /// Administrator password. When absent admin login is effectively
    /// disabled (an unguessable password is generated).
    #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
    pub admin_password: Option<String>,

    /// Allow administrators to re-decide an already-decided application.
    /// Off by default: a second decision is a 409 conflict.
    #[arg(long, env = "ALLOW_STATUS_OVERRIDE", default_value_t = false)]
    pub allow_status_override: bool,

    /// Push provider `messages:send` endpoint. When absent broadcasts are
    /// recorded as failed deliveries.
    #[arg(long, env = "FCM_ENDPOINT")]
    pub push_endpoint: Option<Url>,

    /// Broadcast topic all client devices subscribe to.
    #[arg(long, env = "FCM_DEFAULT_TOPIC", default_value = DEFAULT_BROADCAST_TOPIC)]
    pub push_topic: String,

    /// Bearer credential for the push provider.
    #[arg(long, env = "FCM_AUTH_TOKEN", hide_env_values = true)]
    pub push_token: Option<String>,
}

impl AppConfig {
    /// Decision policy selected by the override flag.
    pub const fn decision_policy(&self) -> DecisionPolicy {
        if self.allow_status_override {
            DecisionPolicy::AllowOverride
        } else {
            DecisionPolicy::PendingOnly
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> AppConfig {
        AppConfig::try_parse_from(std::iter::once("sewa-backend").chain(args.iter().copied()))
            .expect("config parses")
    }

    #[test]
    fn defaults_bind_to_8080_without_a_database() {
        let config = parse(&[]);
        assert_eq!(config.bind_addr.port(), 8080);
        assert!(config.database_url.is_none());
        assert_eq!(config.push_topic, DEFAULT_BROADCAST_TOPIC);
        assert!(!config.allow_status_override);
    }

    #[test]
    fn override_flag_selects_the_relaxed_policy() {
        let config = parse(&["--allow-status-override"]);
        assert_eq!(config.decision_policy(), DecisionPolicy::AllowOverride);
    }

    #[test]
    fn default_policy_guards_decided_applications() {
        let config = parse(&[]);
        assert_eq!(config.decision_policy(), DecisionPolicy::PendingOnly);
    }
}
