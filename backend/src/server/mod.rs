//! HTTP server wiring: route table and port-bundle construction.

pub mod config;

use std::sync::Arc;

use actix_web::web;
use chrono::Duration;
use tracing::warn;
use uuid::Uuid;

use crate::domain::ports::NoopPushGateway;
use crate::domain::{AccountService, AdminCredentials, ApplicationService, NotificationService};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{accounts, applications, health, notifications, summary};
use crate::outbound::auth::{BcryptPasswordHasher, JwtTokenIssuer};
use crate::outbound::memory::{
    InMemoryApplicationRepository, InMemoryNotificationRepository, InMemoryUserRepository,
};
use crate::outbound::persistence::{
    DbPool, DieselApplicationRepository, DieselNotificationRepository, DieselUserRepository,
};
use crate::outbound::push::FcmHttpGateway;

pub use config::AppConfig;

/// Register every REST endpoint on the service config.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(applications::submit_application)
        .service(applications::list_applications)
        .service(applications::decide_application)
        .service(accounts::sign_up)
        .service(accounts::login)
        .service(accounts::admin_login)
        .service(accounts::list_users)
        .service(accounts::approve_user)
        .service(notifications::publish_notification)
        .service(notifications::list_notifications)
        .service(notifications::delete_notification)
        .service(summary::dashboard_summary)
        .service(health::status)
        .service(health::ready)
        .service(health::live);
}

fn admin_credentials(config: &AppConfig) -> AdminCredentials {
    let password = config.admin_password.clone().unwrap_or_else(|| {
        warn!("ADMIN_PASSWORD is not set; admin login is disabled for this process");
        Uuid::new_v4().to_string()
    });
    AdminCredentials {
        username: config.admin_username.clone(),
        password,
    }
}

fn token_issuer(config: &AppConfig) -> Arc<JwtTokenIssuer> {
    let secret = config.jwt_secret.clone().unwrap_or_else(|| {
        warn!("JWT_SECRET is not set; using a random per-process secret");
        Uuid::new_v4().to_string()
    });
    Arc::new(JwtTokenIssuer::new(
        &secret,
        Duration::days(config.token_ttl_days),
    ))
}

fn push_gateway(config: &AppConfig) -> Arc<dyn crate::domain::ports::PushGateway> {
    match (&config.push_endpoint, &config.push_token) {
        (Some(endpoint), Some(token)) => {
            match FcmHttpGateway::new(endpoint.clone(), config.push_topic.clone(), token.clone()) {
                Ok(gateway) => Arc::new(gateway),
                Err(error) => {
                    warn!(%error, "push gateway construction failed; broadcasts disabled");
                    Arc::new(NoopPushGateway)
                }
            }
        }
        _ => {
            warn!("push provider not configured; broadcasts will be recorded as failed");
            Arc::new(NoopPushGateway)
        }
    }
}

/// Build the port bundle over PostgreSQL adapters.
pub fn postgres_state(config: &AppConfig, pool: DbPool) -> HttpState {
    let users = Arc::new(DieselUserRepository::new(pool.clone()));
    let applications_repo = Arc::new(DieselApplicationRepository::new(pool.clone()));
    let notifications_repo = Arc::new(DieselNotificationRepository::new(pool.clone()));

    let accounts_service = Arc::new(AccountService::new(
        users,
        Arc::new(BcryptPasswordHasher::new()),
        token_issuer(config),
        admin_credentials(config),
    ));
    let applications_service = Arc::new(ApplicationService::new(
        applications_repo,
        config.decision_policy(),
    ));
    let notifications_service = Arc::new(NotificationService::new(
        notifications_repo,
        push_gateway(config),
    ));

    HttpState {
        applications: applications_service.clone(),
        applications_query: applications_service,
        accounts: accounts_service.clone(),
        accounts_query: accounts_service.clone(),
        login: accounts_service,
        notifications: notifications_service.clone(),
        notifications_query: notifications_service,
        storage: Arc::new(pool),
    }
}

/// Build the port bundle over the in-memory adapters. Used when no
/// database URL is configured; all data is lost at shutdown.
pub fn memory_state(config: &AppConfig) -> HttpState {
    let accounts_service = Arc::new(AccountService::new(
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(BcryptPasswordHasher::new()),
        token_issuer(config),
        admin_credentials(config),
    ));
    let applications_service = Arc::new(ApplicationService::new(
        Arc::new(InMemoryApplicationRepository::new()),
        config.decision_policy(),
    ));
    let notifications_service = Arc::new(NotificationService::new(
        Arc::new(InMemoryNotificationRepository::new()),
        push_gateway(config),
    ));

    HttpState {
        applications: applications_service.clone(),
        applications_query: applications_service,
        accounts: accounts_service.clone(),
        accounts_query: accounts_service.clone(),
        login: accounts_service,
        notifications: notifications_service.clone(),
        notifications_query: notifications_service,
        storage: Arc::new(crate::domain::ports::AlwaysConnected),
    }
}
