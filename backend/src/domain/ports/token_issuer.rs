//! Driven port for bearer-token issuance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::define_port_error;

define_port_error! {
    /// Failures raised by token issuer adapters.
    pub enum TokenError {
        /// The token could not be signed.
        Issue { message: String } => "token issuance failed: {message}",
    }
}

/// Role embedded in issued tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TokenRole {
    /// A verified citizen account.
    Citizen,
    /// The portal administrator.
    Admin,
}

/// Claims the caller wants embedded in a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    /// Token subject: user id for citizens, the admin username for admins.
    pub subject: String,
    /// Email address, when the subject has one.
    pub email: Option<String>,
    /// Role of the subject.
    pub role: TokenRole,
}

/// A signed bearer token with its expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    /// Compact encoded token for the `Authorization: Bearer` header.
    pub token: String,
    /// Instant after which the token is no longer valid.
    pub expires_at: DateTime<Utc>,
}

/// Port abstraction over token signing.
#[cfg_attr(test, mockall::automock)]
pub trait TokenIssuer: Send + Sync {
    /// Sign a token for the supplied claims.
    fn issue(&self, claims: &TokenClaims) -> Result<IssuedToken, TokenError>;
}
