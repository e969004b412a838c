//! Driving ports for account registration, login, and verification.

use async_trait::async_trait;

use crate::domain::user::{ContactNumber, Email, Gender, LoginHandle, UserId, UserProfile};
use crate::domain::Error;

use super::token_issuer::IssuedToken;

/// Validated signup details. Construction happens at the HTTP boundary,
/// which collects every field failure before anything reaches the domain.
#[derive(Debug, Clone)]
pub struct SignupDetails {
    /// Required first name.
    pub first_name: String,
    /// Optional middle name.
    pub middle_name: Option<String>,
    /// Required last name.
    pub last_name: String,
    /// Unique login handle.
    pub login_handle: LoginHandle,
    /// Unique email address.
    pub email: Email,
    /// Unique ten-digit contact number.
    pub contact_number: ContactNumber,
    /// Age in years, strictly positive.
    pub age: i32,
    /// Gender.
    pub gender: Gender,
    /// Plaintext password; hashed before it ever reaches storage.
    pub password: String,
}

/// Credential pair presented at login. The identifier matches either an
/// email address or a contact number.
#[derive(Debug, Clone)]
pub struct LoginAttempt {
    /// Email address or contact number.
    pub identifier: String,
    /// Plaintext password.
    pub password: String,
}

/// Successful login outcome: a bearer token plus the password-stripped
/// user record.
#[derive(Debug, Clone)]
pub struct AuthenticatedSession {
    /// Signed bearer token.
    pub token: IssuedToken,
    /// The authenticated user, password stripped.
    pub user: UserProfile,
}

/// Domain use-case port for account mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountsCommand: Send + Sync {
    /// Register a new, unverified user.
    async fn sign_up(&self, details: SignupDetails) -> Result<UserProfile, Error>;

    /// Mark a user verified. Idempotent: verifying an already-verified
    /// user succeeds and returns the unchanged record.
    async fn verify(&self, id: UserId) -> Result<UserProfile, Error>;
}

/// Domain use-case port for account reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountsQuery: Send + Sync {
    /// Every user, password stripped, ordered by creation time ascending.
    async fn list_users(&self) -> Result<Vec<UserProfile>, Error>;
}

/// Domain use-case port for credential-based session issuance.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Authenticate a citizen and issue a bearer token.
    async fn login(&self, attempt: LoginAttempt) -> Result<AuthenticatedSession, Error>;

    /// Authenticate the administrator and issue an admin-role token.
    async fn admin_login(&self, username: &str, password: &str) -> Result<IssuedToken, Error>;
}
