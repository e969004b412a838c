//! Driving ports for the application lifecycle.
//!
//! Inbound adapters submit, list, and decide applications through these
//! traits without importing persistence concerns.

use async_trait::async_trait;

use crate::domain::application::{Application, ApplicationForm, ApplicationId, Decision};
use crate::domain::user::UserId;
use crate::domain::Error;

/// Validated request to submit a new application.
#[derive(Debug, Clone)]
pub struct SubmitApplication {
    /// The validated form fields.
    pub form: ApplicationForm,
    /// The submitting user, when known. A weak reference; existence is
    /// not checked and anonymous submissions are accepted.
    pub submitted_by: Option<UserId>,
}

/// Validated request to decide a pending application.
#[derive(Debug, Clone, Copy)]
pub struct DecideApplication {
    /// The application to decide.
    pub application_id: ApplicationId,
    /// The administrator's decision.
    pub decision: Decision,
}

/// Domain use-case port for application mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApplicationsCommand: Send + Sync {
    /// Persist a new application with `Pending` status and return the
    /// stored record, including its generated identifier.
    async fn submit(&self, request: SubmitApplication) -> Result<Application, Error>;

    /// Apply an administrator decision and return the updated record.
    async fn decide(&self, request: DecideApplication) -> Result<Application, Error>;
}

/// Domain use-case port for application reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApplicationsQuery: Send + Sync {
    /// List applications newest first, optionally restricted to one
    /// submitting user.
    async fn list(&self, submitted_by: Option<UserId>) -> Result<Vec<Application>, Error>;
}
