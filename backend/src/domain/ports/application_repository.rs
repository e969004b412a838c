//! Driven port for application persistence adapters.

use async_trait::async_trait;

use crate::domain::application::{Application, ApplicationId, Decision};
use crate::domain::user::UserId;

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by application repository adapters.
    pub enum ApplicationPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "application repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "application repository query failed: {message}",
    }
}

/// Port abstraction over durable application storage.
///
/// `list` returns applications newest first (creation time descending);
/// the ordering is part of the port contract so callers never re-sort.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Persist a new application record.
    async fn insert(&self, application: &Application) -> Result<(), ApplicationPersistenceError>;

    /// Fetch an application by identifier.
    async fn find_by_id(
        &self,
        id: &ApplicationId,
    ) -> Result<Option<Application>, ApplicationPersistenceError>;

    /// Return applications newest first, optionally restricted to one
    /// submitting user.
    async fn list(
        &self,
        submitted_by: Option<UserId>,
    ) -> Result<Vec<Application>, ApplicationPersistenceError>;

    /// Persist a decision, returning the updated record or `None` when no
    /// record matches. Last writer wins on concurrent updates.
    async fn apply_decision(
        &self,
        id: &ApplicationId,
        decision: Decision,
    ) -> Result<Option<Application>, ApplicationPersistenceError>;
}
