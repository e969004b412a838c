//! Driven port for notification persistence adapters.

use async_trait::async_trait;

use crate::domain::notification::{Notification, NotificationId, PushStatus};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by notification repository adapters.
    pub enum NotificationPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "notification repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "notification repository query failed: {message}",
    }
}

/// Port abstraction over durable notification storage.
///
/// `list` returns notifications newest first (creation time descending);
/// this is the one ordering guarantee the original system made explicit.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Persist a new notification record.
    async fn insert(&self, notification: &Notification)
        -> Result<(), NotificationPersistenceError>;

    /// Return every notification, newest first.
    async fn list(&self) -> Result<Vec<Notification>, NotificationPersistenceError>;

    /// Remove a notification, reporting whether a record was deleted.
    async fn delete(&self, id: &NotificationId) -> Result<bool, NotificationPersistenceError>;

    /// Record the outcome of the push broadcast for a notification.
    async fn set_push_status(
        &self,
        id: &NotificationId,
        status: PushStatus,
    ) -> Result<(), NotificationPersistenceError>;
}
