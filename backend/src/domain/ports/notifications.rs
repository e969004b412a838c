//! Driving ports for notification broadcast and listing.

use async_trait::async_trait;

use crate::domain::notification::{Notification, NotificationId};
use crate::domain::Error;

/// Domain use-case port for notification mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationsCommand: Send + Sync {
    /// Persist a notification, then best-effort broadcast it to the push
    /// topic. The returned record's push status reflects the attempt;
    /// push failure is never an error.
    async fn publish(&self, title: String, content: String) -> Result<Notification, Error>;

    /// Remove a notification unconditionally.
    async fn delete(&self, id: NotificationId) -> Result<(), Error>;
}

/// Domain use-case port for notification reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationsQuery: Send + Sync {
    /// Every notification, newest first.
    async fn list(&self) -> Result<Vec<Notification>, Error>;
}
