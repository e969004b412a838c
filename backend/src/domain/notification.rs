//! Broadcast notification aggregate.
//!
//! Notifications are written by administrators and relayed best-effort to
//! a push-messaging topic. The push outcome is tracked on the record
//! itself (`push_status`) so delivery failures stay observable instead of
//! vanishing into a log line.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Validation errors raised by notification value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationValidationError {
    /// The identifier string was not a well-formed UUID.
    InvalidId,
    /// The title was blank.
    EmptyTitle,
    /// The content was blank.
    EmptyContent,
}

impl fmt::Display for NotificationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "notification id must be a valid UUID"),
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::EmptyContent => write!(f, "content must not be empty"),
        }
    }
}

impl std::error::Error for NotificationValidationError {}

/// Stable notification identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NotificationId(Uuid);

impl NotificationId {
    /// Validate and construct a [`NotificationId`] from string input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, NotificationValidationError> {
        let parsed =
            Uuid::parse_str(id.as_ref()).map_err(|_| NotificationValidationError::InvalidId)?;
        Ok(Self(parsed))
    }

    /// Generate a new random [`NotificationId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an already-parsed UUID.
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<NotificationId> for String {
    fn from(value: NotificationId) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for NotificationId {
    type Error = NotificationValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Delivery status of the best-effort push broadcast for a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum PushStatus {
    /// The record is stored but the push attempt has not completed yet.
    Pending,
    /// The push gateway accepted the broadcast.
    Sent,
    /// The push attempt failed; the record itself is unaffected.
    Failed,
}

impl PushStatus {
    /// Stable storage form of the status.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Sent => "Sent",
            Self::Failed => "Failed",
        }
    }

    /// Parse a status from its storage form.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "Pending" => Some(Self::Pending),
            "Sent" => Some(Self::Sent),
            "Failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

impl fmt::Display for PushStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Announcement broadcast to every portal user.
///
/// ## Invariants
/// - `title` and `content` are non-blank once trimmed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Stable identifier.
    #[schema(value_type = String, example = "8f7d8a10-1b34-4c61-9f3e-52a4c9be0d77")]
    id: NotificationId,
    /// Headline shown in notification lists and push banners.
    title: String,
    /// Body text.
    content: String,
    /// Push broadcast delivery status.
    push_status: PushStatus,
    /// Creation timestamp.
    created_at: DateTime<Utc>,
}

impl Notification {
    /// Validate and create a new notification. Push status starts
    /// `Pending` until the broadcast attempt resolves.
    pub fn publish(
        title: impl Into<String>,
        content: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, NotificationValidationError> {
        let title = title.into();
        let content = content.into();
        if title.trim().is_empty() {
            return Err(NotificationValidationError::EmptyTitle);
        }
        if content.trim().is_empty() {
            return Err(NotificationValidationError::EmptyContent);
        }
        Ok(Self {
            id: NotificationId::random(),
            title,
            content,
            push_status: PushStatus::Pending,
            created_at,
        })
    }

    /// Rehydrate a notification from storage.
    pub fn restore(
        id: NotificationId,
        title: String,
        content: String,
        push_status: PushStatus,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title,
            content,
            push_status,
            created_at,
        }
    }

    /// Stable identifier.
    pub const fn id(&self) -> &NotificationId {
        &self.id
    }

    /// Headline text.
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Body text.
    pub fn content(&self) -> &str {
        self.content.as_str()
    }

    /// Push broadcast delivery status.
    pub const fn push_status(&self) -> PushStatus {
        self.push_status
    }

    /// Creation timestamp.
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Record the outcome of the push broadcast attempt.
    pub fn record_push_outcome(&mut self, status: PushStatus) {
        self.push_status = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "body", NotificationValidationError::EmptyTitle)]
    #[case("   ", "body", NotificationValidationError::EmptyTitle)]
    #[case("title", "", NotificationValidationError::EmptyContent)]
    #[case("title", "  ", NotificationValidationError::EmptyContent)]
    fn publish_rejects_blank_fields(
        #[case] title: &str,
        #[case] content: &str,
        #[case] expected: NotificationValidationError,
    ) {
        assert_eq!(Notification::publish(title, content, Utc::now()), Err(expected));
    }

    #[test]
    fn published_notifications_start_with_pending_push() {
        let notification =
            Notification::publish("Office closure", "Closed on Friday", Utc::now())
                .expect("valid notification");
        assert_eq!(notification.push_status(), PushStatus::Pending);
    }

    #[test]
    fn push_outcome_is_recorded() {
        let mut notification =
            Notification::publish("Office closure", "Closed on Friday", Utc::now())
                .expect("valid notification");
        notification.record_push_outcome(PushStatus::Failed);
        assert_eq!(notification.push_status(), PushStatus::Failed);
    }

    #[test]
    fn push_status_round_trips_through_storage_form() {
        for status in [PushStatus::Pending, PushStatus::Sent, PushStatus::Failed] {
            assert_eq!(PushStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(PushStatus::parse("Queued"), None);
    }
}
