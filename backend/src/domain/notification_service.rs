//! Notification broadcast domain service.
//!
//! The database write is the success signal. The push broadcast is a
//! best-effort side channel: its outcome is recorded on the notification
//! record and logged, but a push failure never fails the request.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::warn;

use crate::domain::notification::{Notification, NotificationId, PushStatus};
use crate::domain::ports::{
    NotificationPersistenceError, NotificationRepository, NotificationsCommand,
    NotificationsQuery, PushBroadcast, PushGateway,
};
use crate::domain::Error;

/// Notification service implementing the notification driving ports.
///
/// The gateway parameter accepts trait objects so deployments can pick
/// the adapter at runtime.
#[derive(Clone)]
pub struct NotificationService<R, P: ?Sized> {
    repo: Arc<R>,
    push: Arc<P>,
}

impl<R, P: ?Sized> NotificationService<R, P> {
    /// Create a new service over the given repository and push gateway.
    pub fn new(repo: Arc<R>, push: Arc<P>) -> Self {
        Self { repo, push }
    }
}

fn map_persistence_error(error: NotificationPersistenceError) -> Error {
    match error {
        NotificationPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("notification repository unavailable: {message}"))
        }
        NotificationPersistenceError::Query { message } => {
            Error::internal(format!("notification repository error: {message}"))
        }
    }
}

impl<R, P> NotificationService<R, P>
where
    R: NotificationRepository,
    P: PushGateway + ?Sized,
{
    /// Broadcast the stored notification and record the outcome. Every
    /// failure path degrades to a log line plus a `Failed` marker.
    async fn broadcast_and_record(&self, notification: &mut Notification) {
        let message = PushBroadcast {
            title: notification.title().to_owned(),
            body: notification.content().to_owned(),
            notification_id: *notification.id(),
        };

        let outcome = match self.push.broadcast(&message).await {
            Ok(()) => PushStatus::Sent,
            Err(error) => {
                warn!(
                    notification_id = %notification.id(),
                    %error,
                    "push broadcast failed; notification stored without delivery"
                );
                PushStatus::Failed
            }
        };

        if let Err(error) = self
            .repo
            .set_push_status(notification.id(), outcome)
            .await
        {
            warn!(
                notification_id = %notification.id(),
                %error,
                "failed to record push outcome"
            );
        }
        notification.record_push_outcome(outcome);
    }
}

#[async_trait]
impl<R, P> NotificationsCommand for NotificationService<R, P>
where
    R: NotificationRepository,
    P: PushGateway + ?Sized,
{
    async fn publish(&self, title: String, content: String) -> Result<Notification, Error> {
        let mut notification = Notification::publish(title, content, Utc::now())
            .map_err(|error| Error::invalid_request(error.to_string()))?;

        self.repo
            .insert(&notification)
            .await
            .map_err(map_persistence_error)?;

        self.broadcast_and_record(&mut notification).await;
        Ok(notification)
    }

    async fn delete(&self, id: NotificationId) -> Result<(), Error> {
        let removed = self.repo.delete(&id).await.map_err(map_persistence_error)?;
        if removed {
            Ok(())
        } else {
            Err(Error::not_found("Notification not found"))
        }
    }
}

#[async_trait]
impl<R, P> NotificationsQuery for NotificationService<R, P>
where
    R: NotificationRepository,
    P: PushGateway + ?Sized,
{
    async fn list(&self) -> Result<Vec<Notification>, Error> {
        self.repo.list().await.map_err(map_persistence_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        MockNotificationRepository, MockPushGateway, PushGatewayError,
    };
    use crate::domain::ErrorCode;

    fn make_service(
        repo: MockNotificationRepository,
        push: MockPushGateway,
    ) -> NotificationService<MockNotificationRepository, MockPushGateway> {
        NotificationService::new(Arc::new(repo), Arc::new(push))
    }

    #[tokio::test]
    async fn publish_stores_then_broadcasts_and_marks_sent() {
        let mut repo = MockNotificationRepository::new();
        repo.expect_insert().times(1).return_once(|_| Ok(()));
        repo.expect_set_push_status()
            .withf(|_, status| *status == PushStatus::Sent)
            .times(1)
            .return_once(|_, _| Ok(()));

        let mut push = MockPushGateway::new();
        push.expect_broadcast()
            .withf(|message: &PushBroadcast| {
                message.title == "Office closure" && message.body == "Closed on Friday"
            })
            .times(1)
            .return_once(|_| Ok(()));

        let service = make_service(repo, push);
        let stored = service
            .publish("Office closure".to_owned(), "Closed on Friday".to_owned())
            .await
            .expect("publish succeeds");
        assert_eq!(stored.push_status(), PushStatus::Sent);
    }

    #[tokio::test]
    async fn publish_succeeds_even_when_the_gateway_is_unreachable() {
        let mut repo = MockNotificationRepository::new();
        repo.expect_insert().times(1).return_once(|_| Ok(()));
        repo.expect_set_push_status()
            .withf(|_, status| *status == PushStatus::Failed)
            .times(1)
            .return_once(|_, _| Ok(()));

        let mut push = MockPushGateway::new();
        push.expect_broadcast()
            .times(1)
            .return_once(|_| Err(PushGatewayError::transport("connection reset")));

        let service = make_service(repo, push);
        let stored = service
            .publish("Office closure".to_owned(), "Closed on Friday".to_owned())
            .await
            .expect("publish still succeeds");
        assert_eq!(stored.push_status(), PushStatus::Failed);
    }

    #[tokio::test]
    async fn publish_rejects_blank_titles_without_writing() {
        let mut repo = MockNotificationRepository::new();
        repo.expect_insert().times(0);

        let service = make_service(repo, MockPushGateway::new());
        let error = service
            .publish("  ".to_owned(), "body".to_owned())
            .await
            .expect_err("invalid");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn delete_missing_notification_is_not_found() {
        let mut repo = MockNotificationRepository::new();
        repo.expect_delete().times(1).return_once(|_| Ok(false));

        let service = make_service(repo, MockPushGateway::new());
        let error = service
            .delete(NotificationId::random())
            .await
            .expect_err("missing");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn delete_existing_notification_succeeds() {
        let mut repo = MockNotificationRepository::new();
        repo.expect_delete().times(1).return_once(|_| Ok(true));

        let service = make_service(repo, MockPushGateway::new());
        service
            .delete(NotificationId::random())
            .await
            .expect("delete succeeds");
    }
}
