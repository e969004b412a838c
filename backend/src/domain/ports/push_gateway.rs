//! Driven port for the push-messaging broadcast gateway.
//!
//! Delivery is best-effort by design: the notification service records
//! the outcome on the notification record and never propagates gateway
//! failures to the caller.

use async_trait::async_trait;

use crate::domain::notification::NotificationId;

use super::define_port_error;

define_port_error! {
    /// Failures raised by push gateway adapters.
    pub enum PushGatewayError {
        /// No gateway is configured for this deployment.
        Unconfigured { message: String } => "push gateway unconfigured: {message}",
        /// The gateway could not be reached.
        Transport { message: String } => "push gateway transport failed: {message}",
        /// The gateway reached the provider but the broadcast was refused.
        Rejected { message: String } => "push broadcast rejected: {message}",
    }
}

/// Message fanned out to every device subscribed to the broadcast topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushBroadcast {
    /// Banner headline.
    pub title: String,
    /// Banner body text.
    pub body: String,
    /// Identifier of the stored notification, carried as metadata so
    /// clients can deep-link to the record.
    pub notification_id: NotificationId,
}

/// Port abstraction over the push-messaging provider.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PushGateway: Send + Sync {
    /// Fan the message out to the broadcast topic.
    async fn broadcast(&self, message: &PushBroadcast) -> Result<(), PushGatewayError>;
}

/// Gateway used when no push provider is configured. Always reports
/// [`PushGatewayError::Unconfigured`] so records show `Failed` delivery
/// rather than a silent fake success.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPushGateway;

#[async_trait]
impl PushGateway for NoopPushGateway {
    async fn broadcast(&self, _message: &PushBroadcast) -> Result<(), PushGatewayError> {
        Err(PushGatewayError::unconfigured(
            "no push provider configured for this deployment",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn noop_gateway_reports_unconfigured() {
        let gateway = NoopPushGateway;
        let message = PushBroadcast {
            title: "Office closure".to_owned(),
            body: "Closed on Friday".to_owned(),
            notification_id: NotificationId::random(),
        };

        let error = gateway.broadcast(&message).await.expect_err("unconfigured");
        assert!(matches!(error, PushGatewayError::Unconfigured { .. }));
    }
}
