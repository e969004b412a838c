//! Reqwest-backed push gateway adapter.
//!
//! Owns transport details only: payload serialisation, timeout and HTTP
//! error mapping. The payload follows the FCM HTTP v1 `messages:send`
//! shape: a notification block plus a data map carrying the stored
//! record's identifier, addressed to a broadcast topic.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;

use crate::domain::ports::{PushBroadcast, PushGateway, PushGatewayError};

const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 10;

/// Default broadcast topic every client device subscribes to.
pub const DEFAULT_BROADCAST_TOPIC: &str = "all_users";

#[derive(Debug, Serialize)]
struct MessageEnvelopeDto<'a> {
    message: MessageDto<'a>,
}

#[derive(Debug, Serialize)]
struct MessageDto<'a> {
    topic: &'a str,
    notification: NotificationDto<'a>,
    data: DataDto<'a>,
}

#[derive(Debug, Serialize)]
struct NotificationDto<'a> {
    title: &'a str,
    body: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DataDto<'a> {
    notification_id: &'a str,
}

/// Push gateway adapter performing HTTP POST requests against one
/// provider endpoint.
pub struct FcmHttpGateway {
    client: Client,
    endpoint: Url,
    topic: String,
    bearer_token: String,
}

impl FcmHttpGateway {
    /// Build an adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        topic: impl Into<String>,
        bearer_token: impl Into<String>,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECONDS))
            .build()?;
        Ok(Self {
            client,
            endpoint,
            topic: topic.into(),
            bearer_token: bearer_token.into(),
        })
    }
}

fn map_transport_error(error: reqwest::Error) -> PushGatewayError {
    PushGatewayError::transport(error.to_string())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> PushGatewayError {
    let preview = body_preview(body);
    let message = if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), preview)
    };

    if status.is_client_error() {
        PushGatewayError::rejected(message)
    } else {
        PushGatewayError::transport(message)
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[async_trait]
impl PushGateway for FcmHttpGateway {
    async fn broadcast(&self, message: &PushBroadcast) -> Result<(), PushGatewayError> {
        let notification_id = message.notification_id.to_string();
        let payload = MessageEnvelopeDto {
            message: MessageDto {
                topic: self.topic.as_str(),
                notification: NotificationDto {
                    title: message.title.as_str(),
                    body: message.body.as_str(),
                },
                data: DataDto {
                    notification_id: notification_id.as_str(),
                },
            },
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.bearer_token)
            .json(&payload)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.bytes().await.map_err(map_transport_error)?;
        Err(map_status_error(status, body.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the non-network mapping helpers.
    use super::*;
    use crate::domain::notification::NotificationId;
    use rstest::rstest;

    #[rstest]
    #[case(StatusCode::BAD_REQUEST, true)]
    #[case(StatusCode::UNAUTHORIZED, true)]
    #[case(StatusCode::INTERNAL_SERVER_ERROR, false)]
    #[case(StatusCode::BAD_GATEWAY, false)]
    fn statuses_map_to_rejected_or_transport(#[case] status: StatusCode, #[case] rejected: bool) {
        let error = map_status_error(status, b"{\"error\":\"nope\"}");
        if rejected {
            assert!(matches!(error, PushGatewayError::Rejected { .. }));
        } else {
            assert!(matches!(error, PushGatewayError::Transport { .. }));
        }
    }

    #[test]
    fn payload_matches_the_provider_shape() {
        let id = NotificationId::random();
        let id_string = id.to_string();
        let payload = MessageEnvelopeDto {
            message: MessageDto {
                topic: DEFAULT_BROADCAST_TOPIC,
                notification: NotificationDto {
                    title: "Office closure",
                    body: "Closed on Friday",
                },
                data: DataDto {
                    notification_id: id_string.as_str(),
                },
            },
        };

        let encoded = serde_json::to_value(&payload).expect("payload encodes");
        assert_eq!(encoded["message"]["topic"], "all_users");
        assert_eq!(encoded["message"]["notification"]["title"], "Office closure");
        assert_eq!(encoded["message"]["data"]["notificationId"], id_string);
    }

    #[test]
    fn long_bodies_are_truncated_in_error_messages() {
        let body = "x".repeat(500);
        let error = map_status_error(StatusCode::INTERNAL_SERVER_ERROR, body.as_bytes());
        assert!(error.to_string().ends_with("..."));
    }
}
