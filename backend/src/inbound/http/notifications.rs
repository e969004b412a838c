//! Notification broadcast API handlers.
//!
//! ```text
//! POST   /notifications  {"title":"Office closure","content":"..."}
//! GET    /notifications
//! DELETE /notifications?id=<uuid>
//! ```

use actix_web::{delete, get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::notification::{Notification, NotificationId};
use crate::domain::Error;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Request body for `POST /notifications`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct PublishNotificationRequest {
    /// Headline text.
    pub title: Option<String>,
    /// Body text.
    pub content: Option<String>,
}

/// Success envelope for `POST /notifications`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PublishNotificationResponse {
    /// Human-readable outcome.
    pub message: String,
    /// The stored record, including its push delivery status.
    pub notification: Notification,
}

/// Query parameters accepted by `DELETE /notifications`.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct DeleteNotificationParams {
    /// Identifier of the notification to remove.
    pub id: Option<String>,
}

/// Publish a notification and broadcast it best-effort.
#[utoipa::path(
    post,
    path = "/notifications",
    request_body = PublishNotificationRequest,
    responses(
        (status = 201, description = "Notification stored", body = PublishNotificationResponse),
        (status = 400, description = "Missing title or content", body = Error),
        (status = 500, description = "Storage failure", body = Error)
    ),
    tags = ["notifications"],
    operation_id = "publishNotification"
)]
#[post("/notifications")]
pub async fn publish_notification(
    state: web::Data<HttpState>,
    payload: web::Json<PublishNotificationRequest>,
) -> ApiResult<HttpResponse> {
    let PublishNotificationRequest { title, content } = payload.into_inner();

    let mut missing = Vec::new();
    let title = title.filter(|raw| !raw.trim().is_empty());
    let content = content.filter(|raw| !raw.trim().is_empty());
    if title.is_none() {
        missing.push("title");
    }
    if content.is_none() {
        missing.push("content");
    }
    let (Some(title), Some(content)) = (title, content) else {
        return Err(Error::invalid_request("Title and content are required")
            .with_details(json!({ "missing": missing }))
            .into());
    };

    let notification = state.notifications.publish(title, content).await?;
    Ok(HttpResponse::Created().json(PublishNotificationResponse {
        message: "Notification created successfully".to_owned(),
        notification,
    }))
}

/// List all notifications, newest first.
#[utoipa::path(
    get,
    path = "/notifications",
    responses(
        (status = 200, description = "Notifications, newest first", body = [Notification]),
        (status = 500, description = "Storage failure", body = Error)
    ),
    tags = ["notifications"],
    operation_id = "listNotifications"
)]
#[get("/notifications")]
pub async fn list_notifications(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<Notification>>> {
    let notifications = state.notifications_query.list().await?;
    Ok(web::Json(notifications))
}

/// Delete a notification.
#[utoipa::path(
    delete,
    path = "/notifications",
    params(DeleteNotificationParams),
    responses(
        (status = 200, description = "Notification deleted"),
        (status = 400, description = "Missing or malformed id", body = Error),
        (status = 404, description = "Unknown notification", body = Error),
        (status = 500, description = "Storage failure", body = Error)
    ),
    tags = ["notifications"],
    operation_id = "deleteNotification"
)]
#[delete("/notifications")]
pub async fn delete_notification(
    state: web::Data<HttpState>,
    params: web::Query<DeleteNotificationParams>,
) -> ApiResult<HttpResponse> {
    let raw_id = params
        .into_inner()
        .id
        .filter(|raw| !raw.trim().is_empty())
        .ok_or_else(|| Error::invalid_request("Notification ID is required"))?;
    let id = NotificationId::new(raw_id)
        .map_err(|error| Error::invalid_request(error.to_string()))?;

    state.notifications.delete(id).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Notification deleted successfully" })))
}
