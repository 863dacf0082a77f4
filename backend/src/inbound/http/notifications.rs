//! Notification HTTP handlers.
//!
//! ```text
//! GET  /api/notifications
//! POST /api/notifications/{id}/read
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::ports::{
    ListNotificationsRequest, MarkNotificationReadRequest, NotificationPayload,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{BearerToken, authenticate};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_uuid};

/// Notification representation returned by the read surface.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponseBody {
    #[schema(format = "uuid")]
    pub id: String,
    #[schema(example = "oferta_recibida")]
    pub kind: String,
    #[schema(format = "uuid")]
    pub exchange_id: String,
    pub body: String,
    pub read: bool,
    #[schema(format = "date-time")]
    pub created_at: String,
}

impl From<NotificationPayload> for NotificationResponseBody {
    fn from(payload: NotificationPayload) -> Self {
        Self {
            id: payload.id.to_string(),
            kind: payload.kind.to_string(),
            exchange_id: payload.exchange_id.to_string(),
            body: payload.body,
            read: payload.read,
            created_at: payload.created_at.to_rfc3339(),
        }
    }
}

/// List the caller's notifications, unread first.
#[utoipa::path(
    get,
    path = "/api/notifications",
    responses(
        (status = 200, description = "Caller's notifications", body = [NotificationResponseBody]),
        (status = 401, description = "Unauthorized", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["notifications"],
    operation_id = "listNotifications",
    security(("BearerToken" = []))
)]
#[get("/notifications")]
pub async fn list_notifications(
    state: web::Data<HttpState>,
    token: BearerToken,
) -> ApiResult<web::Json<Vec<NotificationResponseBody>>> {
    let caller = authenticate(&state, &token).await?;

    let notifications = state
        .notifications_query
        .list(ListNotificationsRequest { caller })
        .await?;

    Ok(web::Json(
        notifications
            .into_iter()
            .map(NotificationResponseBody::from)
            .collect(),
    ))
}

/// Mark one of the caller's notifications as read.
#[utoipa::path(
    post,
    path = "/api/notifications/{id}/read",
    params(("id" = String, Path, description = "Resource identifier (UUID)")),
    responses(
        (status = 200, description = "Notification marked read"),
        (status = 404, description = "Unknown notification", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["notifications"],
    operation_id = "markNotificationRead",
    security(("BearerToken" = []))
)]
#[post("/notifications/{id}/read")]
pub async fn mark_notification_read(
    state: web::Data<HttpState>,
    token: BearerToken,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let caller = authenticate(&state, &token).await?;
    let notification_id = parse_uuid(path.into_inner(), FieldName::new("id"))?;

    state
        .notifications
        .mark_read(MarkNotificationReadRequest {
            caller,
            notification_id,
        })
        .await?;

    Ok(HttpResponse::Ok().finish())
}

#[cfg(test)]
#[path = "notifications_tests.rs"]
mod tests;
