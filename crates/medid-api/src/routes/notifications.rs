//! # Notification Inbox
//!
//! Each principal sees only its own notifications.

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::Json;
use medid_core::NotificationId;
use medid_service::Notification;
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::CallerIdentity;
use crate::error::AppError;
use crate::extractors::extract_path;
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct NotificationListResponse {
    #[schema(value_type = Vec<Object>)]
    pub notifications: Vec<Notification>,
    pub unread: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NotificationResponse {
    #[schema(value_type = Object)]
    pub notification: Notification,
}

/// GET /v1/notifications: Caller's notifications, newest first.
#[utoipa::path(
    get,
    path = "/v1/notifications",
    responses(
        (status = 200, description = "Inbox", body = NotificationListResponse),
    ),
    tag = "notifications"
)]
pub(crate) async fn list_notifications(
    State(state): State<AppState>,
    caller: CallerIdentity,
) -> Json<NotificationListResponse> {
    let id = caller.principal.id;
    Json(NotificationListResponse {
        notifications: state.inbox.list(id),
        unread: state.inbox.unread_count(id),
    })
}

/// POST /v1/notifications/{id}/read: Mark one of the caller's notifications read.
#[utoipa::path(
    post,
    path = "/v1/notifications/{id}/read",
    params(("id" = String, Path, description = "Notification id")),
    responses(
        (status = 200, description = "Marked read", body = NotificationResponse),
        (
            status = 404,
            description = "No such notification for the caller",
            body = crate::error::ErrorBody
        ),
    ),
    tag = "notifications"
)]
pub(crate) async fn mark_read(
    State(state): State<AppState>,
    caller: CallerIdentity,
    id: Result<Path<NotificationId>, PathRejection>,
) -> Result<Json<NotificationResponse>, AppError> {
    let id = extract_path(id)?;
    let notification = state.inbox.mark_read(caller.principal.id, id)?;
    Ok(Json(NotificationResponse { notification }))
}
