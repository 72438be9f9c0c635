//! Notification endpoints

use axum::{
    extract::{Path, State},
    response::Json,
};

use super::dto::NotificationResponse;
use crate::AppState;
use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::service::notifications::NotificationDispatcher;

/// GET /api/notifications
pub async fn get_notifications(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
) -> Result<Json<Vec<NotificationResponse>>, AppError> {
    let dispatcher = NotificationDispatcher::new(state.db.clone());
    let notifications = dispatcher.list_notifications(&auth.user_id).await?;

    Ok(Json(notifications.into_iter().map(Into::into).collect()))
}

/// POST /api/notifications/:id/read
pub async fn mark_notification_read(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let dispatcher = NotificationDispatcher::new(state.db.clone());
    dispatcher.mark_read(&auth.user_id, &id).await?;

    Ok(Json(serde_json::json!({})))
}

/// POST /api/notifications/read-all
pub async fn mark_all_notifications_read(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
) -> Result<Json<serde_json::Value>, AppError> {
    let dispatcher = NotificationDispatcher::new(state.db.clone());
    dispatcher.mark_all_read(&auth.user_id).await?;

    Ok(Json(serde_json::json!({})))
}
