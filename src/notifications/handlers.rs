use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Router,
};
use serde_json::json;
use tracing::{info, instrument};

use super::dto::CreateNotificationRequest;
use super::repo::Notification;
use crate::auth::extract::AuthUser;
use crate::error::ApiError;
use crate::json::Json;
use crate::state::AppState;

pub fn notification_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/notifications",
            get(list_notifications).post(create_notification),
        )
        .route(
            "/notifications/:id",
            get(get_notification).delete(delete_notification),
        )
        .route("/notifications/:id/read", put(mark_notification_read))
}

#[instrument(skip(state, payload))]
pub async fn create_notification(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateNotificationRequest>,
) -> Result<(StatusCode, Json<Notification>), ApiError> {
    if payload.kind.trim().is_empty() || payload.message.trim().is_empty() {
        return Err(ApiError::validation("Type and message are required"));
    }

    let notification = Notification::create(
        &state.db,
        user.id,
        payload.kind.trim(),
        payload.message.trim(),
    )
    .await?;

    info!(
        notification_id = notification.id,
        user_id = user.id,
        "notification created"
    );
    Ok((StatusCode::CREATED, Json(notification)))
}

#[instrument(skip(state))]
pub async fn list_notifications(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<Notification>>, ApiError> {
    Ok(Json(Notification::list_for_user(&state.db, user.id).await?))
}

#[instrument(skip(state))]
pub async fn get_notification(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Notification>, ApiError> {
    let notification = Notification::find_for_user(&state.db, id, user.id)
        .await?
        .ok_or(ApiError::NotFound("Notification"))?;
    Ok(Json(notification))
}

#[instrument(skip(state))]
pub async fn mark_notification_read(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let affected = Notification::mark_read(&state.db, id, user.id).await?;
    if affected == 0 {
        return Err(ApiError::NotFound("Notification"));
    }

    info!(notification_id = id, user_id = user.id, "notification read");
    Ok(Json(json!({ "message": "Notification marked as read" })))
}

#[instrument(skip(state))]
pub async fn delete_notification(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let affected = Notification::delete_for_user(&state.db, id, user.id).await?;
    if affected == 0 {
        return Err(ApiError::NotFound("Notification"));
    }

    info!(notification_id = id, user_id = user.id, "notification deleted");
    Ok(Json(json!({ "message": "Notification deleted successfully" })))
}
