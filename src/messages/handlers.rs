use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Router,
};
use serde_json::json;
use tracing::{info, instrument};

use super::dto::SendMessageRequest;
use super::repo::Message;
use crate::auth::extract::AuthUser;
use crate::error::ApiError;
use crate::json::Json;
use crate::state::AppState;

pub fn message_routes() -> Router<AppState> {
    Router::new()
        .route("/messages", get(list_messages).post(send_message))
        .route("/messages/:id", get(get_message).delete(delete_message))
        .route("/messages/conversation/:user_id", get(get_conversation))
}

#[instrument(skip(state, payload))]
pub async fn send_message(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<Message>), ApiError> {
    if payload.content.trim().is_empty() {
        return Err(ApiError::validation("Content is required"));
    }
    if payload.receiver_id == user.id {
        return Err(ApiError::validation("Cannot send a message to yourself"));
    }

    let message =
        Message::create(&state.db, user.id, payload.receiver_id, payload.content.trim()).await?;

    info!(
        message_id = message.id,
        sender_id = user.id,
        receiver_id = payload.receiver_id,
        "message sent"
    );
    Ok((StatusCode::CREATED, Json(message)))
}

#[instrument(skip(state))]
pub async fn list_messages(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<Message>>, ApiError> {
    Ok(Json(Message::list_for_user(&state.db, user.id).await?))
}

#[instrument(skip(state))]
pub async fn get_conversation(
    State(state): State<AppState>,
    user: AuthUser,
    Path(peer_id): Path<i64>,
) -> Result<Json<Vec<Message>>, ApiError> {
    Ok(Json(Message::conversation(&state.db, user.id, peer_id).await?))
}

#[instrument(skip(state))]
pub async fn get_message(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Message>, ApiError> {
    let message = Message::find_for_participant(&state.db, id, user.id)
        .await?
        .ok_or(ApiError::NotFound("Message"))?;
    Ok(Json(message))
}

#[instrument(skip(state))]
pub async fn delete_message(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let affected = Message::delete_for_sender(&state.db, id, user.id).await?;
    if affected == 0 {
        return Err(ApiError::NotFound("Message"));
    }

    info!(message_id = id, user_id = user.id, "message deleted");
    Ok(Json(json!({ "message": "Message deleted successfully" })))
}
