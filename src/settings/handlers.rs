use axum::{
    extract::State,
    routing::get,
    Router,
};
use serde_json::json;
use tracing::{info, instrument};

use super::dto::UpdateSettingsRequest;
use super::repo::UserSettings;
use crate::auth::extract::AuthUser;
use crate::error::ApiError;
use crate::json::Json;
use crate::state::AppState;

pub fn settings_routes() -> Router<AppState> {
    Router::new().route("/settings", get(get_settings).put(update_settings))
}

#[instrument(skip(state))]
pub async fn get_settings(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<UserSettings>, ApiError> {
    let settings = UserSettings::find_by_user(&state.db, user.id)
        .await?
        .ok_or(ApiError::NotFound("Settings"))?;
    Ok(Json(settings))
}

#[instrument(skip(state, payload))]
pub async fn update_settings(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<UpdateSettingsRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if payload.theme.trim().is_empty() || payload.language.trim().is_empty() {
        return Err(ApiError::validation("Theme and language are required"));
    }

    let affected = UserSettings::update_for_user(
        &state.db,
        user.id,
        payload.theme.trim(),
        payload.language.trim(),
        payload.notifications_enabled,
    )
    .await?;

    if affected == 0 {
        return Err(ApiError::NotFound("Settings"));
    }

    info!(user_id = user.id, "settings updated");
    Ok(Json(json!({ "message": "Settings updated successfully" })))
}
