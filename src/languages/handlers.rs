use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Router,
};
use serde_json::json;
use tracing::{info, instrument, warn};

use super::dto::LanguageRequest;
use super::repo::Language;
use crate::auth::extract::AuthUser;
use crate::error::ApiError;
use crate::json::Json;
use crate::state::AppState;

pub fn language_routes() -> Router<AppState> {
    Router::new()
        .route("/languages", get(list_languages).post(create_language))
        .route(
            "/languages/:id",
            get(get_language).put(update_language).delete(delete_language),
        )
}

fn validate(payload: &LanguageRequest) -> Result<(), ApiError> {
    if payload.name.trim().is_empty() || payload.code.trim().is_empty() {
        return Err(ApiError::validation("Name and code are required"));
    }
    Ok(())
}

#[instrument(skip(state))]
pub async fn list_languages(
    State(state): State<AppState>,
) -> Result<Json<Vec<Language>>, ApiError> {
    Ok(Json(Language::list(&state.db).await?))
}

#[instrument(skip(state))]
pub async fn get_language(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Language>, ApiError> {
    let language = Language::find(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Language"))?;
    Ok(Json(language))
}

#[instrument(skip(state, payload))]
pub async fn create_language(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<LanguageRequest>,
) -> Result<(StatusCode, Json<Language>), ApiError> {
    validate(&payload)?;
    let code = payload.code.trim().to_lowercase();

    if Language::code_taken(&state.db, &code, None).await? {
        warn!(%code, "language code already exists");
        return Err(ApiError::conflict("Language code already exists"));
    }

    let language = Language::create(&state.db, payload.name.trim(), &code).await?;

    info!(language_id = language.id, user_id = user.id, "language created");
    Ok((StatusCode::CREATED, Json(language)))
}

#[instrument(skip(state, payload))]
pub async fn update_language(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<LanguageRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    validate(&payload)?;
    let code = payload.code.trim().to_lowercase();

    if Language::code_taken(&state.db, &code, Some(id)).await? {
        return Err(ApiError::conflict("Language code already exists"));
    }

    let affected = Language::update(&state.db, id, payload.name.trim(), &code).await?;
    if affected == 0 {
        return Err(ApiError::NotFound("Language"));
    }

    info!(language_id = id, user_id = user.id, "language updated");
    Ok(Json(json!({ "message": "Language updated successfully" })))
}

#[instrument(skip(state))]
pub async fn delete_language(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let affected = Language::delete(&state.db, id).await?;
    if affected == 0 {
        return Err(ApiError::NotFound("Language"));
    }

    info!(language_id = id, user_id = user.id, "language deleted");
    Ok(Json(json!({ "message": "Language deleted successfully" })))
}
