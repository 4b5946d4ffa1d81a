use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Router,
};
use serde_json::json;
use tracing::{info, instrument};

use super::dto::HobbyRequest;
use super::repo::Hobby;
use crate::auth::extract::AuthUser;
use crate::error::ApiError;
use crate::json::Json;
use crate::state::AppState;

/// Catalog reads are public; writes require an authenticated identity.
pub fn hobby_routes() -> Router<AppState> {
    Router::new()
        .route("/hobbies", get(list_hobbies).post(create_hobby))
        .route(
            "/hobbies/:id",
            get(get_hobby).put(update_hobby).delete(delete_hobby),
        )
}

fn validate(payload: &HobbyRequest) -> Result<(), ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::validation("Name is required"));
    }
    Ok(())
}

#[instrument(skip(state))]
pub async fn list_hobbies(State(state): State<AppState>) -> Result<Json<Vec<Hobby>>, ApiError> {
    Ok(Json(Hobby::list(&state.db).await?))
}

#[instrument(skip(state))]
pub async fn get_hobby(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Hobby>, ApiError> {
    let hobby = Hobby::find(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Hobby"))?;
    Ok(Json(hobby))
}

#[instrument(skip(state, payload))]
pub async fn create_hobby(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<HobbyRequest>,
) -> Result<(StatusCode, Json<Hobby>), ApiError> {
    validate(&payload)?;

    let hobby = Hobby::create(
        &state.db,
        payload.name.trim(),
        payload.description.as_deref().map(str::trim),
        payload.category.as_deref().unwrap_or("general"),
        payload.image_url.as_deref(),
    )
    .await?;

    info!(hobby_id = hobby.id, user_id = user.id, "hobby created");
    Ok((StatusCode::CREATED, Json(hobby)))
}

#[instrument(skip(state, payload))]
pub async fn update_hobby(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<HobbyRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    validate(&payload)?;

    let affected = Hobby::update(
        &state.db,
        id,
        payload.name.trim(),
        payload.description.as_deref().map(str::trim),
        payload.category.as_deref().unwrap_or("general"),
        payload.image_url.as_deref(),
    )
    .await?;

    if affected == 0 {
        return Err(ApiError::NotFound("Hobby"));
    }

    info!(hobby_id = id, user_id = user.id, "hobby updated");
    Ok(Json(json!({ "message": "Hobby updated successfully" })))
}

#[instrument(skip(state))]
pub async fn delete_hobby(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let affected = Hobby::delete(&state.db, id).await?;
    if affected == 0 {
        return Err(ApiError::NotFound("Hobby"));
    }

    info!(hobby_id = id, user_id = user.id, "hobby deleted");
    Ok(Json(json!({ "message": "Hobby deleted successfully" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, description: Option<&str>) -> HobbyRequest {
        HobbyRequest {
            name: name.into(),
            description: description.map(Into::into),
            category: None,
            image_url: None,
        }
    }

    #[test]
    fn validation_rejects_blank_name() {
        let err = validate(&request("   ", Some("reading books"))).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn validation_accepts_missing_description() {
        assert!(validate(&request("Reading", None)).is_ok());
    }
}
