use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Router,
};
use serde_json::json;
use tracing::{info, instrument};

use super::dto::QuizResultRequest;
use super::repo::QuizResult;
use crate::auth::extract::AuthUser;
use crate::error::ApiError;
use crate::json::Json;
use crate::state::AppState;

pub fn result_routes() -> Router<AppState> {
    Router::new()
        .route("/results", get(list_results).post(create_result))
        .route(
            "/results/:id",
            get(get_result).put(update_result).delete(delete_result),
        )
}

fn validate(payload: &QuizResultRequest) -> Result<(), ApiError> {
    if payload.score < 0 || payload.total_questions <= 0 {
        return Err(ApiError::validation(
            "Score and total questions must be non-negative",
        ));
    }
    if payload.score > payload.total_questions {
        return Err(ApiError::validation(
            "Score cannot exceed total questions",
        ));
    }
    Ok(())
}

#[instrument(skip(state))]
pub async fn list_results(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<QuizResult>>, ApiError> {
    Ok(Json(QuizResult::list_for_user(&state.db, user.id).await?))
}

#[instrument(skip(state))]
pub async fn get_result(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<QuizResult>, ApiError> {
    let result = QuizResult::find_for_user(&state.db, id, user.id)
        .await?
        .ok_or(ApiError::NotFound("Result"))?;
    Ok(Json(result))
}

#[instrument(skip(state, payload))]
pub async fn create_result(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<QuizResultRequest>,
) -> Result<(StatusCode, Json<QuizResult>), ApiError> {
    validate(&payload)?;

    let result = QuizResult::create(
        &state.db,
        user.id,
        payload.quiz_id,
        payload.score,
        payload.total_questions,
    )
    .await?;

    info!(result_id = result.id, user_id = user.id, "result recorded");
    Ok((StatusCode::CREATED, Json(result)))
}

#[instrument(skip(state, payload))]
pub async fn update_result(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<QuizResultRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    validate(&payload)?;

    let affected = QuizResult::update_for_user(
        &state.db,
        id,
        user.id,
        payload.quiz_id,
        payload.score,
        payload.total_questions,
    )
    .await?;

    if affected == 0 {
        return Err(ApiError::NotFound("Result"));
    }

    info!(result_id = id, user_id = user.id, "result updated");
    Ok(Json(json!({ "message": "Result updated successfully" })))
}

#[instrument(skip(state))]
pub async fn delete_result(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let affected = QuizResult::delete_for_user(&state.db, id, user.id).await?;
    if affected == 0 {
        return Err(ApiError::NotFound("Result"));
    }

    info!(result_id = id, user_id = user.id, "result deleted");
    Ok(Json(json!({ "message": "Result deleted successfully" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_rejects_score_above_total() {
        let err = validate(&QuizResultRequest {
            quiz_id: 1,
            score: 11,
            total_questions: 10,
        })
        .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn validation_rejects_negative_score_and_empty_quiz() {
        assert!(validate(&QuizResultRequest {
            quiz_id: 1,
            score: -1,
            total_questions: 10,
        })
        .is_err());
        assert!(validate(&QuizResultRequest {
            quiz_id: 1,
            score: 0,
            total_questions: 0,
        })
        .is_err());
    }

    #[test]
    fn validation_accepts_perfect_score() {
        assert!(validate(&QuizResultRequest {
            quiz_id: 1,
            score: 10,
            total_questions: 10,
        })
        .is_ok());
    }
}
