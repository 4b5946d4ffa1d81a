use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Router,
};
use serde_json::json;
use tracing::{info, instrument};

use super::dto::{CreateQuizRequest, CreatedQuizResponse, QuizDetails};
use super::repo::{Quiz, QuizQuestion};
use crate::auth::extract::AuthUser;
use crate::error::{unwind_partial_write, ApiError};
use crate::json::Json;
use crate::state::AppState;

pub fn quiz_routes() -> Router<AppState> {
    Router::new()
        .route("/quiz", get(list_quizzes).post(create_quiz))
        .route("/quiz/:id", get(get_quiz).delete(delete_quiz))
}

fn validate(payload: &CreateQuizRequest) -> Result<(), ApiError> {
    if payload.title.trim().is_empty() || payload.description.trim().is_empty() {
        return Err(ApiError::validation("Title and description are required"));
    }
    if payload.questions.is_empty() {
        return Err(ApiError::validation("Questions must be a non-empty array"));
    }
    for q in &payload.questions {
        if q.question.trim().is_empty() {
            return Err(ApiError::validation("Question text is required"));
        }
        if q.options.len() < 2 {
            return Err(ApiError::validation(
                "Each question needs at least two options",
            ));
        }
        if q.correct_answer < 0 || q.correct_answer as usize >= q.options.len() {
            return Err(ApiError::validation(
                "Correct answer must index into the options",
            ));
        }
    }
    Ok(())
}

#[instrument(skip(state))]
pub async fn list_quizzes(State(state): State<AppState>) -> Result<Json<Vec<Quiz>>, ApiError> {
    Ok(Json(Quiz::list(&state.db).await?))
}

#[instrument(skip(state))]
pub async fn get_quiz(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<QuizDetails>, ApiError> {
    let quiz = Quiz::find(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Quiz"))?;
    let questions = QuizQuestion::list_for_quiz(&state.db, id).await?;
    Ok(Json(QuizDetails {
        id: quiz.id,
        title: quiz.title,
        description: quiz.description,
        language_id: quiz.language_id,
        created_at: quiz.created_at,
        updated_at: quiz.updated_at,
        questions,
    }))
}

/// Composite create: parent row first, then the question rows. A failure in
/// the second step removes the parent again so no quiz without questions
/// survives; a failed removal is a detectable inconsistency, not a silent
/// leftover.
#[instrument(skip(state, payload))]
pub async fn create_quiz(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateQuizRequest>,
) -> Result<(StatusCode, Json<CreatedQuizResponse>), ApiError> {
    validate(&payload)?;

    let quiz = Quiz::insert(
        &state.db,
        payload.title.trim(),
        payload.description.trim(),
        payload.language_id,
    )
    .await?;

    unwind_partial_write(
        QuizQuestion::insert_many(&state.db, quiz.id, &payload.questions).await,
        || Quiz::delete(&state.db, quiz.id),
        format!("quiz {} left without questions", quiz.id),
    )
    .await?;

    info!(quiz_id = quiz.id, user_id = user.id, "quiz created");
    Ok((
        StatusCode::CREATED,
        Json(CreatedQuizResponse {
            message: "Quiz added successfully".into(),
            quiz_id: quiz.id,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn delete_quiz(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let affected = Quiz::delete(&state.db, id).await?;
    if affected == 0 {
        return Err(ApiError::NotFound("Quiz"));
    }

    info!(quiz_id = id, user_id = user.id, "quiz deleted");
    Ok(Json(json!({ "message": "Quiz deleted successfully" })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quizzes::dto::QuestionInput;

    fn request(questions: Vec<QuestionInput>) -> CreateQuizRequest {
        CreateQuizRequest {
            title: "Basics".into(),
            description: "Intro quiz".into(),
            language_id: None,
            questions,
        }
    }

    fn question(correct: i32, options: &[&str]) -> QuestionInput {
        QuestionInput {
            question: "2+2?".into(),
            options: options.iter().map(|s| s.to_string()).collect(),
            correct_answer: correct,
        }
    }

    #[test]
    fn validation_rejects_empty_question_list() {
        let err = validate(&request(vec![])).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn validation_rejects_single_option_question() {
        let err = validate(&request(vec![question(0, &["4"])])).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn validation_rejects_out_of_range_answer() {
        let err = validate(&request(vec![question(5, &["3", "4"])])).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        let err = validate(&request(vec![question(-1, &["3", "4"])])).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn validation_accepts_well_formed_quiz() {
        assert!(validate(&request(vec![question(1, &["3", "4"])])).is_ok());
    }

    #[sqlx::test]
    async fn failed_question_insert_removes_the_quiz(db: sqlx::PgPool) {
        let quiz = Quiz::insert(&db, "Basics", "Intro quiz", None).await.unwrap();

        // a child insert aimed at a parent id that does not exist trips the
        // foreign key, standing in for any mid-batch failure
        let outcome =
            QuizQuestion::insert_many(&db, quiz.id + 1_000_000, &[question(1, &["3", "4"])]).await;
        assert!(outcome.is_err());

        let err = unwind_partial_write(
            outcome,
            || Quiz::delete(&db, quiz.id),
            format!("quiz {} left without questions", quiz.id),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ApiError::Database(_)));
        assert!(Quiz::find(&db, quiz.id).await.unwrap().is_none());
    }
}
