use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use serde_json::json;
use tracing::{info, instrument};

use super::dto::{
    RecordSessionRequest, RecordedSessionResponse, StudyPlanDetails, StudyPlanRequest,
};
use super::repo::{NewStudyPlan, StudyPlan, StudySession};
use crate::auth::extract::AuthUser;
use crate::error::{unwind_partial_write, ApiError};
use crate::json::Json;
use crate::state::AppState;

const DEFAULT_FOCUS_SECONDS: i32 = 1500;
const DEFAULT_BREAK_SECONDS: i32 = 300;

pub fn studyplan_routes() -> Router<AppState> {
    Router::new()
        .route("/studyplans", get(list_plans).post(create_plan))
        .route(
            "/studyplans/:id",
            get(get_plan).put(update_plan).delete(delete_plan),
        )
        .route("/studyplans/:id/sessions", post(record_session))
}

fn validate(payload: &StudyPlanRequest) -> Result<NewStudyPlan<'_>, ApiError> {
    if payload.title.trim().is_empty() || payload.description.trim().is_empty() {
        return Err(ApiError::validation("Title and description are required"));
    }
    if let (Some(start), Some(end)) = (payload.start_date, payload.end_date) {
        if end < start {
            return Err(ApiError::validation("End date must not precede start date"));
        }
    }
    let focus_duration = payload.focus_duration.unwrap_or(DEFAULT_FOCUS_SECONDS);
    let break_duration = payload.break_duration.unwrap_or(DEFAULT_BREAK_SECONDS);
    if focus_duration <= 0 || break_duration <= 0 {
        return Err(ApiError::validation("Durations must be positive"));
    }
    Ok(NewStudyPlan {
        title: payload.title.trim(),
        description: payload.description.trim(),
        start_date: payload.start_date,
        end_date: payload.end_date,
        focus_duration,
        break_duration,
        status: payload.status.as_deref().unwrap_or("active"),
    })
}

#[instrument(skip(state))]
pub async fn list_plans(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<StudyPlan>>, ApiError> {
    Ok(Json(StudyPlan::list_for_user(&state.db, user.id).await?))
}

#[instrument(skip(state))]
pub async fn get_plan(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<StudyPlanDetails>, ApiError> {
    let plan = StudyPlan::find_for_user(&state.db, id, user.id)
        .await?
        .ok_or(ApiError::NotFound("Study plan"))?;
    let sessions = StudySession::list_for_plan(&state.db, plan.id).await?;
    Ok(Json(StudyPlanDetails { plan, sessions }))
}

#[instrument(skip(state, payload))]
pub async fn create_plan(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<StudyPlanRequest>,
) -> Result<(StatusCode, Json<StudyPlan>), ApiError> {
    let new_plan = validate(&payload)?;
    let plan = StudyPlan::create(&state.db, user.id, new_plan).await?;

    info!(plan_id = plan.id, user_id = user.id, "study plan created");
    Ok((StatusCode::CREATED, Json(plan)))
}

#[instrument(skip(state, payload))]
pub async fn update_plan(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<StudyPlanRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let new_plan = validate(&payload)?;

    let affected = StudyPlan::update_for_user(&state.db, id, user.id, new_plan).await?;
    if affected == 0 {
        return Err(ApiError::NotFound("Study plan"));
    }

    info!(plan_id = id, user_id = user.id, "study plan updated");
    Ok(Json(json!({ "message": "Study plan updated successfully" })))
}

#[instrument(skip(state))]
pub async fn delete_plan(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let affected = StudyPlan::delete_for_user(&state.db, id, user.id).await?;
    if affected == 0 {
        return Err(ApiError::NotFound("Study plan"));
    }

    info!(plan_id = id, user_id = user.id, "study plan deleted");
    Ok(Json(json!({ "message": "Study plan deleted successfully" })))
}

/// Records a completed session and bumps the plan counters with an atomic
/// in-database increment. Only focus sessions add to total focus time.
#[instrument(skip(state, payload))]
pub async fn record_session(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<RecordSessionRequest>,
) -> Result<(StatusCode, Json<RecordedSessionResponse>), ApiError> {
    if payload.duration <= 0 {
        return Err(ApiError::validation("Duration must be positive"));
    }
    let session_type = payload.session_type.trim();
    if session_type != "focus" && session_type != "break" {
        return Err(ApiError::validation(
            "Session type must be 'focus' or 'break'",
        ));
    }

    // Ownership gate before any write.
    StudyPlan::find_for_user(&state.db, id, user.id)
        .await?
        .ok_or(ApiError::NotFound("Study plan"))?;

    let session = StudySession::create(&state.db, id, payload.duration, session_type).await?;

    let focus_seconds = if session_type == "focus" {
        payload.duration
    } else {
        0
    };
    // A failed bump removes the session row again so no session exists whose
    // plan counters never saw it.
    let (sessions_completed, total_focus_time) = unwind_partial_write(
        StudyPlan::bump_session_counters(&state.db, id, user.id, focus_seconds).await,
        || StudySession::delete(&state.db, session.id),
        format!("session {} recorded without counter update", session.id),
    )
    .await?
    .ok_or(ApiError::NotFound("Study plan"))?;

    info!(
        plan_id = id,
        user_id = user.id,
        session_id = session.id,
        session_type,
        "session recorded"
    );
    Ok((
        StatusCode::CREATED,
        Json(RecordedSessionResponse {
            message: "Session recorded successfully".into(),
            session,
            sessions_completed,
            total_focus_time,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn request() -> StudyPlanRequest {
        StudyPlanRequest {
            title: "Rust in a month".into(),
            description: "Daily drills".into(),
            start_date: Some(date!(2026 - 09 - 01)),
            end_date: Some(date!(2026 - 09 - 30)),
            focus_duration: None,
            break_duration: None,
            status: None,
        }
    }

    #[test]
    fn validation_fills_pomodoro_defaults() {
        let req = request();
        let plan = validate(&req).unwrap();
        assert_eq!(plan.focus_duration, DEFAULT_FOCUS_SECONDS);
        assert_eq!(plan.break_duration, DEFAULT_BREAK_SECONDS);
        assert_eq!(plan.status, "active");
    }

    #[test]
    fn validation_rejects_blank_title() {
        let mut req = request();
        req.title = "   ".into();
        assert!(matches!(
            validate(&req).unwrap_err(),
            ApiError::Validation(_)
        ));
    }

    #[test]
    fn validation_rejects_inverted_date_range() {
        let mut req = request();
        req.start_date = Some(date!(2026 - 09 - 30));
        req.end_date = Some(date!(2026 - 09 - 01));
        assert!(matches!(
            validate(&req).unwrap_err(),
            ApiError::Validation(_)
        ));
    }

    #[test]
    fn validation_rejects_non_positive_durations() {
        let mut req = request();
        req.focus_duration = Some(0);
        assert!(validate(&req).is_err());
    }

    #[sqlx::test]
    async fn failed_counter_bump_removes_the_session(db: sqlx::PgPool) {
        let user = crate::auth::repo::User::create(&db, "alice", "alice@example.com", "hash")
            .await
            .unwrap();
        let plan_req = request();
        let plan = StudyPlan::create(&db, user.id, validate(&plan_req).unwrap())
            .await
            .unwrap();
        let session = StudySession::create(&db, plan.id, 1500, "focus").await.unwrap();

        let outcome: sqlx::Result<Option<(i32, i32)>> = Err(sqlx::Error::PoolClosed);
        let err = unwind_partial_write(
            outcome,
            || StudySession::delete(&db, session.id),
            format!("session {} recorded without counter update", session.id),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ApiError::Database(_)));
        assert!(StudySession::list_for_plan(&db, plan.id)
            .await
            .unwrap()
            .is_empty());
    }
}
