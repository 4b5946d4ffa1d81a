use std::future::Future;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, warn};

/// Application error taxonomy. Every handler returns `Result<_, ApiError>` and
/// the status code is decided here, in one place.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Unauthorized: Token missing")]
    MissingToken,

    #[error("Unauthorized: Token expired")]
    ExpiredToken,

    #[error("Forbidden: Invalid token")]
    InvalidToken,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    /// A compensating action failed and left a partial write behind.
    /// Carries the detail for the log; the client sees a fixed message.
    #[error("data inconsistency: {0}")]
    Inconsistent(String),

    #[error(transparent)]
    Database(sqlx::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }
}

/// Unique violations surface as 409 no matter where they happen; the database
/// constraint is the final arbiter behind every pre-check query.
impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &e {
            if db.is_unique_violation() {
                return Self::Conflict("Resource already exists".into());
            }
        }
        Self::Database(e)
    }
}

/// Failure policy for two-step composite writes: when the second step fails,
/// `compensate` undoes the first; a failed compensation surfaces the partial
/// write as `Inconsistent` instead of the original error.
pub async fn unwind_partial_write<T, C, Fut>(
    outcome: sqlx::Result<T>,
    compensate: C,
    detail: String,
) -> Result<T, ApiError>
where
    C: FnOnce() -> Fut,
    Fut: Future<Output = sqlx::Result<u64>>,
{
    match outcome {
        Ok(value) => Ok(value),
        Err(e) => {
            error!(error = %e, %detail, "composite step failed, compensating");
            match compensate().await {
                Ok(_) => Err(e.into()),
                Err(cleanup) => {
                    error!(error = %cleanup, %detail, "compensating delete failed");
                    Err(ApiError::Inconsistent(detail))
                }
            }
        }
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) | Self::MissingToken | Self::ExpiredToken => {
                StatusCode::UNAUTHORIZED
            }
            Self::InvalidToken => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Inconsistent(_) | Self::Database(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // 5xx detail stays in the log; clients get a fixed message.
        let message = match &self {
            Self::Database(e) => {
                error!(error = %e, "database error");
                "Internal server error".to_string()
            }
            Self::Internal(e) => {
                error!(error = %e, "internal error");
                "Internal server error".to_string()
            }
            Self::Inconsistent(detail) => {
                error!(%detail, "inconsistent state after failed compensation");
                "Internal server error".to_string()
            }
            other => {
                if matches!(
                    other,
                    Self::MissingToken | Self::ExpiredToken | Self::InvalidToken
                ) {
                    warn!(rejection = %other, "request rejected");
                }
                other.to_string()
            }
        };
        (self.status(), Json(json!({ "message": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_follows_taxonomy() {
        assert_eq!(ApiError::validation("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::Unauthorized("x".into()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::MissingToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::ExpiredToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::InvalidToken.status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::NotFound("Quiz").status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::conflict("x").status(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::Database(sqlx::Error::PoolClosed).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Inconsistent("orphan".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn not_found_message_names_the_resource() {
        assert_eq!(
            ApiError::NotFound("Study plan").to_string(),
            "Study plan not found"
        );
    }

    #[tokio::test]
    async fn unwind_passes_success_through_without_compensating() {
        let called = std::cell::Cell::new(false);
        let out = unwind_partial_write(
            Ok(7),
            || {
                called.set(true);
                async { Ok::<u64, sqlx::Error>(1) }
            },
            "seven".into(),
        )
        .await;
        assert_eq!(out.unwrap(), 7);
        assert!(!called.get());
    }

    #[tokio::test]
    async fn unwind_keeps_original_error_when_compensation_succeeds() {
        let outcome: sqlx::Result<()> = Err(sqlx::Error::PoolClosed);
        let err = unwind_partial_write(
            outcome,
            || async { Ok::<u64, sqlx::Error>(1) },
            "quiz 7 left without questions".into(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::Database(_)));
    }

    #[tokio::test]
    async fn unwind_reports_inconsistency_when_compensation_fails() {
        let outcome: sqlx::Result<()> = Err(sqlx::Error::PoolClosed);
        let err = unwind_partial_write(
            outcome,
            || async { Err::<u64, sqlx::Error>(sqlx::Error::PoolClosed) },
            "quiz 7 left without questions".into(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::Inconsistent(d) if d.contains("quiz 7")));
    }

    #[tokio::test]
    async fn database_error_body_hides_detail() {
        let resp = ApiError::Database(sqlx::Error::PoolClosed).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], "Internal server error");
        assert!(body.get("error").is_none());
    }
}
