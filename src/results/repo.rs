use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

/// Owned resource: every query against it carries the owner's id so a
/// non-owner sees zero rows, reported upstream as not-found.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QuizResult {
    pub id: i64,
    pub user_id: i64,
    pub quiz_id: i64,
    pub score: i32,
    pub total_questions: i32,
    pub completed_at: OffsetDateTime,
}

impl QuizResult {
    pub async fn list_for_user(db: &PgPool, user_id: i64) -> sqlx::Result<Vec<QuizResult>> {
        sqlx::query_as::<_, QuizResult>(
            r#"
            SELECT id, user_id, quiz_id, score, total_questions, completed_at
            FROM quiz_results
            WHERE user_id = $1
            ORDER BY completed_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await
    }

    pub async fn find_for_user(
        db: &PgPool,
        id: i64,
        user_id: i64,
    ) -> sqlx::Result<Option<QuizResult>> {
        sqlx::query_as::<_, QuizResult>(
            r#"
            SELECT id, user_id, quiz_id, score, total_questions, completed_at
            FROM quiz_results
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await
    }

    pub async fn create(
        db: &PgPool,
        user_id: i64,
        quiz_id: i64,
        score: i32,
        total_questions: i32,
    ) -> sqlx::Result<QuizResult> {
        sqlx::query_as::<_, QuizResult>(
            r#"
            INSERT INTO quiz_results (user_id, quiz_id, score, total_questions)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, quiz_id, score, total_questions, completed_at
            "#,
        )
        .bind(user_id)
        .bind(quiz_id)
        .bind(score)
        .bind(total_questions)
        .fetch_one(db)
        .await
    }

    pub async fn update_for_user(
        db: &PgPool,
        id: i64,
        user_id: i64,
        quiz_id: i64,
        score: i32,
        total_questions: i32,
    ) -> sqlx::Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE quiz_results
            SET quiz_id = $1, score = $2, total_questions = $3
            WHERE id = $4 AND user_id = $5
            "#,
        )
        .bind(quiz_id)
        .bind(score)
        .bind(total_questions)
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete_for_user(db: &PgPool, id: i64, user_id: i64) -> sqlx::Result<u64> {
        let result = sqlx::query("DELETE FROM quiz_results WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected())
    }
}
