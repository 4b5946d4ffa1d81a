use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow, PgPool};
use time::OffsetDateTime;

use super::dto::QuestionInput;

/// Shared catalog resource; parent of quiz_questions.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Quiz {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "languageId")]
    pub language_id: Option<i64>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QuizQuestion {
    pub id: i64,
    pub quiz_id: i64,
    pub question: String,
    pub options: Json<Vec<String>>,
    #[serde(rename = "correctAnswer")]
    pub correct_answer: i32,
}

impl Quiz {
    pub async fn list(db: &PgPool) -> sqlx::Result<Vec<Quiz>> {
        sqlx::query_as::<_, Quiz>(
            r#"
            SELECT id, title, description, language_id, created_at, updated_at
            FROM quizzes
            ORDER BY id
            "#,
        )
        .fetch_all(db)
        .await
    }

    pub async fn find(db: &PgPool, id: i64) -> sqlx::Result<Option<Quiz>> {
        sqlx::query_as::<_, Quiz>(
            r#"
            SELECT id, title, description, language_id, created_at, updated_at
            FROM quizzes
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    pub async fn insert(
        db: &PgPool,
        title: &str,
        description: &str,
        language_id: Option<i64>,
    ) -> sqlx::Result<Quiz> {
        sqlx::query_as::<_, Quiz>(
            r#"
            INSERT INTO quizzes (title, description, language_id)
            VALUES ($1, $2, $3)
            RETURNING id, title, description, language_id, created_at, updated_at
            "#,
        )
        .bind(title)
        .bind(description)
        .bind(language_id)
        .fetch_one(db)
        .await
    }

    /// Questions cascade via the foreign key.
    pub async fn delete(db: &PgPool, id: i64) -> sqlx::Result<u64> {
        let result = sqlx::query("DELETE FROM quizzes WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected())
    }
}

impl QuizQuestion {
    pub async fn list_for_quiz(db: &PgPool, quiz_id: i64) -> sqlx::Result<Vec<QuizQuestion>> {
        sqlx::query_as::<_, QuizQuestion>(
            r#"
            SELECT id, quiz_id, question, options, correct_answer
            FROM quiz_questions
            WHERE quiz_id = $1
            ORDER BY id
            "#,
        )
        .bind(quiz_id)
        .fetch_all(db)
        .await
    }

    pub async fn insert_many(
        db: &PgPool,
        quiz_id: i64,
        questions: &[QuestionInput],
    ) -> sqlx::Result<()> {
        for q in questions {
            sqlx::query(
                r#"
                INSERT INTO quiz_questions (quiz_id, question, options, correct_answer)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(quiz_id)
            .bind(q.question.trim())
            .bind(Json(&q.options))
            .bind(q.correct_answer)
            .execute(db)
            .await?;
        }
        Ok(())
    }
}
