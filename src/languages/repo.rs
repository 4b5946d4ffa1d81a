use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

/// Shared catalog resource; `code` carries a unique constraint.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Language {
    pub id: i64,
    pub name: String,
    pub code: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Language {
    pub async fn list(db: &PgPool) -> sqlx::Result<Vec<Language>> {
        sqlx::query_as::<_, Language>(
            "SELECT id, name, code, created_at, updated_at FROM languages ORDER BY id",
        )
        .fetch_all(db)
        .await
    }

    pub async fn find(db: &PgPool, id: i64) -> sqlx::Result<Option<Language>> {
        sqlx::query_as::<_, Language>(
            "SELECT id, name, code, created_at, updated_at FROM languages WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    /// Pre-check for a taken code; the unique constraint is the backstop.
    pub async fn code_taken(db: &PgPool, code: &str, exclude_id: Option<i64>) -> sqlx::Result<bool> {
        let count: i64 = match exclude_id {
            Some(id) => {
                sqlx::query_scalar("SELECT COUNT(*) FROM languages WHERE code = $1 AND id != $2")
                    .bind(code)
                    .bind(id)
                    .fetch_one(db)
                    .await?
            }
            None => {
                sqlx::query_scalar("SELECT COUNT(*) FROM languages WHERE code = $1")
                    .bind(code)
                    .fetch_one(db)
                    .await?
            }
        };
        Ok(count > 0)
    }

    pub async fn create(db: &PgPool, name: &str, code: &str) -> sqlx::Result<Language> {
        sqlx::query_as::<_, Language>(
            r#"
            INSERT INTO languages (name, code)
            VALUES ($1, $2)
            RETURNING id, name, code, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(code)
        .fetch_one(db)
        .await
    }

    pub async fn update(db: &PgPool, id: i64, name: &str, code: &str) -> sqlx::Result<u64> {
        let result = sqlx::query(
            "UPDATE languages SET name = $1, code = $2, updated_at = NOW() WHERE id = $3",
        )
        .bind(name)
        .bind(code)
        .bind(id)
        .execute(db)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete(db: &PgPool, id: i64) -> sqlx::Result<u64> {
        let result = sqlx::query("DELETE FROM languages WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected())
    }
}
