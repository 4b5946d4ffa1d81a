use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

/// User record. The password hash never serializes into a response.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl User {
    pub async fn find_by_username(db: &PgPool, username: &str) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, created_at, updated_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(db)
        .await
    }

    pub async fn find_by_id(db: &PgPool, id: i64) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    /// Best-effort pre-check for a taken username/email. The unique
    /// constraints on the table remain the final authority; a race between
    /// two registrations is settled there and reported as a conflict.
    pub async fn credentials_taken(
        db: &PgPool,
        username: &str,
        email: &str,
        exclude_id: Option<i64>,
    ) -> sqlx::Result<bool> {
        let count: i64 = match exclude_id {
            Some(id) => {
                sqlx::query_scalar(
                    "SELECT COUNT(*) FROM users WHERE (username = $1 OR email = $2) AND id != $3",
                )
                .bind(username)
                .bind(email)
                .bind(id)
                .fetch_one(db)
                .await?
            }
            None => {
                sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = $1 OR email = $2")
                    .bind(username)
                    .bind(email)
                    .fetch_one(db)
                    .await?
            }
        };
        Ok(count > 0)
    }

    pub async fn create(
        db: &PgPool,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, username, email, password_hash, created_at, updated_at
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(db)
        .await
    }

    pub async fn update_profile(
        db: &PgPool,
        id: i64,
        username: &str,
        email: &str,
    ) -> sqlx::Result<u64> {
        let result = sqlx::query(
            "UPDATE users SET username = $1, email = $2, updated_at = NOW() WHERE id = $3",
        )
        .bind(username)
        .bind(email)
        .bind(id)
        .execute(db)
        .await?;
        Ok(result.rows_affected())
    }
}
