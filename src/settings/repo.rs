use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

/// Per-account settings row, created with defaults at registration.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserSettings {
    pub id: i64,
    pub user_id: i64,
    pub theme: String,
    pub language: String,
    pub notifications_enabled: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl UserSettings {
    pub async fn create_defaults(db: &PgPool, user_id: i64) -> sqlx::Result<UserSettings> {
        sqlx::query_as::<_, UserSettings>(
            r#"
            INSERT INTO user_settings (user_id)
            VALUES ($1)
            RETURNING id, user_id, theme, language, notifications_enabled, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .fetch_one(db)
        .await
    }

    pub async fn find_by_user(db: &PgPool, user_id: i64) -> sqlx::Result<Option<UserSettings>> {
        sqlx::query_as::<_, UserSettings>(
            r#"
            SELECT id, user_id, theme, language, notifications_enabled, created_at, updated_at
            FROM user_settings
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(db)
        .await
    }

    /// Scoped by user_id; zero rows means the caller has no settings row.
    pub async fn update_for_user(
        db: &PgPool,
        user_id: i64,
        theme: &str,
        language: &str,
        notifications_enabled: bool,
    ) -> sqlx::Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE user_settings
            SET theme = $1, language = $2, notifications_enabled = $3, updated_at = NOW()
            WHERE user_id = $4
            "#,
        )
        .bind(theme)
        .bind(language)
        .bind(notifications_enabled)
        .bind(user_id)
        .execute(db)
        .await?;
        Ok(result.rows_affected())
    }
}
