use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

/// Owned resource scoped to the account it was created for.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: OffsetDateTime,
}

impl Notification {
    pub async fn create(
        db: &PgPool,
        user_id: i64,
        kind: &str,
        message: &str,
    ) -> sqlx::Result<Notification> {
        sqlx::query_as::<_, Notification>(
            r#"
            INSERT INTO notifications (user_id, kind, message)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, kind, message, is_read, created_at
            "#,
        )
        .bind(user_id)
        .bind(kind)
        .bind(message)
        .fetch_one(db)
        .await
    }

    pub async fn list_for_user(db: &PgPool, user_id: i64) -> sqlx::Result<Vec<Notification>> {
        sqlx::query_as::<_, Notification>(
            r#"
            SELECT id, user_id, kind, message, is_read, created_at
            FROM notifications
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
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
    ) -> sqlx::Result<Option<Notification>> {
        sqlx::query_as::<_, Notification>(
            r#"
            SELECT id, user_id, kind, message, is_read, created_at
            FROM notifications
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await
    }

    pub async fn mark_read(db: &PgPool, id: i64, user_id: i64) -> sqlx::Result<u64> {
        let result =
            sqlx::query("UPDATE notifications SET is_read = TRUE WHERE id = $1 AND user_id = $2")
                .bind(id)
                .bind(user_id)
                .execute(db)
                .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete_for_user(db: &PgPool, id: i64, user_id: i64) -> sqlx::Result<u64> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected())
    }
}
