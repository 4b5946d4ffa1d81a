use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

/// Owned by its participants: only sender and receiver can see a message,
/// only the sender can delete it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Message {
    pub id: i64,
    pub sender_id: i64,
    pub receiver_id: i64,
    pub content: String,
    pub is_read: bool,
    pub created_at: OffsetDateTime,
}

impl Message {
    pub async fn create(
        db: &PgPool,
        sender_id: i64,
        receiver_id: i64,
        content: &str,
    ) -> sqlx::Result<Message> {
        sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (sender_id, receiver_id, content)
            VALUES ($1, $2, $3)
            RETURNING id, sender_id, receiver_id, content, is_read, created_at
            "#,
        )
        .bind(sender_id)
        .bind(receiver_id)
        .bind(content)
        .fetch_one(db)
        .await
    }

    /// Everything the user sent or received, oldest first.
    pub async fn list_for_user(db: &PgPool, user_id: i64) -> sqlx::Result<Vec<Message>> {
        sqlx::query_as::<_, Message>(
            r#"
            SELECT id, sender_id, receiver_id, content, is_read, created_at
            FROM messages
            WHERE sender_id = $1 OR receiver_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await
    }

    /// Both directions between the user and a peer, oldest first.
    pub async fn conversation(
        db: &PgPool,
        user_id: i64,
        peer_id: i64,
    ) -> sqlx::Result<Vec<Message>> {
        sqlx::query_as::<_, Message>(
            r#"
            SELECT id, sender_id, receiver_id, content, is_read, created_at
            FROM messages
            WHERE (sender_id = $1 AND receiver_id = $2)
               OR (sender_id = $2 AND receiver_id = $1)
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(user_id)
        .bind(peer_id)
        .fetch_all(db)
        .await
    }

    pub async fn find_for_participant(
        db: &PgPool,
        id: i64,
        user_id: i64,
    ) -> sqlx::Result<Option<Message>> {
        sqlx::query_as::<_, Message>(
            r#"
            SELECT id, sender_id, receiver_id, content, is_read, created_at
            FROM messages
            WHERE id = $1 AND (sender_id = $2 OR receiver_id = $2)
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await
    }

    pub async fn delete_for_sender(db: &PgPool, id: i64, sender_id: i64) -> sqlx::Result<u64> {
        let result = sqlx::query("DELETE FROM messages WHERE id = $1 AND sender_id = $2")
            .bind(id)
            .bind(sender_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected())
    }
}
