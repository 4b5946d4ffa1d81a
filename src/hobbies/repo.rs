use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

/// Shared catalog resource: globally readable, not owned by any account.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Hobby {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub image_url: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Hobby {
    pub async fn list(db: &PgPool) -> sqlx::Result<Vec<Hobby>> {
        sqlx::query_as::<_, Hobby>(
            r#"
            SELECT id, name, description, category, image_url, created_at, updated_at
            FROM hobbies
            ORDER BY id
            "#,
        )
        .fetch_all(db)
        .await
    }

    pub async fn find(db: &PgPool, id: i64) -> sqlx::Result<Option<Hobby>> {
        sqlx::query_as::<_, Hobby>(
            r#"
            SELECT id, name, description, category, image_url, created_at, updated_at
            FROM hobbies
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    pub async fn create(
        db: &PgPool,
        name: &str,
        description: Option<&str>,
        category: &str,
        image_url: Option<&str>,
    ) -> sqlx::Result<Hobby> {
        sqlx::query_as::<_, Hobby>(
            r#"
            INSERT INTO hobbies (name, description, category, image_url)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, description, category, image_url, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(category)
        .bind(image_url)
        .fetch_one(db)
        .await
    }

    pub async fn update(
        db: &PgPool,
        id: i64,
        name: &str,
        description: Option<&str>,
        category: &str,
        image_url: Option<&str>,
    ) -> sqlx::Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE hobbies
            SET name = $1, description = $2, category = $3, image_url = $4, updated_at = NOW()
            WHERE id = $5
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(category)
        .bind(image_url)
        .bind(id)
        .execute(db)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete(db: &PgPool, id: i64) -> sqlx::Result<u64> {
        let result = sqlx::query("DELETE FROM hobbies WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected())
    }
}
