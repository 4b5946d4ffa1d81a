use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};

/// Owned resource: every statement carries `user_id` in its predicate so a
/// non-owner's read or write touches zero rows.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StudyPlan {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub focus_duration: i32,
    pub break_duration: i32,
    pub sessions_completed: i32,
    pub total_focus_time: i32,
    pub status: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StudySession {
    pub id: i64,
    pub study_plan_id: i64,
    pub duration: i32,
    pub session_type: String,
    pub completed: bool,
    pub created_at: OffsetDateTime,
}

#[derive(Debug)]
pub struct NewStudyPlan<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub focus_duration: i32,
    pub break_duration: i32,
    pub status: &'a str,
}

const PLAN_COLUMNS: &str = r#"
    id, user_id, title, description, start_date, end_date,
    focus_duration, break_duration, sessions_completed, total_focus_time,
    status, created_at, updated_at
"#;

impl StudyPlan {
    pub async fn list_for_user(db: &PgPool, user_id: i64) -> sqlx::Result<Vec<StudyPlan>> {
        let sql = format!(
            "SELECT {PLAN_COLUMNS} FROM study_plans WHERE user_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, StudyPlan>(&sql)
            .bind(user_id)
            .fetch_all(db)
            .await
    }

    pub async fn find_for_user(
        db: &PgPool,
        id: i64,
        user_id: i64,
    ) -> sqlx::Result<Option<StudyPlan>> {
        let sql = format!("SELECT {PLAN_COLUMNS} FROM study_plans WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, StudyPlan>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(db)
            .await
    }

    pub async fn create(
        db: &PgPool,
        user_id: i64,
        plan: NewStudyPlan<'_>,
    ) -> sqlx::Result<StudyPlan> {
        let sql = format!(
            r#"
            INSERT INTO study_plans
                (user_id, title, description, start_date, end_date,
                 focus_duration, break_duration, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {PLAN_COLUMNS}
            "#
        );
        sqlx::query_as::<_, StudyPlan>(&sql)
            .bind(user_id)
            .bind(plan.title)
            .bind(plan.description)
            .bind(plan.start_date)
            .bind(plan.end_date)
            .bind(plan.focus_duration)
            .bind(plan.break_duration)
            .bind(plan.status)
            .fetch_one(db)
            .await
    }

    pub async fn update_for_user(
        db: &PgPool,
        id: i64,
        user_id: i64,
        plan: NewStudyPlan<'_>,
    ) -> sqlx::Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE study_plans
            SET title = $1, description = $2, start_date = $3, end_date = $4,
                focus_duration = $5, break_duration = $6, status = $7, updated_at = NOW()
            WHERE id = $8 AND user_id = $9
            "#,
        )
        .bind(plan.title)
        .bind(plan.description)
        .bind(plan.start_date)
        .bind(plan.end_date)
        .bind(plan.focus_duration)
        .bind(plan.break_duration)
        .bind(plan.status)
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete_for_user(db: &PgPool, id: i64, user_id: i64) -> sqlx::Result<u64> {
        let result = sqlx::query("DELETE FROM study_plans WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected())
    }

    /// Counter bump happens in the database, never as read-then-write in the
    /// application, so concurrent session completions on the same plan do not
    /// lose updates. Returns the fresh counter values.
    pub async fn bump_session_counters(
        db: &PgPool,
        id: i64,
        user_id: i64,
        focus_seconds: i32,
    ) -> sqlx::Result<Option<(i32, i32)>> {
        sqlx::query_as::<_, (i32, i32)>(
            r#"
            UPDATE study_plans
            SET sessions_completed = sessions_completed + 1,
                total_focus_time = total_focus_time + $1,
                updated_at = NOW()
            WHERE id = $2 AND user_id = $3
            RETURNING sessions_completed, total_focus_time
            "#,
        )
        .bind(focus_seconds)
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await
    }
}

impl StudySession {
    pub async fn create(
        db: &PgPool,
        study_plan_id: i64,
        duration: i32,
        session_type: &str,
    ) -> sqlx::Result<StudySession> {
        sqlx::query_as::<_, StudySession>(
            r#"
            INSERT INTO study_sessions (study_plan_id, duration, session_type)
            VALUES ($1, $2, $3)
            RETURNING id, study_plan_id, duration, session_type, completed, created_at
            "#,
        )
        .bind(study_plan_id)
        .bind(duration)
        .bind(session_type)
        .fetch_one(db)
        .await
    }

    /// Compensating delete for a session whose counter bump failed.
    pub async fn delete(db: &PgPool, id: i64) -> sqlx::Result<u64> {
        let result = sqlx::query("DELETE FROM study_sessions WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn list_for_plan(db: &PgPool, study_plan_id: i64) -> sqlx::Result<Vec<StudySession>> {
        sqlx::query_as::<_, StudySession>(
            r#"
            SELECT id, study_plan_id, duration, session_type, completed, created_at
            FROM study_sessions
            WHERE study_plan_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(study_plan_id)
        .fetch_all(db)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repo::User;

    fn plan_input() -> NewStudyPlan<'static> {
        NewStudyPlan {
            title: "Rust in a month",
            description: "Daily drills",
            start_date: None,
            end_date: None,
            focus_duration: 1500,
            break_duration: 300,
            status: "active",
        }
    }

    #[sqlx::test]
    async fn non_owner_queries_touch_zero_rows(db: PgPool) {
        let alice = User::create(&db, "alice", "alice@example.com", "hash-a")
            .await
            .unwrap();
        let bob = User::create(&db, "bob", "bob@example.com", "hash-b")
            .await
            .unwrap();
        let plan = StudyPlan::create(&db, alice.id, plan_input()).await.unwrap();

        assert!(StudyPlan::find_for_user(&db, plan.id, bob.id)
            .await
            .unwrap()
            .is_none());
        assert_eq!(
            StudyPlan::update_for_user(&db, plan.id, bob.id, plan_input())
                .await
                .unwrap(),
            0
        );
        assert_eq!(
            StudyPlan::delete_for_user(&db, plan.id, bob.id)
                .await
                .unwrap(),
            0
        );
        assert!(StudyPlan::bump_session_counters(&db, plan.id, bob.id, 60)
            .await
            .unwrap()
            .is_none());

        // the owner still sees the untouched plan
        let mine = StudyPlan::find_for_user(&db, plan.id, alice.id)
            .await
            .unwrap()
            .expect("owner's plan survives the non-owner's writes");
        assert_eq!(mine.sessions_completed, 0);
    }
}
