use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::repo::User;

impl User {
    pub async fn update_profile(
        db: &PgPool,
        id: Uuid,
        name: &str,
        email: &str,
        preferences: &serde_json::Value,
    ) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = $1, email = $2, preferences = $3, updated_at = now()
            WHERE id = $4
            RETURNING id, name, email, password_hash, preferences, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(preferences)
        .bind(id)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    /// Remove the user and everything they own in one transaction. The
    /// foreign keys on tasks/journals/mood_checkins forbid orphaned rows,
    /// so owned data goes with the account.
    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
        let mut tx = db.begin().await?;
        for table in ["tasks", "journals", "mood_checkins"] {
            sqlx::query(&format!("DELETE FROM {table} WHERE user_id = $1"))
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod db_tests {
    use time::OffsetDateTime;

    use crate::auth::repo::User;
    use crate::journals::repo::Journal;
    use crate::mood::repo::{Mood, MoodCheckIn};
    use crate::state::test_support;
    use crate::tasks::repo::Task;

    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    async fn account_deletion_succeeds_with_owned_rows() {
        let db = test_support::connect().await;
        let user_id = test_support::seed_user(&db).await;

        let task = Task::create(&db, user_id, &test_support::task_request("Write report"))
            .await
            .expect("create task");
        let journal = Journal::create(
            &db,
            user_id,
            OffsetDateTime::now_utc(),
            "Morning pages",
            "Slept well.",
        )
        .await
        .expect("create journal");
        let checkin = MoodCheckIn::create(&db, user_id, OffsetDateTime::now_utc(), Mood::Okay)
            .await
            .expect("create check-in");

        assert!(User::delete(&db, user_id).await.expect("delete account"));

        assert!(User::find_by_id(&db, user_id)
            .await
            .expect("query user")
            .is_none());
        assert!(Task::find_by_id(&db, user_id, task.id)
            .await
            .expect("query task")
            .is_none());
        assert!(Journal::find_by_id(&db, user_id, journal.id)
            .await
            .expect("query journal")
            .is_none());
        assert!(MoodCheckIn::find_by_id(&db, user_id, checkin.id)
            .await
            .expect("query check-in")
            .is_none());
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    async fn deleting_missing_account_reports_not_found() {
        let db = test_support::connect().await;
        assert!(!User::delete(&db, uuid::Uuid::new_v4())
            .await
            .expect("delete"));
    }
}
