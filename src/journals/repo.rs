use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Journal entry record in the database.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Journal {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub user_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    pub title: String,
    pub entry: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Journal {
    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        date: OffsetDateTime,
        title: &str,
        entry: &str,
    ) -> anyhow::Result<Journal> {
        let journal = sqlx::query_as::<_, Journal>(
            r#"
            INSERT INTO journals (user_id, date, title, entry)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, date, title, entry, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(date)
        .bind(title)
        .bind(entry)
        .fetch_one(db)
        .await?;
        Ok(journal)
    }

    /// All entries for the user, newest date first.
    pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Journal>> {
        let rows = sqlx::query_as::<_, Journal>(
            r#"
            SELECT id, user_id, date, title, entry, created_at, updated_at
            FROM journals
            WHERE user_id = $1
            ORDER BY date DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn find_by_id(
        db: &PgPool,
        user_id: Uuid,
        id: Uuid,
    ) -> anyhow::Result<Option<Journal>> {
        let journal = sqlx::query_as::<_, Journal>(
            r#"
            SELECT id, user_id, date, title, entry, created_at, updated_at
            FROM journals
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(journal)
    }

    pub async fn save(&self, db: &PgPool) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE journals
            SET date = $1, title = $2, entry = $3, updated_at = now()
            WHERE id = $4 AND user_id = $5
            "#,
        )
        .bind(self.date)
        .bind(&self.title)
        .bind(&self.entry)
        .bind(self.id)
        .bind(self.user_id)
        .execute(db)
        .await?;
        Ok(())
    }

    pub async fn delete(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM journals WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod db_tests {
    use super::*;
    use crate::state::test_support;

    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    async fn journals_are_invisible_to_other_users() {
        let db = test_support::connect().await;
        let owner = test_support::seed_user(&db).await;
        let other = test_support::seed_user(&db).await;

        let journal = Journal::create(
            &db,
            owner,
            OffsetDateTime::now_utc(),
            "Morning pages",
            "Slept well.",
        )
        .await
        .expect("create journal");

        assert!(Journal::find_by_id(&db, other, journal.id)
            .await
            .expect("query as other user")
            .is_none());
        assert!(!Journal::delete(&db, other, journal.id)
            .await
            .expect("delete as other user"));
        assert!(Journal::find_by_id(&db, owner, journal.id)
            .await
            .expect("query as owner")
            .is_some());
        assert!(Journal::delete(&db, owner, journal.id)
            .await
            .expect("delete"));
    }
}
