use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "mood_kind", rename_all = "snake_case")]
pub enum Mood {
    Great,
    Okay,
    NotGreat,
}

/// Mood check-in record in the database.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MoodCheckIn {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub user_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub datetime: OffsetDateTime,
    pub mood: Mood,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl MoodCheckIn {
    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        datetime: OffsetDateTime,
        mood: Mood,
    ) -> anyhow::Result<MoodCheckIn> {
        let checkin = sqlx::query_as::<_, MoodCheckIn>(
            r#"
            INSERT INTO mood_checkins (user_id, datetime, mood)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, datetime, mood, created_at
            "#,
        )
        .bind(user_id)
        .bind(datetime)
        .bind(mood)
        .fetch_one(db)
        .await?;
        Ok(checkin)
    }

    /// Most recent check-ins for the user, newest first.
    pub async fn list_by_user(
        db: &PgPool,
        user_id: Uuid,
        limit: i64,
    ) -> anyhow::Result<Vec<MoodCheckIn>> {
        let rows = sqlx::query_as::<_, MoodCheckIn>(
            r#"
            SELECT id, user_id, datetime, mood, created_at
            FROM mood_checkins
            WHERE user_id = $1
            ORDER BY datetime DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn find_by_id(
        db: &PgPool,
        user_id: Uuid,
        id: Uuid,
    ) -> anyhow::Result<Option<MoodCheckIn>> {
        let checkin = sqlx::query_as::<_, MoodCheckIn>(
            r#"
            SELECT id, user_id, datetime, mood, created_at
            FROM mood_checkins
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(checkin)
    }

    pub async fn delete(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM mood_checkins WHERE id = $1 AND user_id = $2")
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
    async fn checkins_are_invisible_to_other_users() {
        let db = test_support::connect().await;
        let owner = test_support::seed_user(&db).await;
        let other = test_support::seed_user(&db).await;

        let checkin = MoodCheckIn::create(&db, owner, OffsetDateTime::now_utc(), Mood::Great)
            .await
            .expect("create check-in");

        assert!(MoodCheckIn::find_by_id(&db, other, checkin.id)
            .await
            .expect("query as other user")
            .is_none());
        assert!(!MoodCheckIn::delete(&db, other, checkin.id)
            .await
            .expect("delete as other user"));
        assert!(MoodCheckIn::find_by_id(&db, owner, checkin.id)
            .await
            .expect("query as owner")
            .is_some());
        assert!(MoodCheckIn::delete(&db, owner, checkin.id)
            .await
            .expect("delete"));
    }
}
