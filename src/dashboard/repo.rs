use std::collections::HashMap;

use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::dashboard::dto::{DailyStat, DailyStatusCount, RecentTask};
use crate::tasks::repo::{TaskCategory, TaskPriority, TaskStatus};

#[derive(Debug, FromRow)]
pub struct TaskCounts {
    pub total: i64,
    pub completed: i64,
    pub pending: i64,
    pub in_progress: i64,
    pub monthly: i64,
    pub weekly: i64,
    pub overdue: i64,
}

pub async fn task_counts(
    db: &PgPool,
    user_id: Uuid,
    month_start: OffsetDateTime,
    week_start: OffsetDateTime,
    now: OffsetDateTime,
) -> anyhow::Result<TaskCounts> {
    let counts = sqlx::query_as::<_, TaskCounts>(
        r#"
        SELECT
            count(*) AS total,
            count(*) FILTER (WHERE status = 'completed') AS completed,
            count(*) FILTER (WHERE status = 'pending') AS pending,
            count(*) FILTER (WHERE status = 'in-progress') AS in_progress,
            count(*) FILTER (WHERE created_at >= $2) AS monthly,
            count(*) FILTER (WHERE created_at >= $3) AS weekly,
            count(*) FILTER (
                WHERE status IN ('pending', 'in-progress') AND due_date < $4
            ) AS overdue
        FROM tasks
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .bind(month_start)
    .bind(week_start)
    .bind(now)
    .fetch_one(db)
    .await?;
    Ok(counts)
}

pub async fn counts_by_priority(
    db: &PgPool,
    user_id: Uuid,
) -> anyhow::Result<HashMap<TaskPriority, i64>> {
    let rows: Vec<(TaskPriority, i64)> = sqlx::query_as(
        "SELECT priority, count(*) FROM tasks WHERE user_id = $1 GROUP BY priority",
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(rows.into_iter().collect())
}

pub async fn counts_by_category(
    db: &PgPool,
    user_id: Uuid,
) -> anyhow::Result<HashMap<TaskCategory, i64>> {
    let rows: Vec<(TaskCategory, i64)> = sqlx::query_as(
        "SELECT category, count(*) FROM tasks WHERE user_id = $1 GROUP BY category",
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(rows.into_iter().collect())
}

pub async fn recent_tasks(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<RecentTask>> {
    let rows = sqlx::query_as::<_, RecentTask>(
        r#"
        SELECT id, title, status, priority, due_date, updated_at
        FROM tasks
        WHERE user_id = $1
        ORDER BY updated_at DESC
        LIMIT 5
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Per-day created-task counts broken down by status, oldest day first.
pub async fn daily_stats(
    db: &PgPool,
    user_id: Uuid,
    since: OffsetDateTime,
) -> anyhow::Result<Vec<DailyStat>> {
    let rows: Vec<(String, TaskStatus, i64)> = sqlx::query_as(
        r#"
        SELECT to_char(created_at AT TIME ZONE 'UTC', 'YYYY-MM-DD') AS date,
               status,
               count(*)
        FROM tasks
        WHERE user_id = $1 AND created_at >= $2
        GROUP BY 1, 2
        ORDER BY 1
        "#,
    )
    .bind(user_id)
    .bind(since)
    .fetch_all(db)
    .await?;
    Ok(group_daily(rows))
}

pub(crate) fn group_daily(rows: Vec<(String, TaskStatus, i64)>) -> Vec<DailyStat> {
    let mut stats: Vec<DailyStat> = Vec::new();
    for (date, status, count) in rows {
        match stats.last_mut() {
            Some(day) if day.date == date => day.statuses.push(DailyStatusCount { status, count }),
            _ => stats.push(DailyStat {
                date,
                statuses: vec![DailyStatusCount { status, count }],
            }),
        }
    }
    stats
}

pub async fn average_completion_time(db: &PgPool, user_id: Uuid) -> anyhow::Result<f64> {
    let avg: f64 = sqlx::query_scalar(
        r#"
        SELECT COALESCE(AVG(actual_time), 0)::float8
        FROM tasks
        WHERE user_id = $1 AND status = 'completed' AND actual_time > 0
        "#,
    )
    .bind(user_id)
    .fetch_one(db)
    .await?;
    Ok(avg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_daily_folds_rows_per_day() {
        let rows = vec![
            ("2024-03-01".to_string(), TaskStatus::Pending, 2),
            ("2024-03-01".to_string(), TaskStatus::Completed, 1),
            ("2024-03-02".to_string(), TaskStatus::Completed, 3),
        ];
        let stats = group_daily(rows);
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].date, "2024-03-01");
        assert_eq!(stats[0].statuses.len(), 2);
        assert_eq!(stats[1].statuses[0].count, 3);
    }

    #[test]
    fn group_daily_empty() {
        assert!(group_daily(vec![]).is_empty());
    }
}
