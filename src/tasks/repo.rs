use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::tasks::dto::{CreateTaskRequest, TaskListQuery, UpdateTaskRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "kebab-case")]
#[sqlx(type_name = "task_status", rename_all = "kebab-case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
    Urgent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "task_category", rename_all = "lowercase")]
pub enum TaskCategory {
    Personal,
    Work,
    Health,
    Learning,
    Other,
}

/// Task record in the database.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub category: TaskCategory,
    #[serde(with = "time::serde::rfc3339::option")]
    pub due_date: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub completed_at: Option<OffsetDateTime>,
    pub estimated_time: Option<i32>,
    pub actual_time: Option<i32>,
    pub tags: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

const TASK_COLUMNS: &str = "id, user_id, title, description, status, priority, category, \
     due_date, completed_at, estimated_time, actual_time, tags, created_at, updated_at";

impl Task {
    /// Merge a partial update into the task. The completion timestamp is set
    /// on the first transition into `completed` and never cleared afterwards.
    pub fn apply_update(&mut self, upd: UpdateTaskRequest, now: OffsetDateTime) {
        if let Some(title) = upd.title {
            self.title = title;
        }
        if let Some(description) = upd.description {
            self.description = Some(description);
        }
        if let Some(status) = upd.status {
            if status == TaskStatus::Completed && self.completed_at.is_none() {
                self.completed_at = Some(now);
            }
            self.status = status;
        }
        if let Some(priority) = upd.priority {
            self.priority = priority;
        }
        if let Some(category) = upd.category {
            self.category = category;
        }
        if let Some(due_date) = upd.due_date {
            self.due_date = Some(due_date);
        }
        if let Some(estimated_time) = upd.estimated_time {
            self.estimated_time = Some(estimated_time);
        }
        if let Some(actual_time) = upd.actual_time {
            self.actual_time = Some(actual_time);
        }
        if let Some(tags) = upd.tags {
            self.tags = tags;
        }
        self.updated_at = now;
    }

    pub async fn create(db: &PgPool, user_id: Uuid, req: &CreateTaskRequest) -> anyhow::Result<Task> {
        let status = req.status.unwrap_or(TaskStatus::Pending);
        let completed_at =
            (status == TaskStatus::Completed).then(OffsetDateTime::now_utc);
        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            INSERT INTO tasks
                (user_id, title, description, status, priority, category,
                 due_date, completed_at, estimated_time, actual_time, tags)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(&req.title)
        .bind(&req.description)
        .bind(status)
        .bind(req.priority.unwrap_or(TaskPriority::Medium))
        .bind(req.category.unwrap_or(TaskCategory::Personal))
        .bind(req.due_date)
        .bind(completed_at)
        .bind(req.estimated_time)
        .bind(req.actual_time)
        .bind(&req.tags)
        .fetch_one(db)
        .await?;
        Ok(task)
    }

    pub async fn find_by_id(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(task)
    }

    /// Filtered, paginated list plus the total count matching the filter.
    pub async fn list(
        db: &PgPool,
        user_id: Uuid,
        query: &TaskListQuery,
        order: (&str, bool),
    ) -> anyhow::Result<(Vec<Task>, i64)> {
        fn push_filters<'a>(
            qb: &mut QueryBuilder<'a, Postgres>,
            user_id: Uuid,
            query: &'a TaskListQuery,
        ) {
            qb.push(" WHERE user_id = ").push_bind(user_id);
            if let Some(status) = query.status {
                qb.push(" AND status = ").push_bind(status);
            }
            if let Some(priority) = query.priority {
                qb.push(" AND priority = ").push_bind(priority);
            }
            if let Some(category) = query.category {
                qb.push(" AND category = ").push_bind(category);
            }
        }

        let (column, descending) = order;

        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {TASK_COLUMNS} FROM tasks"));
        push_filters(&mut qb, user_id, query);
        qb.push(format!(
            " ORDER BY {column} {}",
            if descending { "DESC" } else { "ASC" }
        ));
        qb.push(" LIMIT ").push_bind(query.limit);
        qb.push(" OFFSET ").push_bind(query.offset());
        let tasks = qb.build_query_as::<Task>().fetch_all(db).await?;

        let mut count_qb: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT count(*) FROM tasks");
        push_filters(&mut count_qb, user_id, query);
        let total: i64 = count_qb.build_query_scalar().fetch_one(db).await?;

        Ok((tasks, total))
    }

    pub async fn save(&self, db: &PgPool) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE tasks
            SET title = $1, description = $2, status = $3, priority = $4, category = $5,
                due_date = $6, completed_at = $7, estimated_time = $8, actual_time = $9,
                tags = $10, updated_at = $11
            WHERE id = $12 AND user_id = $13
            "#,
        )
        .bind(&self.title)
        .bind(&self.description)
        .bind(self.status)
        .bind(self.priority)
        .bind(self.category)
        .bind(self.due_date)
        .bind(self.completed_at)
        .bind(self.estimated_time)
        .bind(self.actual_time)
        .bind(&self.tags)
        .bind(self.updated_at)
        .bind(self.id)
        .bind(self.user_id)
        .execute(db)
        .await?;
        Ok(())
    }

    pub async fn delete(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn task() -> Task {
        let t0 = datetime!(2024-01-01 00:00:00 UTC);
        Task {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "Write report".into(),
            description: None,
            status: TaskStatus::Pending,
            priority: TaskPriority::Medium,
            category: TaskCategory::Personal,
            due_date: None,
            completed_at: None,
            estimated_time: None,
            actual_time: None,
            tags: vec![],
            created_at: t0,
            updated_at: t0,
        }
    }

    #[test]
    fn completing_sets_completed_at_once() {
        let mut t = task();
        let first = datetime!(2024-02-01 12:00:00 UTC);
        t.apply_update(
            UpdateTaskRequest {
                status: Some(TaskStatus::Completed),
                ..Default::default()
            },
            first,
        );
        assert_eq!(t.status, TaskStatus::Completed);
        assert_eq!(t.completed_at, Some(first));

        // Re-open, then complete again: the original timestamp survives.
        t.apply_update(
            UpdateTaskRequest {
                status: Some(TaskStatus::Pending),
                ..Default::default()
            },
            datetime!(2024-02-02 12:00:00 UTC),
        );
        assert_eq!(t.completed_at, Some(first));
        t.apply_update(
            UpdateTaskRequest {
                status: Some(TaskStatus::Completed),
                ..Default::default()
            },
            datetime!(2024-02-03 12:00:00 UTC),
        );
        assert_eq!(t.completed_at, Some(first));
    }

    #[test]
    fn partial_update_leaves_other_fields() {
        let mut t = task();
        let now = datetime!(2024-02-01 12:00:00 UTC);
        t.apply_update(
            UpdateTaskRequest {
                priority: Some(TaskPriority::Urgent),
                ..Default::default()
            },
            now,
        );
        assert_eq!(t.title, "Write report");
        assert_eq!(t.status, TaskStatus::Pending);
        assert_eq!(t.priority, TaskPriority::Urgent);
        assert_eq!(t.updated_at, now);
    }

    #[test]
    fn non_completed_update_does_not_touch_completed_at() {
        let mut t = task();
        t.apply_update(
            UpdateTaskRequest {
                status: Some(TaskStatus::InProgress),
                ..Default::default()
            },
            datetime!(2024-02-01 12:00:00 UTC),
        );
        assert_eq!(t.completed_at, None);
    }

    #[test]
    fn status_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"in-progress\""
        );
        let parsed: TaskStatus = serde_json::from_str("\"in-progress\"").unwrap();
        assert_eq!(parsed, TaskStatus::InProgress);
    }

    #[test]
    fn task_serializes_camel_case_without_owner() {
        let t = task();
        let json = serde_json::to_value(&t).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("dueDate").is_some());
        assert!(json.get("userId").is_none());
        assert!(json.get("user_id").is_none());
        assert_eq!(json["status"], "pending");
    }
}

#[cfg(test)]
mod db_tests {
    use super::*;
    use crate::state::test_support;

    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    async fn tasks_are_invisible_to_other_users() {
        let db = test_support::connect().await;
        let owner = test_support::seed_user(&db).await;
        let other = test_support::seed_user(&db).await;

        let task = Task::create(&db, owner, &test_support::task_request("Write report"))
            .await
            .expect("create task");

        assert!(Task::find_by_id(&db, other, task.id)
            .await
            .expect("query as other user")
            .is_none());
        assert!(!Task::delete(&db, other, task.id)
            .await
            .expect("delete as other user"));

        // Still there for the owner, and the owner can remove it.
        assert!(Task::find_by_id(&db, owner, task.id)
            .await
            .expect("query as owner")
            .is_some());
        assert!(Task::delete(&db, owner, task.id).await.expect("delete"));
    }
}
