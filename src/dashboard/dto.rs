use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::tasks::repo::{TaskCategory, TaskPriority, TaskStatus};

#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RecentTask {
    pub id: Uuid,
    pub title: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    #[serde(with = "time::serde::rfc3339::option")]
    pub due_date: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub message: &'static str,
    pub productivity: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub total_tasks: i64,
    pub completed_tasks: i64,
    /// Pending and in-progress combined, as displayed on the dashboard.
    pub pending_tasks: i64,
    pub weekly_goals: i64,
    pub monthly_tasks: i64,
    pub weekly_tasks: i64,
    pub overdue_tasks: i64,
    pub completion_rate: f64,
    pub recent_tasks: Vec<RecentTask>,
    pub tasks_by_priority: HashMap<TaskPriority, i64>,
    pub tasks_by_category: HashMap<TaskCategory, i64>,
    pub summary: Summary,
}

#[derive(Debug, Deserialize)]
pub struct AnalyticsQuery {
    #[serde(default = "default_period")]
    pub period: i64,
}

fn default_period() -> i64 {
    30
}

#[derive(Debug, Serialize)]
pub struct DailyStatusCount {
    pub status: TaskStatus,
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct DailyStat {
    pub date: String,
    pub statuses: Vec<DailyStatusCount>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResponse {
    pub period: i64,
    pub daily_stats: Vec<DailyStat>,
    pub average_completion_time: f64,
}
