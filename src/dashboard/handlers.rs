use axum::{extract::State, Json};
use time::{Duration, OffsetDateTime};
use tracing::instrument;

use crate::{
    auth::jwt::AuthUser,
    dashboard::dto::{AnalyticsQuery, AnalyticsResponse, DashboardResponse, Summary},
    dashboard::{repo, service},
    error::{ApiError, ApiQuery, FieldError},
    state::AppState,
};

#[instrument(skip(state))]
pub async fn get_dashboard(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<DashboardResponse>, ApiError> {
    let now = OffsetDateTime::now_utc();
    let month_start = service::start_of_month(now)?;
    let week_start = service::start_of_week(now);

    let counts = repo::task_counts(&state.db, user_id, month_start, week_start, now).await?;
    let tasks_by_priority = repo::counts_by_priority(&state.db, user_id).await?;
    let tasks_by_category = repo::counts_by_category(&state.db, user_id).await?;
    let recent_tasks = repo::recent_tasks(&state.db, user_id).await?;

    let completion_rate = service::completion_rate(counts.completed, counts.total);
    let summary = Summary {
        message: service::motivational_message(completion_rate, counts.overdue),
        productivity: service::productivity_level(completion_rate),
    };

    Ok(Json(DashboardResponse {
        total_tasks: counts.total,
        completed_tasks: counts.completed,
        pending_tasks: counts.pending + counts.in_progress,
        weekly_goals: counts.weekly,
        monthly_tasks: counts.monthly,
        weekly_tasks: counts.weekly,
        overdue_tasks: counts.overdue,
        completion_rate,
        recent_tasks,
        tasks_by_priority,
        tasks_by_category,
        summary,
    }))
}

#[instrument(skip(state))]
pub async fn get_analytics(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiQuery(query): ApiQuery<AnalyticsQuery>,
) -> Result<Json<AnalyticsResponse>, ApiError> {
    if query.period < 1 || query.period > 365 {
        return Err(ApiError::Validation(vec![FieldError::new(
            "period",
            "Period must be between 1 and 365 days",
        )]));
    }

    let since = OffsetDateTime::now_utc() - Duration::days(query.period);
    let daily_stats = repo::daily_stats(&state.db, user_id, since).await?;
    let average_completion_time = repo::average_completion_time(&state.db, user_id).await?;

    Ok(Json(AnalyticsResponse {
        period: query.period,
        daily_stats,
        average_completion_time,
    }))
}
