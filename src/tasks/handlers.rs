use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use time::OffsetDateTime;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::jwt::AuthUser,
    error::{ApiError, ApiJson, ApiQuery},
    state::AppState,
    tasks::dto::{
        parse_sort, CreateTaskRequest, Pagination, TaskListQuery, TaskListResponse,
        UpdateTaskRequest,
    },
    tasks::repo::Task,
};

#[instrument(skip(state))]
pub async fn list_tasks(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiQuery(query): ApiQuery<TaskListQuery>,
) -> Result<Json<TaskListResponse>, ApiError> {
    let errors = query.validate();
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }
    // validate() guarantees the sort key parses
    let order = parse_sort(&query.sort).ok_or_else(|| ApiError::BadRequest("Invalid sort".into()))?;

    let (tasks, total) = Task::list(&state.db, user_id, &query, order).await?;
    let pages = if total == 0 {
        0
    } else {
        (total + query.limit - 1) / query.limit
    };
    Ok(Json(TaskListResponse {
        tasks,
        pagination: Pagination {
            page: query.page,
            limit: query.limit,
            total,
            pages,
        },
    }))
}

#[instrument(skip(state))]
pub async fn get_task(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let task = Task::find_by_id(&state.db, user_id, id)
        .await?
        .ok_or(ApiError::NotFound("Task"))?;
    Ok(Json(json!({ "task": task })))
}

#[instrument(skip(state, payload))]
pub async fn create_task(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(mut payload): ApiJson<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let errors = payload.validate();
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let task = Task::create(&state.db, user_id, &payload).await?;
    info!(user_id = %user_id, task_id = %task.id, "task created");
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Task created successfully",
            "task": task,
        })),
    ))
}

#[instrument(skip(state, payload))]
pub async fn update_task(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    ApiJson(mut payload): ApiJson<UpdateTaskRequest>,
) -> Result<Json<Value>, ApiError> {
    let errors = payload.validate();
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let mut task = Task::find_by_id(&state.db, user_id, id)
        .await?
        .ok_or(ApiError::NotFound("Task"))?;

    task.apply_update(payload, OffsetDateTime::now_utc());
    task.save(&state.db).await?;

    info!(user_id = %user_id, task_id = %task.id, status = ?task.status, "task updated");
    Ok(Json(json!({
        "message": "Task updated successfully",
        "task": task,
    })))
}

#[instrument(skip(state))]
pub async fn delete_task(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    if !Task::delete(&state.db, user_id, id).await? {
        return Err(ApiError::NotFound("Task"));
    }
    info!(user_id = %user_id, task_id = %id, "task deleted");
    Ok(Json(json!({ "message": "Task deleted successfully" })))
}
