use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use time::OffsetDateTime;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::jwt::AuthUser,
    error::{ApiError, ApiJson, FieldError},
    journals::repo::Journal,
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct CreateJournalRequest {
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub date: Option<OffsetDateTime>,
    pub title: Option<String>,
    pub entry: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateJournalRequest {
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub date: Option<OffsetDateTime>,
    pub title: Option<String>,
    pub entry: Option<String>,
}

#[instrument(skip(state, payload))]
pub async fn create_journal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(payload): ApiJson<CreateJournalRequest>,
) -> Result<(StatusCode, Json<Journal>), ApiError> {
    let mut errors = Vec::new();
    let title = payload.title.as_deref().map(str::trim).unwrap_or_default();
    if title.is_empty() {
        errors.push(FieldError::new("title", "Title is required"));
    }
    let entry = payload.entry.as_deref().unwrap_or_default();
    if entry.is_empty() {
        errors.push(FieldError::new("entry", "Entry is required"));
    }
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let date = payload.date.unwrap_or_else(OffsetDateTime::now_utc);
    let journal = Journal::create(&state.db, user_id, date, title, entry).await?;
    info!(user_id = %user_id, journal_id = %journal.id, "journal entry created");
    Ok((StatusCode::CREATED, Json(journal)))
}

#[instrument(skip(state))]
pub async fn list_journals(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<Journal>>, ApiError> {
    let journals = Journal::list_by_user(&state.db, user_id).await?;
    Ok(Json(journals))
}

#[instrument(skip(state))]
pub async fn get_journal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Journal>, ApiError> {
    let journal = Journal::find_by_id(&state.db, user_id, id)
        .await?
        .ok_or(ApiError::NotFound("Journal entry"))?;
    Ok(Json(journal))
}

#[instrument(skip(state, payload))]
pub async fn update_journal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    ApiJson(payload): ApiJson<UpdateJournalRequest>,
) -> Result<Json<Journal>, ApiError> {
    let mut journal = Journal::find_by_id(&state.db, user_id, id)
        .await?
        .ok_or(ApiError::NotFound("Journal entry"))?;

    if let Some(date) = payload.date {
        journal.date = date;
    }
    if let Some(title) = payload.title {
        let title = title.trim().to_string();
        if title.is_empty() {
            return Err(ApiError::Validation(vec![FieldError::new(
                "title",
                "Title is required",
            )]));
        }
        journal.title = title;
    }
    if let Some(entry) = payload.entry {
        if entry.is_empty() {
            return Err(ApiError::Validation(vec![FieldError::new(
                "entry",
                "Entry is required",
            )]));
        }
        journal.entry = entry;
    }

    journal.save(&state.db).await?;
    info!(user_id = %user_id, journal_id = %journal.id, "journal entry updated");
    Ok(Json(journal))
}

#[instrument(skip(state))]
pub async fn delete_journal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    if !Journal::delete(&state.db, user_id, id).await? {
        return Err(ApiError::NotFound("Journal entry"));
    }
    info!(user_id = %user_id, journal_id = %id, "journal entry deleted");
    Ok(Json(json!({ "message": "Journal entry deleted successfully" })))
}
