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
    error::{ApiError, ApiJson, ApiQuery, FieldError},
    mood::repo::{Mood, MoodCheckIn},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct CreateCheckInRequest {
    pub mood: Option<Mood>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub datetime: Option<OffsetDateTime>,
}

#[derive(Debug, Deserialize)]
pub struct CheckInListQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    50
}

#[instrument(skip(state, payload))]
pub async fn create_checkin(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(payload): ApiJson<CreateCheckInRequest>,
) -> Result<(StatusCode, Json<MoodCheckIn>), ApiError> {
    let mood = payload.mood.ok_or_else(|| {
        ApiError::Validation(vec![FieldError::new("mood", "Mood is required")])
    })?;

    let datetime = payload.datetime.unwrap_or_else(OffsetDateTime::now_utc);
    let checkin = MoodCheckIn::create(&state.db, user_id, datetime, mood).await?;
    info!(user_id = %user_id, checkin_id = %checkin.id, mood = ?mood, "mood check-in created");
    Ok((StatusCode::CREATED, Json(checkin)))
}

#[instrument(skip(state))]
pub async fn list_checkins(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiQuery(query): ApiQuery<CheckInListQuery>,
) -> Result<Json<Vec<MoodCheckIn>>, ApiError> {
    if query.limit < 1 {
        return Err(ApiError::Validation(vec![FieldError::new(
            "limit",
            "Limit must be at least 1",
        )]));
    }
    let checkins = MoodCheckIn::list_by_user(&state.db, user_id, query.limit).await?;
    Ok(Json(checkins))
}

#[instrument(skip(state))]
pub async fn get_checkin(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MoodCheckIn>, ApiError> {
    let checkin = MoodCheckIn::find_by_id(&state.db, user_id, id)
        .await?
        .ok_or(ApiError::NotFound("Mood check-in"))?;
    Ok(Json(checkin))
}

#[instrument(skip(state))]
pub async fn delete_checkin(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    if !MoodCheckIn::delete(&state.db, user_id, id).await? {
        return Err(ApiError::NotFound("Mood check-in"));
    }
    info!(user_id = %user_id, checkin_id = %id, "mood check-in deleted");
    Ok(Json(json!({ "message": "Mood check-in deleted successfully" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_query_default_limit() {
        let q: CheckInListQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(q.limit, 50);
    }

    #[test]
    fn create_request_accepts_known_moods_only() {
        let ok: CreateCheckInRequest =
            serde_json::from_str(r#"{"mood":"not_great"}"#).unwrap();
        assert_eq!(ok.mood, Some(Mood::NotGreat));
        assert!(serde_json::from_str::<CreateCheckInRequest>(r#"{"mood":"angry"}"#).is_err());
    }
}
