use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, instrument, warn};

use crate::{
    auth::{handlers::is_valid_email, jwt::AuthUser, repo::User},
    error::{ApiError, ApiJson, FieldError},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub preferences: Option<Value>,
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Value>, ApiError> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;
    Ok(Json(json!({ "user": user })))
}

#[instrument(skip(state, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(payload): ApiJson<UpdateProfileRequest>,
) -> Result<Json<Value>, ApiError> {
    let current = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    let mut errors = Vec::new();
    let name = match payload.name {
        Some(name) => {
            let name = name.trim().to_string();
            let chars = name.chars().count();
            if !(2..=50).contains(&chars) {
                errors.push(FieldError::new(
                    "name",
                    "Name must be between 2 and 50 characters",
                ));
            }
            name
        }
        None => current.name.clone(),
    };
    let email = match payload.email {
        Some(email) => {
            let email = email.trim().to_lowercase();
            if !is_valid_email(&email) {
                errors.push(FieldError::new("email", "Please enter a valid email"));
            }
            email
        }
        None => current.email.clone(),
    };
    if !errors.is_empty() {
        warn!(user_id = %user_id, "profile validation failed");
        return Err(ApiError::Validation(errors));
    }

    // Check if email is already taken by another user
    if email != current.email {
        if let Some(existing) = User::find_by_email(&state.db, &email).await? {
            if existing.id != user_id {
                return Err(ApiError::BadRequest("Email is already in use".into()));
            }
        }
    }

    let preferences = match payload.preferences {
        Some(patch) => merge_preferences(&current.preferences, &patch),
        None => current.preferences.clone(),
    };

    let user = User::update_profile(&state.db, user_id, &name, &email, &preferences).await?;
    info!(user_id = %user_id, "profile updated");
    Ok(Json(json!({
        "message": "Profile updated successfully",
        "user": user,
    })))
}

#[instrument(skip(state))]
pub async fn delete_account(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Value>, ApiError> {
    if !User::delete(&state.db, user_id).await? {
        return Err(ApiError::NotFound("User"));
    }
    info!(user_id = %user_id, "account deleted");
    Ok(Json(json!({ "message": "Account deleted successfully" })))
}

/// Shallow merge: keys in the patch replace keys in the stored object.
fn merge_preferences(current: &Value, patch: &Value) -> Value {
    match (current.as_object(), patch.as_object()) {
        (Some(cur), Some(p)) => {
            let mut merged = cur.clone();
            for (k, v) in p {
                merged.insert(k.clone(), v.clone());
            }
            Value::Object(merged)
        }
        _ => patch.clone(),
    }
}
