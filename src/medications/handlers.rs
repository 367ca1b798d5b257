use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::{info, instrument};

use crate::{
    auth::jwt::AuthUser,
    error::{ApiError, ApiQuery},
    medications::client::FdaClient,
    medications::dto::{clamp_limit, flatten_results, SearchResponse},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct MedSearchQuery {
    pub q: Option<String>,
    pub limit: Option<i64>,
}

#[instrument(skip(state))]
pub async fn search_medications(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiQuery(query): ApiQuery<MedSearchQuery>,
) -> Result<Json<SearchResponse>, ApiError> {
    let q = query.q.as_deref().map(str::trim).unwrap_or_default();
    if q.is_empty() {
        return Err(ApiError::BadRequest("Search query is required".into()));
    }
    let limit = clamp_limit(query.limit);

    let client = FdaClient::new(&state.http, &state.config.fda);
    let upstream = client.search_brand(q, limit).await?;
    let results = flatten_results(upstream.results, limit);

    info!(user_id = %user_id, query = q, total = results.len(), "medication search");
    Ok(Json(SearchResponse {
        success: true,
        query: q.to_string(),
        total: results.len(),
        results,
    }))
}
