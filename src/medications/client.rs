use std::time::Duration;

use axum::http::StatusCode;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::FdaConfig;
use crate::error::ApiError;
use crate::medications::dto::FdaResponse;

/// Upstream failure classes for the drug-database proxy. A single
/// timeout-bounded attempt is made; nothing is retried.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Search request timed out. Please try again.")]
    Timeout,
    #[error("Medication search service authentication failed")]
    AuthFailed,
    #[error("Medication search service access denied")]
    AccessDenied,
    #[error("Too many requests. Please wait a moment and try again.")]
    RateLimited,
    #[error("Invalid search request. Please check your search terms.")]
    InvalidRequest,
    #[error("Failed to search medications. Please try again later.")]
    Upstream,
}

impl From<SearchError> for ApiError {
    fn from(e: SearchError) -> Self {
        let status = match e {
            SearchError::Timeout => StatusCode::REQUEST_TIMEOUT,
            SearchError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            SearchError::InvalidRequest => StatusCode::BAD_REQUEST,
            SearchError::AuthFailed | SearchError::AccessDenied | SearchError::Upstream => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        ApiError::Upstream(status, e.to_string())
    }
}

/// Client for the openFDA drug product endpoint. Holds no credentials or
/// per-user state; built per request from the shared HTTP client and config.
pub struct FdaClient<'a> {
    http: &'a reqwest::Client,
    base_url: &'a str,
    timeout: Duration,
}

impl<'a> FdaClient<'a> {
    pub fn new(http: &'a reqwest::Client, config: &'a FdaConfig) -> Self {
        Self {
            http,
            base_url: &config.base_url,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Brand-name substring search. An upstream 404 means "no matches" and
    /// yields an empty result set rather than an error.
    pub async fn search_brand(&self, query: &str, limit: usize) -> Result<FdaResponse, SearchError> {
        debug!(query, limit, "searching medications");
        let response = self
            .http
            .get(self.base_url)
            .query(&[
                ("search", format!("products.brand_name:{query}")),
                ("limit", limit.to_string()),
            ])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    warn!(query, "medication search timed out");
                    SearchError::Timeout
                } else {
                    warn!(error = %e, query, "medication search request failed");
                    SearchError::Upstream
                }
            })?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(FdaResponse::default()),
            StatusCode::UNAUTHORIZED => Err(SearchError::AuthFailed),
            StatusCode::FORBIDDEN => Err(SearchError::AccessDenied),
            StatusCode::TOO_MANY_REQUESTS => Err(SearchError::RateLimited),
            status if status.is_client_error() => Err(SearchError::InvalidRequest),
            status if !status.is_success() => {
                warn!(%status, query, "medication search upstream error");
                Err(SearchError::Upstream)
            }
            _ => response.json::<FdaResponse>().await.map_err(|e| {
                warn!(error = %e, query, "medication search returned malformed body");
                SearchError::Upstream
            }),
        }
    }
}
