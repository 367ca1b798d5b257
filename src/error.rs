use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        FromRequest, FromRequestParts, Request,
    },
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// A single validation failure, reported with the offending field.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    /// Failure from an upstream integration, already mapped to the status
    /// and message the caller should see.
    #[error("{1}")]
    Upstream(StatusCode, String),

    #[error("Server error")]
    Internal(#[from] anyhow::Error),
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::Internal(anyhow::Error::new(e))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                json!({ "message": "Validation failed", "errors": errors }),
            ),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "message": msg })),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, json!({ "message": msg })),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, json!({ "message": msg })),
            ApiError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                json!({ "message": format!("{what} not found") }),
            ),
            ApiError::Upstream(status, msg) => (status, json!({ "message": msg })),
            ApiError::Internal(e) => {
                error!(error = %e, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "message": "Server error" }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

/// `axum::Json` with rejections mapped into the shared error envelope.
pub struct ApiJson<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rej| ApiError::BadRequest(rej.body_text()))?;
        Ok(Self(value))
    }
}

/// `axum::extract::Query` with rejections mapped into the shared error envelope.
pub struct ApiQuery<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    axum::extract::Query<T>: FromRequestParts<S, Rejection = QueryRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let axum::extract::Query(value) = axum::extract::Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rej| ApiError::BadRequest(rej.body_text()))?;
        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_match_taxonomy() {
        let cases = [
            (
                ApiError::Validation(vec![FieldError::new("title", "required")]),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::BadRequest("bad".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::Unauthorized("no token".into()),
                StatusCode::UNAUTHORIZED,
            ),
            (ApiError::Conflict("taken".into()), StatusCode::CONFLICT),
            (ApiError::NotFound("Task"), StatusCode::NOT_FOUND),
            (
                ApiError::Upstream(StatusCode::REQUEST_TIMEOUT, "timed out".into()),
                StatusCode::REQUEST_TIMEOUT,
            ),
            (
                ApiError::Internal(anyhow::anyhow!("boom")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn not_found_message_names_the_resource() {
        assert_eq!(ApiError::NotFound("Task").to_string(), "Task not found");
    }
}
