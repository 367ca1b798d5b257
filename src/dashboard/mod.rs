use crate::state::AppState;
use axum::{routing::get, Router};

pub mod dto;
pub mod handlers;
mod repo;
pub mod service;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(handlers::get_dashboard))
        .route("/dashboard/analytics", get(handlers::get_analytics))
}
