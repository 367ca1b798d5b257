use crate::state::AppState;
use axum::{routing::get, Router};

pub mod client;
pub mod dto;
pub mod handlers;

pub fn router() -> Router<AppState> {
    Router::new().route("/medications/search", get(handlers::search_medications))
}
