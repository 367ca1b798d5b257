use crate::state::AppState;
use axum::{
    routing::{delete, get},
    Router,
};

pub mod handlers;
mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/users/profile",
            get(handlers::get_profile).put(handlers::update_profile),
        )
        .route("/users/account", delete(handlers::delete_account))
}
