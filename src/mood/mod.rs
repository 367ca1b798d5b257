use crate::state::AppState;
use axum::{routing::get, Router};

pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/mood-checkins",
            get(handlers::list_checkins).post(handlers::create_checkin),
        )
        .route(
            "/mood-checkins/:id",
            get(handlers::get_checkin).delete(handlers::delete_checkin),
        )
}
