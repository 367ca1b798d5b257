use crate::state::AppState;
use axum::{routing::get, Router};

pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/journals",
            get(handlers::list_journals).post(handlers::create_journal),
        )
        .route(
            "/journals/:id",
            get(handlers::get_journal)
                .put(handlers::update_journal)
                .delete(handlers::delete_journal),
        )
}
