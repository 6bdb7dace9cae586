pub mod bootstrap;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use state::AppState;

/// API routes, shared between the binary and the handler tests.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(routes::health::liveness))
        .route("/upload-story/", post(routes::stories::upload_story))
        .route("/ask/", post(routes::questions::ask_question))
        .with_state(state)
}
