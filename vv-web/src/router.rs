use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{download, index, process};
use crate::state::AppState;

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/process", post(process))
        .route("/download/:id", get(download))
        .layer(DefaultBodyLimit::max(32 * 1024 * 1024))
        .with_state(state)
}
