pub mod generation;
pub mod health;
pub mod jobs;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` routes that run under the request timeout.
///
/// ```text
/// /jobs/preview        validate, group, map and render a job (POST)
///
/// /generate            text-to-image (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/jobs", jobs::router())
        .merge(generation::router())
}

/// Build the `/api/v1` routes exempt from the request timeout.
///
/// ```text
/// /generate-ref        reference-image batch, multipart (POST)
/// ```
pub fn batch_routes() -> Router<AppState> {
    generation::batch_router()
}
