use axum::routing::post;
use axum::Router;

use crate::handlers::generation;
use crate::state::AppState;

/// Single-call generation, merged at the `/api/v1` root.
///
/// ```text
/// POST   /generate        -> generate
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/generate", post(generation::generate))
}

/// Reference batches, merged at the `/api/v1` root outside the request
/// timeout. Each slot carries its own deadline.
///
/// ```text
/// POST   /generate-ref    -> generate_ref
/// ```
pub fn batch_router() -> Router<AppState> {
    Router::new().route("/generate-ref", post(generation::generate_ref))
}
