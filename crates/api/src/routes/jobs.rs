//! Route definitions for the `/jobs` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::jobs;
use crate::state::AppState;

/// Routes mounted at `/jobs`.
///
/// ```text
/// POST   /preview         -> preview_job
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/preview", post(jobs::preview_job))
}
