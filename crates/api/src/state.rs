use std::sync::Arc;

use refshoot_imagegen::ImageGenerator;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone; everything lives behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Image-generation backend (the provider client in production, a fake
    /// in tests).
    pub generator: Arc<dyn ImageGenerator>,
}
