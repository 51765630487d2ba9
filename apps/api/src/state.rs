use std::sync::Arc;

use crate::config::Config;
use crate::taxonomy::Taxonomy;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Read-only skills catalog, loaded once at startup.
    pub taxonomy: Arc<Taxonomy>,
}
