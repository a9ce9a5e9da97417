use std::sync::Arc;

use crate::config::Config;
use crate::context::store::ContextStore;
use crate::sync::session::SessionRegistry;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Open conversations, each owning its canonical document.
    pub sessions: Arc<SessionRegistry>,
    /// Pluggable persistence for generated context summaries.
    pub context_store: Arc<dyn ContextStore>,
}
