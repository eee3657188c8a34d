use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::CompletionBackend;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Completion backend. `LlmClient` in production, a stub in tests.
    pub llm: Arc<dyn CompletionBackend>,
    pub sessions: Arc<SessionStore>,
    pub config: Config,
}
