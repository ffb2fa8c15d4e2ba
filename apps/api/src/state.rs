use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::Config;
use crate::llm_client::CompletionClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Read-only lookup store, opened at startup and closed after shutdown.
    pub db: SqlitePool,
    /// Completion backend. Default: `LlmClient`; tests swap in a stub.
    pub llm: Arc<dyn CompletionClient>,
    pub config: Config,
}
