use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::Completion;
use crate::storage::FileStore;
use crate::store::Store;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    /// Chat completion backend. Production: `LlmClient`.
    pub llm: Arc<dyn Completion>,
    /// Where uploaded résumé files live (local disk or S3).
    pub files: Arc<dyn FileStore>,
    pub config: Config,
}
