use std::sync::Arc;

use fabula_assistants::AssistantsApi;

use crate::config::Config;

/// Identifiers of the provider resources provisioned at startup.
///
/// Immutable once constructed; every handler reads the same triple for the
/// lifetime of the process.
#[derive(Debug, Clone)]
pub struct AssistantHandles {
    pub vector_store_id: String,
    pub assistant_id: String,
    pub thread_id: String,
}

/// Shared application state passed to all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub assistants: Arc<dyn AssistantsApi>,
    pub handles: AssistantHandles,
}

impl AppState {
    pub fn new(
        config: Config,
        assistants: Arc<dyn AssistantsApi>,
        handles: AssistantHandles,
    ) -> Self {
        Self {
            config: Arc::new(config),
            assistants,
            handles,
        }
    }
}
