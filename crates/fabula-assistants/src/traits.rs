use async_trait::async_trait;

use crate::error::Result;
use crate::types::{
    Assistant, FileBatch, FileObject, MessageList, Run, Thread, ThreadMessage, VectorStore,
};

/// Description of the assistant to provision at startup.
#[derive(Debug, Clone)]
pub struct AssistantSpec {
    pub name: String,
    pub description: String,
    pub model: String,
}

impl AssistantSpec {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            model: model.into(),
        }
    }
}

/// Provider operations the service depends on.
///
/// Implemented by [`crate::AssistantsClient`] against the hosted API;
/// consumers hold it as `Arc<dyn AssistantsApi>` so tests can substitute a
/// scripted fake.
#[async_trait]
pub trait AssistantsApi: Send + Sync {
    async fn create_vector_store(&self, name: &str) -> Result<VectorStore>;

    /// Create the assistant with the file-search capability declared.
    async fn create_assistant(&self, spec: &AssistantSpec) -> Result<Assistant>;

    /// Point the assistant's file-search tool at the given vector store.
    async fn bind_vector_store(
        &self,
        assistant_id: &str,
        vector_store_id: &str,
    ) -> Result<Assistant>;

    async fn create_thread(&self) -> Result<Thread>;

    /// Upload raw bytes to provider file storage, tagged for assistant use.
    async fn upload_file(&self, filename: &str, bytes: Vec<u8>) -> Result<FileObject>;

    /// Submit an uploaded file to the vector store and wait for indexing to
    /// reach a terminal status.
    async fn index_file(&self, vector_store_id: &str, file_id: &str) -> Result<FileBatch>;

    /// Append a user-authored message to the thread.
    async fn create_user_message(&self, thread_id: &str, content: &str) -> Result<ThreadMessage>;

    /// Start a run of the assistant on the thread and wait for a terminal
    /// status.
    async fn run_to_completion(&self, thread_id: &str, assistant_id: &str) -> Result<Run>;

    /// List the thread's messages, newest first.
    async fn list_messages(&self, thread_id: &str) -> Result<MessageList>;
}
