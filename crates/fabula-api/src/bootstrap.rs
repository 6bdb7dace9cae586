//! Startup provisioning of the provider-side resources.

use fabula_assistants::{AssistantsApi, AssistantsError};

use crate::config::AssistantConfig;
use crate::state::AssistantHandles;

/// Provision the vector store, assistant, and conversation thread.
///
/// Runs once, before the listener binds; a failure aborts startup so the
/// process never serves requests without valid handles.
pub async fn provision(
    assistants: &dyn AssistantsApi,
    config: &AssistantConfig,
) -> Result<AssistantHandles, AssistantsError> {
    let vector_store = assistants
        .create_vector_store(&config.vector_store_name)
        .await?;
    tracing::info!(vector_store_id = %vector_store.id, "Vector store created");

    let assistant = assistants.create_assistant(&config.spec()).await?;
    tracing::info!(assistant_id = %assistant.id, "Assistant created");

    let assistant = assistants
        .bind_vector_store(&assistant.id, &vector_store.id)
        .await?;
    tracing::info!(assistant_id = %assistant.id, "Assistant bound to vector store");

    let thread = assistants.create_thread().await?;
    tracing::info!(thread_id = %thread.id, "Conversation thread created");

    Ok(AssistantHandles {
        vector_store_id: vector_store.id,
        assistant_id: assistant.id,
        thread_id: thread.id,
    })
}
