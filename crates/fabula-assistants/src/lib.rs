pub mod client;
pub mod error;
pub mod poll;
pub mod traits;
pub mod types;

pub use client::AssistantsClient;
pub use error::AssistantsError;
pub use poll::PollConfig;
pub use traits::{AssistantSpec, AssistantsApi};
pub use types::{
    Assistant, BatchStatus, FileBatch, FileCounts, FileObject, MessageContent, MessageList, Run,
    RunError, RunStatus, TextValue, Thread, ThreadMessage, VectorStore,
};
