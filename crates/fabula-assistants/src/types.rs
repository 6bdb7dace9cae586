//! Wire types for the slice of the Assistants v2 API this crate consumes.

use serde::{Deserialize, Serialize};

/// Provider-side index of uploaded files, searchable by an assistant.
#[derive(Debug, Clone, Deserialize)]
pub struct VectorStore {
    pub id: String,
    pub name: Option<String>,
}

/// Conversational agent configured with the file-search capability.
#[derive(Debug, Clone, Deserialize)]
pub struct Assistant {
    pub id: String,
    pub name: Option<String>,
    pub model: String,
}

/// A conversation thread. Messages and runs attach to it by id.
#[derive(Debug, Clone, Deserialize)]
pub struct Thread {
    pub id: String,
}

/// A file uploaded to provider storage, prior to indexing.
#[derive(Debug, Clone, Deserialize)]
pub struct FileObject {
    pub id: String,
    pub filename: String,
    pub bytes: u64,
}

/// States of a file-batch ingestion job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    InProgress,
    Completed,
    Failed,
    Cancelled,
}

impl BatchStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, BatchStatus::InProgress)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BatchStatus::InProgress => "in_progress",
            BatchStatus::Completed => "completed",
            BatchStatus::Failed => "failed",
            BatchStatus::Cancelled => "cancelled",
        }
    }
}

/// Per-state file counts the provider reports for a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCounts {
    pub in_progress: u32,
    pub completed: u32,
    pub failed: u32,
    pub cancelled: u32,
    pub total: u32,
}

/// A bulk ingestion job tracked to a terminal status.
#[derive(Debug, Clone, Deserialize)]
pub struct FileBatch {
    pub id: String,
    pub status: BatchStatus,
    pub file_counts: FileCounts,
}

/// Lifecycle states of an assistant run.
///
/// `Unknown` absorbs statuses introduced by the provider after this crate
/// was written; it is treated as still pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    RequiresAction,
    Cancelling,
    Cancelled,
    Failed,
    Completed,
    Incomplete,
    Expired,
    #[serde(other)]
    Unknown,
}

impl RunStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(
            self,
            RunStatus::Queued | RunStatus::InProgress | RunStatus::Cancelling | RunStatus::Unknown
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Queued => "queued",
            RunStatus::InProgress => "in_progress",
            RunStatus::RequiresAction => "requires_action",
            RunStatus::Cancelling => "cancelling",
            RunStatus::Cancelled => "cancelled",
            RunStatus::Failed => "failed",
            RunStatus::Completed => "completed",
            RunStatus::Incomplete => "incomplete",
            RunStatus::Expired => "expired",
            RunStatus::Unknown => "unknown",
        }
    }
}

/// One execution of an assistant against a thread.
#[derive(Debug, Clone, Deserialize)]
pub struct Run {
    pub id: String,
    pub status: RunStatus,
    pub last_error: Option<RunError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RunError {
    pub code: String,
    pub message: String,
}

/// A message in a thread. Content arrives as a list of typed blocks.
#[derive(Debug, Clone, Deserialize)]
pub struct ThreadMessage {
    pub id: String,
    pub role: String,
    pub content: Vec<MessageContent>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageContent {
    Text { text: TextValue },
    /// Non-text block (image, file citation, ...); not interpreted here.
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextValue {
    pub value: String,
}

/// Messages listed newest-first, as the provider returns them.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageList {
    pub data: Vec<ThreadMessage>,
}

impl MessageList {
    /// Text of the first text block of the newest message, if any.
    pub fn latest_text(&self) -> Option<&str> {
        self.data.first()?.content.iter().find_map(|block| match block {
            MessageContent::Text { text } => Some(text.value.as_str()),
            MessageContent::Other => None,
        })
    }
}
