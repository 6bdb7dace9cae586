use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use fabula_assistants::{FileBatch, FileCounts};

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

/// The only extension the provider accepts for plain-text stories.
const STORY_EXTENSION: &str = "txt";

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    pub status: String,
    pub file_counts: FileCountsResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FileCountsResponse {
    pub in_progress: u32,
    pub completed: u32,
    pub failed: u32,
    pub cancelled: u32,
    pub total: u32,
}

/// Upload a story and index it for the assistant
///
/// Blocks until the provider reports a terminal indexing status for the
/// submitted file.
#[utoipa::path(
    post,
    path = "/upload-story/",
    responses(
        (status = 200, description = "Indexing finished", body = UploadResponse),
        (status = 400, description = "Missing file, empty payload, or unsupported extension")
    ),
    tag = "stories"
)]
pub async fn upload_story(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    let (filename, data) = read_upload(&mut multipart).await?;

    if !has_story_extension(&filename) {
        return Err(ApiError::UnsupportedExtension);
    }
    if data.is_empty() {
        return Err(ApiError::EmptyUpload);
    }

    tracing::info!(filename = %filename, bytes = data.len(), "Staging uploaded story");

    // The provider rejects unrecognized extensions, so the staged copy is
    // always named *.txt regardless of the original filename's casing.
    let staged = StagedStory::write(&data).await?;
    let contents = staged.read().await?;

    let file = state
        .assistants
        .upload_file(staged.file_name(), contents)
        .await?;
    let batch = state
        .assistants
        .index_file(&state.handles.vector_store_id, &file.id)
        .await?;

    tracing::info!(status = batch.status.as_str(), "Story indexing finished");

    Ok(Json(batch_to_response(batch)))
}

/// Pulls the first file field out of the multipart payload.
async fn read_upload(multipart: &mut Multipart) -> ApiResult<(String, Vec<u8>)> {
    while let Some(field) = multipart.next_field().await? {
        if let Some(filename) = field.file_name() {
            let filename = filename.to_string();
            let data = field.bytes().await?;
            return Ok((filename, data.to_vec()));
        }
    }

    Err(ApiError::MissingFile)
}

fn has_story_extension(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(STORY_EXTENSION))
        .unwrap_or(false)
}

/// Staged local copy of an upload, deleted when dropped on every exit path.
struct StagedStory {
    file: tempfile::NamedTempFile,
}

impl StagedStory {
    async fn write(data: &[u8]) -> std::io::Result<Self> {
        let file = tempfile::Builder::new()
            .prefix("story-")
            .suffix(".txt")
            .tempfile()?;
        tokio::fs::write(file.path(), data).await?;
        Ok(Self { file })
    }

    async fn read(&self) -> std::io::Result<Vec<u8>> {
        tokio::fs::read(self.file.path()).await
    }

    fn file_name(&self) -> &str {
        // Builder always produces a UTF-8 "story-*.txt" name
        self.file
            .path()
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("story.txt")
    }
}

fn batch_to_response(batch: FileBatch) -> UploadResponse {
    UploadResponse {
        status: batch.status.as_str().to_string(),
        file_counts: counts_to_response(batch.file_counts),
    }
}

fn counts_to_response(counts: FileCounts) -> FileCountsResponse {
    FileCountsResponse {
        in_progress: counts.in_progress,
        completed: counts.completed,
        failed: counts.failed,
        cancelled: counts.cancelled,
        total: counts.total,
    }
}
