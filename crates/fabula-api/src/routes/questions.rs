use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use fabula_assistants::{Run, RunStatus};

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct AskRequest {
    pub question: String,
}

/// Either the assistant's answer or the terminal status of a run that
/// finished without producing one.
#[derive(Debug, Serialize, ToSchema)]
#[serde(untagged)]
pub enum AskResponse {
    Answered { answer: String },
    Unfinished { status: String, message: String },
}

/// Ask a question about the uploaded stories
///
/// Appends the question to the shared conversation, runs the assistant, and
/// blocks until the run reaches a terminal status.
#[utoipa::path(
    post,
    path = "/ask/",
    request_body = AskRequest,
    responses(
        (status = 200, description = "Answer, or the terminal status of an unfinished run", body = AskResponse),
        (status = 400, description = "Blank question")
    ),
    tag = "questions"
)]
pub async fn ask_question(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AskRequest>,
) -> ApiResult<Json<AskResponse>> {
    if req.question.trim().is_empty() {
        return Err(ApiError::BadRequest("Question must not be empty".to_string()));
    }

    state
        .assistants
        .create_user_message(&state.handles.thread_id, &req.question)
        .await?;

    let run = state
        .assistants
        .run_to_completion(&state.handles.thread_id, &state.handles.assistant_id)
        .await?;

    if run.status != RunStatus::Completed {
        tracing::warn!(status = run.status.as_str(), "Run finished without completing");
        return Ok(Json(AskResponse::Unfinished {
            status: run.status.as_str().to_string(),
            message: failure_note(&run),
        }));
    }

    let messages = state
        .assistants
        .list_messages(&state.handles.thread_id)
        .await?;
    let answer = messages
        .latest_text()
        .ok_or(ApiError::MissingAnswer)?
        .to_string();

    Ok(Json(AskResponse::Answered { answer }))
}

fn failure_note(run: &Run) -> String {
    match &run.last_error {
        Some(err) => format!("Run did not complete: {}", err.message),
        None => "Run did not complete".to_string(),
    }
}
