use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use fabula_assistants::AssistantsError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Only .txt files are supported for upload.")]
    UnsupportedExtension,

    #[error("No file found in upload request")]
    MissingFile,

    #[error("Uploaded file is empty")]
    EmptyUpload,

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Malformed multipart payload: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Failed to stage upload: {0}")]
    Staging(#[from] std::io::Error),

    #[error("Assistant service error: {0}")]
    Assistants(#[from] AssistantsError),

    #[error("Assistant returned no answer")]
    MissingAnswer,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::UnsupportedExtension
            | ApiError::MissingFile
            | ApiError::EmptyUpload
            | ApiError::BadRequest(_)
            | ApiError::Multipart(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::Assistants(AssistantsError::PollTimeout { .. }) => {
                tracing::error!("Provider operation timed out: {}", self);
                (StatusCode::GATEWAY_TIMEOUT, self.to_string())
            }
            ApiError::Assistants(ref e) => {
                tracing::error!("Assistant service error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Assistant service error".to_string(),
                )
            }
            ApiError::Staging(ref e) => {
                tracing::error!("Failed to stage upload: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to stage upload".to_string(),
                )
            }
            ApiError::MissingAnswer => {
                tracing::error!("Run completed but the conversation holds no answer");
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
