use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Fixed liveness message; never touches the provider.
pub const LIVENESS_MESSAGE: &str = "Story assistant API is running!";

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LivenessResponse {
    pub message: String,
}

/// Liveness endpoint
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service is up", body = LivenessResponse)
    ),
    tag = "health"
)]
pub async fn liveness() -> Json<LivenessResponse> {
    Json(LivenessResponse {
        message: LIVENESS_MESSAGE.to_string(),
    })
}
