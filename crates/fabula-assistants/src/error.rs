use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssistantsError {
    #[error("request to {endpoint} failed: {source}")]
    Http {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("provider returned {status} from {endpoint}: {message}")]
    Api {
        endpoint: &'static str,
        status: reqwest::StatusCode,
        message: String,
    },

    #[error("malformed response from {endpoint}: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("timed out after {waited:?} waiting for {operation}")]
    PollTimeout {
        operation: &'static str,
        waited: Duration,
    },

    #[error("invalid API key")]
    InvalidApiKey,
}

pub type Result<T, E = AssistantsError> = std::result::Result<T, E>;
