// Assistants v2 client implementation (HTTP direct, no SDK)

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::error::{AssistantsError, Result};
use crate::poll::{poll_until_terminal, PollConfig};
use crate::traits::{AssistantSpec, AssistantsApi};
use crate::types::{
    Assistant, FileBatch, FileObject, MessageList, Run, Thread, ThreadMessage, VectorStore,
};

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// Opt-in header required by the Assistants v2 endpoints.
const ASSISTANTS_BETA: &str = "assistants=v2";

/// Client for the hosted Assistants API.
pub struct AssistantsClient {
    http_client: reqwest::Client,
    base_url: String,
    poll: PollConfig,
}

impl AssistantsClient {
    /// Create new client with API key
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|_| AssistantsError::InvalidApiKey)?,
        );
        headers.insert("OpenAI-Beta", HeaderValue::from_static(ASSISTANTS_BETA));

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|source| AssistantsError::Http {
                endpoint: "client setup",
                source,
            })?;

        Ok(Self {
            http_client,
            base_url: OPENAI_API_BASE.to_string(),
            poll: PollConfig::default(),
        })
    }

    /// Override the cadence used when polling batches and runs.
    pub fn with_poll_config(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    /// Point the client at a different API base (proxies, test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        path: String,
        body: Value,
    ) -> Result<T> {
        let response = self
            .http_client
            .post(format!("{}{}", self.base_url, path))
            .json(&body)
            .send()
            .await
            .map_err(|source| AssistantsError::Http { endpoint, source })?;

        Self::decode(endpoint, response).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        path: String,
    ) -> Result<T> {
        let response = self
            .http_client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .map_err(|source| AssistantsError::Http { endpoint, source })?;

        Self::decode(endpoint, response).await
    }

    async fn decode<T: DeserializeOwned>(
        endpoint: &'static str,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let message = match response.text().await {
                Ok(body) => extract_api_message(&body),
                Err(_) => String::from("<no body>"),
            };
            return Err(AssistantsError::Api {
                endpoint,
                status,
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|source| AssistantsError::Decode { endpoint, source })
    }
}

/// Pulls `error.message` out of a provider error body, falling back to the
/// raw text when the body is not the expected JSON shape.
fn extract_api_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("error")?
                .get("message")?
                .as_str()
                .map(str::to_owned)
        })
        .unwrap_or_else(|| body.trim().to_string())
}

#[async_trait]
impl AssistantsApi for AssistantsClient {
    async fn create_vector_store(&self, name: &str) -> Result<VectorStore> {
        tracing::debug!(name, "creating vector store");
        self.post_json(
            "vector_stores",
            "/vector_stores".to_string(),
            json!({ "name": name }),
        )
        .await
    }

    async fn create_assistant(&self, spec: &AssistantSpec) -> Result<Assistant> {
        tracing::debug!(name = %spec.name, model = %spec.model, "creating assistant");
        let body = json!({
            "name": spec.name,
            "description": spec.description,
            "model": spec.model,
            "tools": [{ "type": "file_search" }],
        });
        self.post_json("assistants", "/assistants".to_string(), body)
            .await
    }

    async fn bind_vector_store(
        &self,
        assistant_id: &str,
        vector_store_id: &str,
    ) -> Result<Assistant> {
        let body = json!({
            "tool_resources": {
                "file_search": { "vector_store_ids": [vector_store_id] }
            },
        });
        self.post_json("assistants", format!("/assistants/{}", assistant_id), body)
            .await
    }

    async fn create_thread(&self) -> Result<Thread> {
        self.post_json("threads", "/threads".to_string(), json!({}))
            .await
    }

    async fn upload_file(&self, filename: &str, bytes: Vec<u8>) -> Result<FileObject> {
        let endpoint = "files";
        let part = Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str("text/plain")
            .map_err(|source| AssistantsError::Http { endpoint, source })?;
        let form = Form::new().text("purpose", "assistants").part("file", part);

        let response = self
            .http_client
            .post(format!("{}/files", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(|source| AssistantsError::Http { endpoint, source })?;

        Self::decode(endpoint, response).await
    }

    async fn index_file(&self, vector_store_id: &str, file_id: &str) -> Result<FileBatch> {
        let batch: FileBatch = self
            .post_json(
                "file_batches",
                format!("/vector_stores/{}/file_batches", vector_store_id),
                json!({ "file_ids": [file_id] }),
            )
            .await?;

        if batch.status.is_terminal() {
            return Ok(batch);
        }
        tracing::debug!(batch_id = %batch.id, "file batch submitted, waiting for indexing");

        let path = format!(
            "/vector_stores/{}/file_batches/{}",
            vector_store_id, batch.id
        );
        poll_until_terminal(
            &self.poll,
            "file batch indexing",
            || self.get_json::<FileBatch>("file_batches", path.clone()),
            |batch| batch.status.is_terminal(),
        )
        .await
    }

    async fn create_user_message(&self, thread_id: &str, content: &str) -> Result<ThreadMessage> {
        self.post_json(
            "messages",
            format!("/threads/{}/messages", thread_id),
            json!({ "role": "user", "content": content }),
        )
        .await
    }

    async fn run_to_completion(&self, thread_id: &str, assistant_id: &str) -> Result<Run> {
        let run: Run = self
            .post_json(
                "runs",
                format!("/threads/{}/runs", thread_id),
                json!({ "assistant_id": assistant_id }),
            )
            .await?;

        if run.status.is_terminal() {
            return Ok(run);
        }
        tracing::debug!(run_id = %run.id, "run started, waiting for completion");

        let path = format!("/threads/{}/runs/{}", thread_id, run.id);
        poll_until_terminal(
            &self.poll,
            "assistant run",
            || self.get_json::<Run>("runs", path.clone()),
            |run| run.status.is_terminal(),
        )
        .await
    }

    async fn list_messages(&self, thread_id: &str) -> Result<MessageList> {
        self.get_json("messages", format!("/threads/{}/messages", thread_id))
            .await
    }
}
