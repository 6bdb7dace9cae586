//! Test doubles and request helpers shared by the handler tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;

use fabula_assistants::{
    Assistant, AssistantSpec, AssistantsApi, BatchStatus, FileBatch, FileCounts, FileObject,
    MessageContent, MessageList, Run, RunStatus, TextValue, Thread, ThreadMessage, VectorStore,
};
use fabula_assistants::error::Result;

use crate::config::{AssistantConfig, Config};
use crate::state::{AppState, AssistantHandles};

/// Scripted provider double. Records call counts so tests can assert which
/// provider operations a request actually performed.
pub struct FakeAssistants {
    pub run_status: RunStatus,
    pub batch_status: BatchStatus,
    /// Newest assistant message returned by `list_messages`; `None` models a
    /// conversation with no messages at all.
    pub answer: Option<String>,
    pub uploads: AtomicUsize,
    pub batches: AtomicUsize,
    pub messages_created: AtomicUsize,
    pub runs_started: AtomicUsize,
    pub bootstrap_calls: Mutex<Vec<&'static str>>,
}

impl Default for FakeAssistants {
    fn default() -> Self {
        Self {
            run_status: RunStatus::Completed,
            batch_status: BatchStatus::Completed,
            answer: Some("Alice went to the market.".to_string()),
            uploads: AtomicUsize::new(0),
            batches: AtomicUsize::new(0),
            messages_created: AtomicUsize::new(0),
            runs_started: AtomicUsize::new(0),
            bootstrap_calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl AssistantsApi for FakeAssistants {
    async fn create_vector_store(&self, name: &str) -> Result<VectorStore> {
        self.bootstrap_calls.lock().unwrap().push("vector_store");
        Ok(VectorStore {
            id: "vs_test".to_string(),
            name: Some(name.to_string()),
        })
    }

    async fn create_assistant(&self, spec: &AssistantSpec) -> Result<Assistant> {
        self.bootstrap_calls.lock().unwrap().push("assistant");
        Ok(Assistant {
            id: "asst_test".to_string(),
            name: Some(spec.name.clone()),
            model: spec.model.clone(),
        })
    }

    async fn bind_vector_store(
        &self,
        assistant_id: &str,
        _vector_store_id: &str,
    ) -> Result<Assistant> {
        self.bootstrap_calls.lock().unwrap().push("bind");
        Ok(Assistant {
            id: assistant_id.to_string(),
            name: None,
            model: "gpt-4o".to_string(),
        })
    }

    async fn create_thread(&self) -> Result<Thread> {
        self.bootstrap_calls.lock().unwrap().push("thread");
        Ok(Thread {
            id: "thread_test".to_string(),
        })
    }

    async fn upload_file(&self, filename: &str, bytes: Vec<u8>) -> Result<FileObject> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        Ok(FileObject {
            id: "file_test".to_string(),
            filename: filename.to_string(),
            bytes: bytes.len() as u64,
        })
    }

    async fn index_file(&self, _vector_store_id: &str, _file_id: &str) -> Result<FileBatch> {
        self.batches.fetch_add(1, Ordering::SeqCst);
        Ok(FileBatch {
            id: "batch_test".to_string(),
            status: self.batch_status,
            file_counts: FileCounts {
                completed: 1,
                total: 1,
                ..FileCounts::default()
            },
        })
    }

    async fn create_user_message(&self, _thread_id: &str, content: &str) -> Result<ThreadMessage> {
        self.messages_created.fetch_add(1, Ordering::SeqCst);
        Ok(ThreadMessage {
            id: "msg_user".to_string(),
            role: "user".to_string(),
            content: vec![MessageContent::Text {
                text: TextValue {
                    value: content.to_string(),
                },
            }],
        })
    }

    async fn run_to_completion(&self, _thread_id: &str, _assistant_id: &str) -> Result<Run> {
        self.runs_started.fetch_add(1, Ordering::SeqCst);
        Ok(Run {
            id: "run_test".to_string(),
            status: self.run_status,
            last_error: None,
        })
    }

    async fn list_messages(&self, _thread_id: &str) -> Result<MessageList> {
        let data = match &self.answer {
            Some(text) => vec![ThreadMessage {
                id: "msg_answer".to_string(),
                role: "assistant".to_string(),
                content: vec![MessageContent::Text {
                    text: TextValue {
                        value: text.clone(),
                    },
                }],
            }],
            None => Vec::new(),
        };
        Ok(MessageList { data })
    }
}

pub fn test_assistant_config() -> AssistantConfig {
    test_config().assistant
}

pub fn test_config() -> Config {
    toml::from_str(
        r#"
        [server]
        host = "127.0.0.1"
        port = 8000

        [cors]
        enabled = false
        origins = []

        [assistant]
        name = "Story"
        description = "Answers based on uploaded story"
        model = "gpt-4o"
        vector_store_name = "Stories"
        poll_interval_ms = 1
        poll_timeout_secs = 1

        [logging]
        level = "debug"
        format = "pretty"
    "#,
    )
    .unwrap()
}

/// App state wired to a fake provider with already-provisioned handles.
pub fn test_state(fake: FakeAssistants) -> (Arc<AppState>, Arc<FakeAssistants>) {
    let fake = Arc::new(fake);
    let handles = AssistantHandles {
        vector_store_id: "vs_test".to_string(),
        assistant_id: "asst_test".to_string(),
        thread_id: "thread_test".to_string(),
    };
    let state = Arc::new(AppState::new(test_config(), fake.clone(), handles));
    (state, fake)
}

pub fn ask_request(question: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/ask/")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::json!({ "question": question }).to_string(),
        ))
        .unwrap()
}

pub fn multipart_request(filename: &str, contents: &[u8]) -> Request<Body> {
    let boundary = "fabula-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: text/plain\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(contents);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/upload-story/")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap()
}

pub async fn request_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
