use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::adapter::{BackendError, ChatBackend};
use crate::types::{ChatRequest, RawResponse};
use chatpane_core::{Error, Result};

/// Scripted response for deterministic runs without a live endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MockResponse {
    /// Raw status and body, passed through untouched
    Reply {
        #[serde(default = "default_status")]
        status: u16,
        body: String,
    },
    /// 200 with `{"response": content}`
    Text { content: String },
    /// The request never completes
    NetworkFailure {
        #[serde(default = "default_failure_message")]
        message: String,
    },
}

fn default_status() -> u16 {
    200
}

fn default_failure_message() -> String {
    "mock network failure".to_string()
}

/// Mock configuration from TOML file
#[derive(Debug, Deserialize)]
struct MockConfig {
    responses: Vec<MockResponse>,
}

/// Backend that replays scripted responses in order and records what it was sent
pub struct MockBackend {
    responses: Vec<MockResponse>,
    current: AtomicUsize,
    recorded: Mutex<Vec<ChatRequest>>,
}

impl MockBackend {
    pub fn new(responses: Vec<MockResponse>) -> Self {
        Self { responses, current: AtomicUsize::new(0), recorded: Mutex::new(Vec::new()) }
    }

    /// Load scripted responses from a TOML file with `[[responses]]` tables
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: MockConfig = toml::from_str(content)
            .map_err(|e| Error::Parse(format!("Failed to parse mock responses: {}", e)))?;
        Ok(Self::new(config.responses))
    }

    /// Requests received so far, oldest first
    pub fn recorded(&self) -> Vec<ChatRequest> {
        self.recorded.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).clone()
    }

    fn get_next_response(&self) -> MockResponse {
        let index = self.current.fetch_add(1, Ordering::SeqCst);
        if let Some(response) = self.responses.get(index) {
            return response.clone();
        }

        tracing::warn!(requested = index + 1, available = self.responses.len(), "mock responses exhausted");
        MockResponse::Text {
            content: format!(
                "No more mock responses configured (requested: {}, available: {})",
                index + 1,
                self.responses.len()
            ),
        }
    }
}

#[async_trait::async_trait]
impl ChatBackend for MockBackend {
    async fn send(&self, request: &ChatRequest) -> std::result::Result<RawResponse, BackendError> {
        self.recorded.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).push(request.clone());

        match self.get_next_response() {
            MockResponse::Reply { status, body } => Ok(RawResponse::new(status, body)),
            MockResponse::Text { content } => Ok(RawResponse::json(&serde_json::json!({ "response": content }))),
            MockResponse::NetworkFailure { message } => Err(BackendError::Transport(message)),
        }
    }

    fn endpoint(&self) -> &str {
        "mock://chat"
    }
}
