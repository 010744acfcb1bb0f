pub mod anthropic;
pub mod openai;
pub mod prompts;

use serde::{Deserialize, Serialize};

/// One conversation turn as exchanged with the browser and the LLM APIs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: String,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    fn is_conversational(&self) -> bool {
        matches!(self.role.as_str(), "user" | "assistant") && !self.content.trim().is_empty()
    }
}

/// Keep only user/assistant turns with content. Client-supplied `system`
/// turns never reach the upstream API.
pub fn conversational(turns: Vec<Turn>) -> Vec<Turn> {
    turns.into_iter().filter(Turn::is_conversational).collect()
}

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    Request(String),
    #[error("API returned error: {0}")]
    Api(String),
    #[error("Failed to parse API response: {0}")]
    Parse(String),
}
