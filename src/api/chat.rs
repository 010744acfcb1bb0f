use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::error_response;
use super::form::{BodyRejection, JsonOrForm};
use crate::config::BrandConfig;
use crate::ids::new_id;
use crate::llm::{conversational, prompts, LlmError, Turn};
use crate::store::{ChatMessage, ChatRole};
use crate::AppState;

/// Prior turns forwarded to the model along with the new message.
const HISTORY_TURNS: usize = 6;

const GREETINGS: &[&str] = &["hello", "hi", "hey"];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub history: Vec<Turn>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub response: String,
    pub session_id: String,
}

/// POST /api/chat: Website chat widget.
///
/// Short greetings get an instant canned reply. Everything else goes to
/// Claude with the marketing system prompt; any failure turns into an
/// apology that points back to the contact form.
pub async fn handle_chat(
    State(state): State<AppState>,
    body: Result<JsonOrForm<ChatRequest>, BodyRejection>,
) -> Response {
    let req = match body {
        Ok(JsonOrForm(req)) => req,
        Err(BodyRejection(e)) => {
            tracing::warn!("Unreadable chat request: {e}");
            return error_response(StatusCode::BAD_REQUEST, "Invalid request body");
        }
    };

    let Some(message) = req
        .message
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
    else {
        return error_response(StatusCode::BAD_REQUEST, "Message required");
    };

    let session_id = req
        .session_id
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| new_id("session"));
    let brand = &state.config.brand;

    let (response, answered) = match quick_response(&message, brand) {
        Some(canned) => (canned, true),
        None => ask_claude(&state, &message, req.history).await,
    };

    let exchange = [
        ChatMessage::new(&session_id, ChatRole::User, &message, answered),
        ChatMessage::new(&session_id, ChatRole::Assistant, &response, true),
    ];
    if let Err(e) = state.store.record_chat(&exchange).await {
        tracing::error!(session_id = %session_id, "Failed to store chat messages: {e}");
    }

    Json(ChatResponse {
        response,
        session_id,
    })
    .into_response()
}

/// Returns the reply and whether it actually answered the visitor.
async fn ask_claude(state: &AppState, message: &str, history: Vec<Turn>) -> (String, bool) {
    let brand = &state.config.brand;
    let Some(claude) = &state.anthropic else {
        tracing::error!("Chat request but ANTHROPIC_API_KEY is not configured");
        return (Fallback::Unavailable.text(brand), false);
    };

    let mut turns = conversational(history);
    let skip = turns.len().saturating_sub(HISTORY_TURNS);
    turns.drain(..skip);
    turns.push(Turn::user(message));

    match claude.complete(&prompts::marketing(brand), &turns).await {
        Ok(text) => (text, true),
        Err(e) => {
            tracing::error!("Chat error: {e}");
            let fallback = match e {
                LlmError::Parse(_) => Fallback::Unsure,
                LlmError::Api(_) => Fallback::Snag,
                LlmError::Request(_) => Fallback::Hiccup,
            };
            (fallback.text(brand), false)
        }
    }
}

/// Canned reply for a bare greeting ("hi", "hey there", "Hello Spark!").
fn quick_response(message: &str, brand: &BrandConfig) -> Option<String> {
    let lower = message.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    let is_greeting = words
        .first()
        .is_some_and(|first| GREETINGS.contains(first))
        && words.len() <= 3;

    is_greeting.then(|| {
        format!(
            "Hey there! 👋 What brings you to {} today? Curious about something specific, or \
             just exploring what AI could do for your business?",
            brand.company
        )
    })
}

enum Fallback {
    Unavailable,
    Snag,
    Unsure,
    Hiccup,
}

impl Fallback {
    fn text(&self, brand: &BrandConfig) -> String {
        let owner = &brand.owner;
        match self {
            Self::Unavailable => format!(
                "I'm having a connection issue right now. Drop your question in the contact form \
                 and {owner} will get back to you within 24 hours!"
            ),
            Self::Snag => format!(
                "Hmm, I hit a snag. Fill out the contact form and {owner} will personally follow up!"
            ),
            Self::Unsure => format!(
                "I'm not sure how to answer that. Want to fill out the form and chat with {owner} \
                 directly?"
            ),
            Self::Hiccup => format!(
                "Connection hiccup! The contact form goes straight to {owner}, who'll get back to \
                 you within 24 hours."
            ),
        }
    }
}
