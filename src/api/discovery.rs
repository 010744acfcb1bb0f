use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::error_response;
use super::form::{BodyRejection, JsonOrForm};
use crate::llm::{conversational, prompts, Turn};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct DiscoveryRequest {
    #[serde(default)]
    pub messages: Vec<Turn>,
}

#[derive(Debug, Serialize)]
pub struct DiscoveryResponse {
    pub response: String,
}

/// POST /api/discovery: Typed discovery interview.
///
/// The browser keeps the transcript and sends it whole each turn.
pub async fn handle_discovery(
    State(state): State<AppState>,
    body: Result<JsonOrForm<DiscoveryRequest>, BodyRejection>,
) -> Response {
    let req = match body {
        Ok(JsonOrForm(req)) => req,
        Err(BodyRejection(e)) => {
            tracing::warn!("Unreadable discovery request: {e}");
            return error_response(StatusCode::BAD_REQUEST, "Invalid request body");
        }
    };
    let messages = conversational(req.messages);
    if messages.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Messages required");
    }

    let brand = &state.config.brand;
    let fallback = || {
        format!(
            "I'm having trouble responding right now. You can also fill out the contact form \
             and {} will follow up personally.",
            brand.owner
        )
    };

    let response = match &state.openai {
        Some(openai) => match openai.chat(&prompts::discovery(brand), &messages).await {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(turns = messages.len(), "Discovery API error: {e}");
                fallback()
            }
        },
        None => {
            tracing::error!("Discovery request but OPENAI_API_KEY is not configured");
            fallback()
        }
    };

    Json(DiscoveryResponse { response }).into_response()
}
