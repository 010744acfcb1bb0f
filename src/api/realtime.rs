use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::error_response;
use crate::llm::prompts;
use crate::AppState;

/// POST /api/realtime/session: Mint an ephemeral OpenAI Realtime session.
///
/// The browser uses the returned client secret to open its own WebRTC
/// connection; nothing about the session is kept here.
pub async fn handle_session(State(state): State<AppState>) -> Response {
    let Some(openai) = &state.openai else {
        tracing::error!("Realtime session requested but OPENAI_API_KEY is not configured");
        return failed();
    };

    match openai
        .create_realtime_session(&prompts::realtime(&state.config.brand))
        .await
    {
        Ok(session) => Json(session).into_response(),
        Err(e) => {
            tracing::error!("OpenAI session error: {e}");
            failed()
        }
    }
}

fn failed() -> Response {
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create session")
}
