use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::lead::templates::{escape_html, welcome_script};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct WelcomeQuery {
    #[serde(default)]
    pub name: Option<String>,
}

/// Handle GET|POST /api/voice/welcome: Twilio webhook for the follow-up call.
///
/// Twilio fetches this when the lead picks up. The name comes from the
/// query string we put on the webhook URL when placing the call.
pub async fn handle_welcome(
    State(state): State<AppState>,
    Query(query): Query<WelcomeQuery>,
) -> Response {
    let name = query
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or("there");

    tracing::info!(name, "Serving welcome call TwiML");

    let twiml = say_twiml(&welcome_script(&state.config.brand, name));
    ([("Content-Type", "text/xml")], twiml).into_response()
}

fn say_twiml(script: &str) -> String {
    let script = escape_html(script);
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<Response>
    <Say voice="Polly.Matthew">{script}</Say>
</Response>"#
    )
}
