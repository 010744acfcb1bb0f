pub mod analyze;
pub mod chat;
pub mod contact;
pub mod discovery;
pub mod form;
pub mod lead_webhook;
pub mod realtime;
pub mod voice;

use axum::http::{header, HeaderMap, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// JSON error body with a status code.
pub fn error_response(status: StatusCode, error: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
        .into_response()
}

/// All routes, with CORS and request tracing.
pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.server.allowed_origins);

    Router::new()
        // Lead intake
        .route(
            "/api/lead-webhook",
            post(lead_webhook::handle_lead).get(lead_webhook::handle_status),
        )
        .route(
            "/api/contact",
            post(contact::handle_contact).get(contact::handle_list_leads),
        )
        .route("/api/analyze", post(analyze::handle_analyze))
        // Assistants
        .route("/api/chat", post(chat::handle_chat))
        .route("/api/discovery", post(discovery::handle_discovery))
        .route("/api/realtime/session", post(realtime::handle_session))
        // Twilio answer webhook for the welcome call
        .route(
            "/api/voice/welcome",
            get(voice::handle_welcome).post(voice::handle_welcome),
        )
        .route("/health", get(health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    if allowed_origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(origins)
}

async fn health() -> &'static str {
    "ok"
}

#[allow(clippy::result_large_err)]
pub fn check_auth(headers: &HeaderMap, expected_token: &str) -> Result<(), Response> {
    if expected_token.is_empty() {
        tracing::warn!("API token not configured, rejecting request");
        return Err(error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            "API token not configured",
        ));
    }

    let provided = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    match provided {
        Some(token) if token == expected_token => Ok(()),
        _ => {
            tracing::warn!("Unauthorized API request");
            Err(error_response(
                StatusCode::UNAUTHORIZED,
                "Invalid or missing bearer token",
            ))
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::AppState;

    /// State with a temp data dir and every upstream channel unconfigured.
    pub fn state(dir: &tempfile::TempDir) -> AppState {
        let mut config = Config::default();
        config.server.data_dir = dir.path().to_path_buf();
        config.notify.call_delay_ms = 0;
        AppState::from_config(config)
    }

    pub async fn send(app: Router, req: Request<Body>) -> (StatusCode, String) {
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    pub fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    pub fn json(body: &str) -> serde_json::Value {
        serde_json::from_str(body).unwrap()
    }
}
