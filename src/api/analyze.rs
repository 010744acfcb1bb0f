use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error_response;
use super::form::{BodyRejection, JsonOrForm};

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub business: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub needs_analysis: bool,
    pub website: Option<String>,
    pub business: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// POST /api/analyze: Structure a website analysis request.
///
/// The analysis itself runs in the out-of-band automation; this only
/// validates and echoes what it needs.
pub async fn handle_analyze(body: Result<JsonOrForm<AnalyzeRequest>, BodyRejection>) -> Response {
    let req = match body {
        Ok(JsonOrForm(req)) => req,
        Err(BodyRejection(e)) => {
            tracing::warn!("Unreadable analyze request: {e}");
            return error_response(StatusCode::BAD_REQUEST, "Invalid request body");
        }
    };

    let website = non_blank(req.website);
    let business = non_blank(req.business);

    if website.is_none() && business.is_none() {
        return error_response(StatusCode::BAD_REQUEST, "Need website or business");
    }

    tracing::info!(?website, ?business, "Analysis requested");

    Json(AnalyzeResponse {
        needs_analysis: true,
        website,
        business,
        timestamp: Utc::now(),
    })
    .into_response()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
