use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;

use super::error_response;
use super::form::{BodyRejection, JsonOrForm};
use crate::lead::insight::industry_insight;
use crate::lead::LeadSubmission;
use crate::notify::ChannelOutcome;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct LeadResponse {
    pub success: bool,
    pub message: String,
}

/// POST /api/lead-webhook: Website form submission.
///
/// Stores the lead, then fans out: prospect email, SMS followed by a welcome
/// call, and a Telegram summary for the operator. Channel failures are only
/// visible in that summary and the logs; the caller always gets
/// `success: true` once the body parses.
///
/// Accepts JSON or `application/x-www-form-urlencoded`:
/// ```json
/// {
///   "name": "Dana Reyes",
///   "email": "dana@example.com",
///   "phone": "(208) 555-1234",
///   "business": "Reyes Bakery",
///   "painPoint": "Too many emails"
/// }
/// ```
pub async fn handle_lead(
    State(state): State<AppState>,
    body: Result<JsonOrForm<LeadSubmission>, BodyRejection>,
) -> Response {
    let JsonOrForm(submission) = match body {
        Ok(b) => b,
        Err(BodyRejection(e)) => {
            tracing::error!("Lead webhook error: {e}");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed");
        }
    };

    let submission = submission.normalized();
    let insight = industry_insight(submission.business.as_deref().unwrap_or_default());
    let lead = submission.into_lead(insight.to_string());

    tracing::info!(
        lead_id = %lead.id,
        business = %lead.business,
        has_email = !lead.email.is_empty(),
        has_phone = lead.phone.is_some(),
        "Lead received"
    );

    if let Err(e) = state.store.record_lead(&lead).await {
        tracing::error!(lead_id = %lead.id, "Failed to store lead: {e}");
    }

    let report = state.notifier.notify(&lead).await;
    if report.operator != ChannelOutcome::Sent {
        tracing::warn!(lead_id = %lead.id, "Operator was not told about this lead");
    }

    Json(LeadResponse {
        success: true,
        message: format!(
            "Thanks {}! Check your inbox, {} will be in touch shortly.",
            lead.first_name(),
            state.config.brand.owner
        ),
    })
    .into_response()
}

/// GET /api/lead-webhook: Liveness probe for form integrations.
pub async fn handle_status() -> impl IntoResponse {
    Json(json!({ "status": "Lead webhook active" }))
}
