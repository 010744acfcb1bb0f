use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use super::form::{BodyRejection, JsonOrForm};
use super::{check_auth, error_response};
use crate::lead::insight::industry_insight;
use crate::lead::{Lead, LeadSubmission};
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactResponse {
    pub success: bool,
    pub lead_id: String,
    pub insight: String,
}

#[derive(Debug, Serialize)]
pub struct LeadListResponse {
    pub count: usize,
    pub leads: Vec<Lead>,
}

/// POST /api/contact: Store a lead and return its industry insight.
///
/// Unlike the lead webhook this sends no notifications; the trigger file is
/// left for the follow-up automation.
pub async fn handle_contact(
    State(state): State<AppState>,
    body: Result<JsonOrForm<LeadSubmission>, BodyRejection>,
) -> Response {
    let submission = match body {
        Ok(JsonOrForm(submission)) => submission.normalized(),
        Err(BodyRejection(e)) => {
            tracing::error!("Contact form error: {e}");
            return failed();
        }
    };
    let Some(business) = submission.business.clone() else {
        return missing_fields();
    };
    if submission.name.is_none() || submission.email.is_none() {
        return missing_fields();
    }

    let insight = industry_insight(&business);
    let lead = submission.into_lead(insight.to_string());

    if let Err(e) = state.store.record_lead(&lead).await {
        tracing::error!(lead_id = %lead.id, "Contact form error: {e}");
        return failed();
    }

    Json(ContactResponse {
        success: true,
        lead_id: lead.id,
        insight: lead.insight,
    })
    .into_response()
}

/// GET /api/contact: All stored leads, for the admin dashboard.
///
/// Requires `Authorization: Bearer <token>` matching the configured api.token.
pub async fn handle_list_leads(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Err(resp) = check_auth(&headers, &state.config.api.token) {
        return resp;
    }

    let leads = state.store.leads.read_all().await;
    Json(LeadListResponse {
        count: leads.len(),
        leads,
    })
    .into_response()
}

fn failed() -> Response {
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Failed to process submission",
    )
}

fn missing_fields() -> Response {
    error_response(StatusCode::BAD_REQUEST, "Missing required fields")
}

#[cfg(test)]
mod tests {
    use crate::api::router;
    use crate::api::test_support::*;
    use crate::config::Config;
    use crate::AppState;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn missing_business_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let state = state(&dir);
        let app = router(state.clone());
        let (status, body) = send(
            app,
            post_json(
                "/api/contact",
                json!({ "name": "Dana", "email": "dana@example.com", "business": "  " }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json(&body)["error"], "Missing required fields");
        assert!(state.store.leads.read_all().await.is_empty());
    }

    #[tokio::test]
    async fn stores_lead_and_returns_insight() {
        let dir = tempfile::tempdir().unwrap();
        let state = state(&dir);
        let app = router(state.clone());
        let (status, body) = send(
            app,
            post_json(
                "/api/contact",
                json!({
                    "name": "Sam",
                    "email": "sam@example.com",
                    "business": "Downtown Dental",
                    "message": "Call me"
                }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let body = json(&body);
        assert_eq!(body["success"], true);
        assert!(body["leadId"].as_str().unwrap().starts_with("lead_"));
        assert!(body["insight"].as_str().unwrap().contains("Healthcare"));

        let leads = state.store.leads.read_all().await;
        assert_eq!(leads.len(), 1);
        assert_eq!(leads[0].message.as_deref(), Some("Call me"));
    }

    #[tokio::test]
    async fn listing_without_configured_token_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(state(&dir));
        let (status, _) = send(
            app,
            Request::get("/api/contact").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn listing_with_token_returns_leads() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.server.data_dir = dir.path().to_path_buf();
        config.api.token = "admin".into();
        let state = AppState::from_config(config);

        let lead = crate::lead::LeadSubmission {
            name: Some("Dana".into()),
            ..Default::default()
        }
        .into_lead(String::new());
        state.store.record_lead(&lead).await.unwrap();

        let (status, _) = send(
            router(state.clone()),
            Request::get("/api/contact").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, body) = send(
            router(state),
            Request::get("/api/contact")
                .header("authorization", "Bearer admin")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let body = json(&body);
        assert_eq!(body["count"], 1);
        assert_eq!(body["leads"][0]["name"], "Dana");
        assert_eq!(body["leads"][0]["status"], "new");
    }

    #[tokio::test]
    async fn unparsable_body_fails_like_a_store_error() {
        let dir = tempfile::tempdir().unwrap();
        let req = Request::post("/api/contact")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = send(router(state(&dir)), req).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json(&body)["error"], "Failed to process submission");
    }
}
