use serde::Serialize;

use crate::config::ResendConfig;
use crate::lead::templates::EmailContent;

const DEFAULT_API_BASE: &str = "https://api.resend.com";

/// Resend transactional email client.
pub struct ResendClient {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    from: String,
    reply_to: Option<String>,
}

#[derive(Serialize)]
struct SendEmail<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
}

impl ResendClient {
    /// Build a client, or `None` when the API key or sender is missing.
    pub fn from_config(resend_config: &ResendConfig) -> Option<Self> {
        if resend_config.api_key.is_empty() || resend_config.from.is_empty() {
            return None;
        }
        Some(Self {
            client: reqwest::Client::new(),
            api_base: resend_config
                .api_base
                .as_deref()
                .unwrap_or(DEFAULT_API_BASE)
                .trim_end_matches('/')
                .to_string(),
            api_key: resend_config.api_key.clone(),
            from: resend_config.from.clone(),
            reply_to: resend_config.reply_to.clone(),
        })
    }

    /// Send one email. Returns the Resend email id.
    pub async fn send(&self, to: &str, email: &EmailContent) -> Result<String, ResendError> {
        let body = SendEmail {
            from: &self.from,
            to: [to],
            subject: &email.subject,
            html: &email.html,
            reply_to: self.reply_to.as_deref(),
        };

        let resp = self
            .client
            .post(format!("{}/emails", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ResendError::Request(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(ResendError::Api(format!("{status}: {body}")));
        }

        let parsed: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| ResendError::Request(e.to_string()))?;
        let id = parsed["id"].as_str().unwrap_or("unknown").to_string();

        tracing::info!(to, email_id = %id, "Email sent");
        Ok(id)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ResendError {
    #[error("HTTP request failed: {0}")]
    Request(String),
    #[error("Resend API error: {0}")]
    Api(String),
}
