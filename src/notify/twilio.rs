use crate::config::TwilioConfig;

const DEFAULT_API_BASE: &str = "https://api.twilio.com";

/// Twilio REST API client for lead texts and welcome calls.
pub struct TwilioClient {
    client: reqwest::Client,
    api_base: String,
    account_sid: String,
    auth_token: String,
    from_number: String,
}

impl TwilioClient {
    /// Build a client, or `None` when credentials or the sender number are missing.
    pub fn from_config(twilio_config: &TwilioConfig) -> Option<Self> {
        if twilio_config.account_sid.is_empty()
            || twilio_config.auth_token.is_empty()
            || twilio_config.phone_number.is_empty()
        {
            return None;
        }
        Some(Self {
            client: reqwest::Client::new(),
            api_base: twilio_config
                .api_base
                .clone()
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
                .trim_end_matches('/')
                .to_string(),
            account_sid: twilio_config.account_sid.clone(),
            auth_token: twilio_config.auth_token.clone(),
            from_number: twilio_config.phone_number.clone(),
        })
    }

    /// Send an SMS. Returns the message SID.
    pub async fn send_sms(&self, to: &str, body: &str) -> Result<String, TwilioError> {
        let params = [("To", to), ("From", self.from_number.as_str()), ("Body", body)];
        let sid = self.post_form("Messages.json", &params).await?;
        tracing::info!(to, message_sid = %sid, "SMS sent");
        Ok(sid)
    }

    /// Initiate an outbound call. When answered, Twilio fetches TwiML from
    /// `webhook_url` and plays it.
    pub async fn call(&self, to: &str, webhook_url: &str) -> Result<String, TwilioError> {
        let params = [("To", to), ("From", self.from_number.as_str()), ("Url", webhook_url)];
        let sid = self.post_form("Calls.json", &params).await?;
        tracing::info!(to, call_sid = %sid, "Outbound call initiated");
        Ok(sid)
    }

    async fn post_form(&self, resource: &str, params: &[(&str, &str)]) -> Result<String, TwilioError> {
        let url = format!(
            "{}/2010-04-01/Accounts/{}/{}",
            self.api_base, self.account_sid, resource
        );

        let resp = self
            .client
            .post(&url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(params)
            .send()
            .await
            .map_err(|e| TwilioError::Request(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(TwilioError::Api(format!("{status}: {body}")));
        }

        let body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| TwilioError::Request(e.to_string()))?;

        Ok(body["sid"].as_str().unwrap_or("unknown").to_string())
    }
}

/// Simple URL encoding for query parameter values.
pub fn urlencoded(s: &str) -> String {
    s.bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                String::from(b as char)
            }
            _ => format!("%{b:02X}"),
        })
        .collect()
}

#[derive(Debug, thiserror::Error)]
pub enum TwilioError {
    #[error("HTTP request failed: {0}")]
    Request(String),
    #[error("Twilio API error: {0}")]
    Api(String),
}
