use serde_json::json;

use super::{LlmError, Turn};
use crate::config::AnthropicConfig;

const DEFAULT_API_BASE: &str = "https://api.anthropic.com";
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Client for the Anthropic Messages API.
pub struct AnthropicClient {
    client: reqwest::Client,
    url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl AnthropicClient {
    /// Build a client, or `None` when no API key is configured.
    pub fn from_config(anthropic_config: &AnthropicConfig) -> Option<Self> {
        if anthropic_config.api_key.is_empty() {
            return None;
        }
        let base = anthropic_config
            .api_base
            .as_deref()
            .unwrap_or(DEFAULT_API_BASE)
            .trim_end_matches('/');
        Some(Self {
            client: reqwest::Client::new(),
            url: format!("{base}/v1/messages"),
            api_key: anthropic_config.api_key.clone(),
            model: anthropic_config.model.clone(),
            max_tokens: anthropic_config.max_tokens,
        })
    }

    /// Send a conversation and return the text of the first content block.
    pub async fn complete(&self, system: &str, messages: &[Turn]) -> Result<String, LlmError> {
        // The Messages API requires the conversation to open with a user turn
        let start = messages
            .iter()
            .position(|t| t.role == "user")
            .unwrap_or(messages.len());
        let messages = &messages[start..];

        let body = json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "system": system,
            "messages": messages,
        });

        let resp = self
            .client
            .post(&self.url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Request(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(LlmError::Api(format!("HTTP {status}: {body}")));
        }

        let parsed: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        let text = parsed["content"][0]["text"]
            .as_str()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| LlmError::Parse("Missing content text".into()))?;

        tracing::info!(model = %self.model, response_len = text.len(), "Claude responded");
        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(base: &str) -> AnthropicClient {
        AnthropicClient::from_config(&AnthropicConfig {
            api_key: "test-api-key".into(),
            api_base: Some(base.to_string()),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn no_key_no_client() {
        assert!(AnthropicClient::from_config(&AnthropicConfig::default()).is_none());
    }

    #[tokio::test]
    async fn returns_first_text_block() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "test-api-key"))
            .and(header("anthropic-version", ANTHROPIC_VERSION))
            .and(body_partial_json(json!({
                "max_tokens": 300,
                "system": "be brief",
                "messages": [{ "role": "user", "content": "What do you do?" }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "content": [{ "type": "text", "text": "We automate busywork." }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let text = client(&server.uri())
            .complete("be brief", &[Turn::user("What do you do?")])
            .await
            .unwrap();
        assert_eq!(text, "We automate busywork.");
    }

    #[tokio::test]
    async fn leading_assistant_turns_are_dropped() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "messages": [{ "role": "user", "content": "pricing?" }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "content": [{ "type": "text", "text": "It depends." }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let history = vec![
            Turn {
                role: "assistant".into(),
                content: "Hi! How can I help?".into(),
            },
            Turn::user("pricing?"),
        ];
        let text = client(&server.uri()).complete("s", &history).await.unwrap();
        assert_eq!(text, "It depends.");
    }

    #[tokio::test]
    async fn upstream_error_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(529).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let err = client(&server.uri())
            .complete("s", &[Turn::user("hi")])
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Api(ref m) if m.contains("529")));
    }

    #[tokio::test]
    async fn empty_content_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "content": [] })))
            .mount(&server)
            .await;

        let err = client(&server.uri())
            .complete("s", &[Turn::user("hi")])
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Parse(_)));
    }
}
