use serde_json::{json, Value};

use super::{LlmError, Turn};
use crate::config::OpenAiConfig;

const DEFAULT_API_BASE: &str = "https://api.openai.com";

/// Client for OpenAI chat completions and realtime session bootstrap.
pub struct OpenAiClient {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    config: OpenAiConfig,
}

impl OpenAiClient {
    /// Build a client, or `None` when no API key is configured.
    pub fn from_config(openai_config: &OpenAiConfig) -> Option<Self> {
        if openai_config.api_key.is_empty() {
            return None;
        }
        Some(Self {
            client: reqwest::Client::new(),
            api_base: openai_config
                .api_base
                .as_deref()
                .unwrap_or(DEFAULT_API_BASE)
                .trim_end_matches('/')
                .to_string(),
            api_key: openai_config.api_key.clone(),
            config: openai_config.clone(),
        })
    }

    /// Chat completion with a leading system message. Returns the first choice's text.
    pub async fn chat(&self, system: &str, messages: &[Turn]) -> Result<String, LlmError> {
        let mut all = Vec::with_capacity(messages.len() + 1);
        all.push(json!({ "role": "system", "content": system }));
        all.extend(
            messages
                .iter()
                .map(|t| json!({ "role": t.role, "content": t.content })),
        );

        let body = json!({
            "model": self.config.chat_model,
            "messages": all,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
        });

        let parsed = self.post("/v1/chat/completions", &body).await?;
        let text = parsed["choices"][0]["message"]["content"]
            .as_str()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| LlmError::Parse("Missing choices[0].message.content".into()))?;

        tracing::info!(
            model = %self.config.chat_model,
            response_len = text.len(),
            "OpenAI responded"
        );
        Ok(text.to_string())
    }

    /// Create a realtime voice session. The upstream payload (including the
    /// ephemeral client secret) is returned untouched for the browser.
    pub async fn create_realtime_session(&self, instructions: &str) -> Result<Value, LlmError> {
        let body = json!({
            "model": self.config.realtime_model,
            "voice": self.config.realtime_voice,
            "instructions": instructions,
            "input_audio_transcription": { "model": "whisper-1" },
            "turn_detection": {
                "type": "server_vad",
                "threshold": 0.5,
                "prefix_padding_ms": 300,
                "silence_duration_ms": 800
            }
        });

        let session = self.post("/v1/realtime/sessions", &body).await?;
        tracing::info!(model = %self.config.realtime_model, "Realtime session created");
        Ok(session)
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value, LlmError> {
        let resp = self
            .client
            .post(format!("{}{path}", self.api_base))
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| LlmError::Request(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(LlmError::Api(format!("HTTP {status}: {body}")));
        }

        resp.json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))
    }
}
