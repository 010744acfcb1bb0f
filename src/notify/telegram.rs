use serde_json::json;

use crate::config::TelegramConfig;

const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Telegram's per-message character limit.
const MAX_CHARS: usize = 4096;

/// Telegram bot client used for operator notifications.
pub struct TelegramClient {
    client: reqwest::Client,
    api_base: String,
    bot_token: String,
    chat_id: String,
}

impl TelegramClient {
    /// Build a client, or `None` when the bot token or chat id is missing.
    pub fn from_config(telegram_config: &TelegramConfig) -> Option<Self> {
        if telegram_config.bot_token.is_empty() || telegram_config.chat_id.is_empty() {
            return None;
        }
        Some(Self {
            client: reqwest::Client::new(),
            api_base: telegram_config
                .api_base
                .as_deref()
                .unwrap_or(DEFAULT_API_BASE)
                .trim_end_matches('/')
                .to_string(),
            bot_token: telegram_config.bot_token.clone(),
            chat_id: telegram_config.chat_id.clone(),
        })
    }

    /// Post a Markdown message to the operator chat, split if too long.
    pub async fn send_markdown(&self, text: &str) -> Result<(), TelegramError> {
        for chunk in split_text(text, MAX_CHARS) {
            self.send_chunk(chunk).await?;
        }
        tracing::info!(chat_id = %self.chat_id, len = text.len(), "Operator notified");
        Ok(())
    }

    async fn send_chunk(&self, text: &str) -> Result<(), TelegramError> {
        let body = json!({
            "chat_id": self.chat_id,
            "text": text,
            "parse_mode": "Markdown",
        });

        let resp = self
            .client
            .post(format!("{}/bot{}/sendMessage", self.api_base, self.bot_token))
            .json(&body)
            .send()
            .await
            .map_err(|e| TelegramError::Request(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(TelegramError::Api(format!("{status}: {body}")));
        }

        Ok(())
    }
}

/// Split text at line boundaries to stay under the character limit.
///
/// If a single line exceeds the limit, falls back to splitting at the limit
/// on a char boundary.
fn split_text(text: &str, max_chars: usize) -> Vec<&str> {
    if text.len() <= max_chars {
        return vec![text];
    }

    let mut chunks = Vec::new();
    let mut remaining = text;

    while !remaining.is_empty() {
        if remaining.len() <= max_chars {
            chunks.push(remaining);
            break;
        }

        let mut limit = max_chars;
        while !remaining.is_char_boundary(limit) {
            limit -= 1;
        }

        let pos = remaining[..limit]
            .rfind('\n')
            .map(|i| i + 1)
            .unwrap_or(limit);
        chunks.push(&remaining[..pos]);
        remaining = &remaining[pos..];
    }

    chunks
}

#[derive(Debug, thiserror::Error)]
pub enum TelegramError {
    #[error("HTTP request failed: {0}")]
    Request(String),
    #[error("Telegram API error: {0}")]
    Api(String),
}
