use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub brand: BrandConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
    #[serde(default)]
    pub resend: ResendConfig,
    #[serde(default)]
    pub twilio: TwilioConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub anthropic: AnthropicConfig,
    #[serde(default)]
    pub openai: OpenAiConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Public base URL, used to build the voice webhook handed to Twilio.
    #[serde(default)]
    pub external_url: String,
    /// Directory holding leads.json, chat-messages.json and trigger files.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Browser origins allowed to call the API. Empty allows any origin.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            external_url: String::new(),
            data_dir: default_data_dir(),
            allowed_origins: Vec::new(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

/// Names substituted into templates and system prompts.
#[derive(Debug, Deserialize, Clone)]
pub struct BrandConfig {
    #[serde(default = "default_company")]
    pub company: String,
    #[serde(default = "default_assistant")]
    pub assistant: String,
    #[serde(default = "default_owner")]
    pub owner: String,
    #[serde(default)]
    pub site_url: String,
}

impl Default for BrandConfig {
    fn default() -> Self {
        Self {
            company: default_company(),
            assistant: default_assistant(),
            owner: default_owner(),
            site_url: String::new(),
        }
    }
}

fn default_company() -> String {
    "Stoke-AI".to_string()
}

fn default_assistant() -> String {
    "Spark".to_string()
}

fn default_owner() -> String {
    "Jeff".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct NotifyConfig {
    /// Pause between the SMS and the voice call.
    #[serde(default = "default_call_delay")]
    pub call_delay_ms: u64,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            call_delay_ms: default_call_delay(),
        }
    }
}

fn default_call_delay() -> u64 {
    2000
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ResendConfig {
    #[serde(default)]
    pub api_key: String,
    /// Sender, e.g. `Spark <spark@example.com>`.
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub reply_to: Option<String>,
    #[serde(default)]
    pub api_base: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct TwilioConfig {
    #[serde(default)]
    pub account_sid: String,
    #[serde(default)]
    pub auth_token: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub api_base: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct TelegramConfig {
    #[serde(default)]
    pub bot_token: String,
    #[serde(default)]
    pub chat_id: String,
    #[serde(default)]
    pub api_base: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AnthropicConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_anthropic_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default)]
    pub api_base: Option<String>,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_anthropic_model(),
            max_tokens: default_max_tokens(),
            api_base: None,
        }
    }
}

fn default_anthropic_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_max_tokens() -> u32 {
    300
}

#[derive(Debug, Deserialize, Clone)]
pub struct OpenAiConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_chat_model")]
    pub chat_model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_realtime_model")]
    pub realtime_model: String,
    #[serde(default = "default_realtime_voice")]
    pub realtime_voice: String,
    #[serde(default)]
    pub api_base: Option<String>,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            chat_model: default_chat_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            realtime_model: default_realtime_model(),
            realtime_voice: default_realtime_voice(),
            api_base: None,
        }
    }
}

fn default_chat_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_temperature() -> f32 {
    0.8
}

fn default_realtime_model() -> String {
    "gpt-4o-realtime-preview-2024-12-17".to_string()
}

fn default_realtime_voice() -> String {
    "shimmer".to_string()
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ApiConfig {
    /// Bearer token required for the admin leads endpoint. If empty, those requests are rejected.
    #[serde(default)]
    pub token: String,
}

impl Config {
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        // .env next to config.toml first, then the working directory
        let env_path = config_dir().join(".env");
        match dotenvy::from_path(&env_path) {
            Ok(()) => tracing::info!("Loaded .env from {}", env_path.display()),
            Err(dotenvy::Error::Io(_)) => {
                tracing::debug!("No .env file at {}", env_path.display());
            }
            Err(e) => tracing::warn!("Failed to parse .env: {e}"),
        }
        if let Err(e) = dotenvy::dotenv() {
            if !matches!(e, dotenvy::Error::Io(_)) {
                tracing::warn!("Failed to parse ./.env: {e}");
            }
        }

        let path = config_path();
        let mut config: Config = if path.exists() {
            tracing::info!("Loading config from {}", path.display());
            let contents = std::fs::read_to_string(&path).map_err(|e| {
                format!("Failed to read config at {}: {}", path.display(), e)
            })?;
            toml::from_str(&contents)?
        } else {
            tracing::info!(
                "No config at {}, using defaults and environment",
                path.display()
            );
            Config::default()
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply environment overrides for secrets and deployment settings.
    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(v) = var("RESEND_API_KEY") {
            self.resend.api_key = v;
        }
        if let Some(v) = var("RESEND_FROM") {
            self.resend.from = v;
        }
        if let Some(v) = var("TWILIO_ACCOUNT_SID") {
            self.twilio.account_sid = v;
        }
        if let Some(v) = var("TWILIO_AUTH_TOKEN") {
            self.twilio.auth_token = v;
        }
        if let Some(v) = var("TWILIO_PHONE_NUMBER") {
            self.twilio.phone_number = v;
        }
        if let Some(v) = var("TELEGRAM_BOT_TOKEN") {
            self.telegram.bot_token = v;
        }
        if let Some(v) = var("TELEGRAM_CHAT_ID") {
            self.telegram.chat_id = v;
        }
        if let Some(v) = var("ANTHROPIC_API_KEY") {
            self.anthropic.api_key = v;
        }
        if let Some(v) = var("OPENAI_API_KEY") {
            self.openai.api_key = v;
        }
        if let Some(v) = var("LEAD_FUNNEL_API_TOKEN") {
            self.api.token = v;
        }
        if let Some(v) = var("SERVER_EXTERNAL_URL") {
            self.server.external_url = v;
        }
        if let Some(v) = var("LEAD_FUNNEL_DATA_DIR") {
            self.server.data_dir = PathBuf::from(v);
        }
        if let Some(port) = var("PORT").and_then(|v| v.parse().ok()) {
            self.server.port = port;
        }
    }
}

fn config_dir() -> PathBuf {
    if let Ok(p) = std::env::var("LEAD_FUNNEL_CONFIG") {
        // If pointing to a file, use its parent directory
        let path = PathBuf::from(p);
        return path.parent().map(|p| p.to_path_buf()).unwrap_or(path);
    }

    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".lead-funnel")
}

fn config_path() -> PathBuf {
    if let Ok(p) = std::env::var("LEAD_FUNNEL_CONFIG") {
        return PathBuf::from(p);
    }

    config_dir().join("config.toml")
}
