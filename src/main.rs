mod api;
mod config;
mod ids;
mod lead;
mod llm;
mod notify;
mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use config::Config;
use llm::anthropic::AnthropicClient;
use llm::openai::OpenAiClient;
use notify::LeadNotifier;
use store::Store;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Shared application state accessible from all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Store,
    pub notifier: Arc<LeadNotifier>,
    /// Website chat widget backend. `None` when no Anthropic key is set.
    pub anthropic: Option<Arc<AnthropicClient>>,
    /// Discovery interview and realtime voice. `None` when no OpenAI key is set.
    pub openai: Option<Arc<OpenAiClient>>,
}

impl AppState {
    pub fn from_config(config: Config) -> Self {
        let anthropic = AnthropicClient::from_config(&config.anthropic).map(Arc::new);
        if anthropic.is_none() {
            tracing::warn!("ANTHROPIC_API_KEY not set, chat will answer with fallbacks");
        }
        let openai = OpenAiClient::from_config(&config.openai).map(Arc::new);
        if openai.is_none() {
            tracing::warn!("OPENAI_API_KEY not set, discovery and realtime voice are disabled");
        }

        Self {
            store: Store::new(config.server.data_dir.clone()),
            notifier: Arc::new(LeadNotifier::from_config(&config)),
            anthropic,
            openai,
            config: Arc::new(config),
        }
    }
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    match args.get(1).map(|s| s.as_str()) {
        Some("--version") => println!("lead-funnel {VERSION}"),
        Some("--help") | Some("-h") => print_usage(),
        Some(other) => {
            eprintln!("Unknown option: {other}");
            print_usage();
            std::process::exit(1);
        }
        None => {
            let rt = match tokio::runtime::Runtime::new() {
                Ok(rt) => rt,
                Err(e) => {
                    eprintln!("Failed to create tokio runtime: {e}");
                    std::process::exit(1);
                }
            };
            if let Err(e) = rt.block_on(server()) {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
    }
}

fn print_usage() {
    println!("lead-funnel {VERSION}");
    println!("Lead intake, operator notifications and assistant endpoints");
    println!();
    println!("Usage: lead-funnel [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --version   Print version");
    println!("  --help, -h  Print this help message");
    println!();
    println!("Without options, starts the HTTP server.");
    println!("Config: $LEAD_FUNNEL_CONFIG or ~/.lead-funnel/config.toml (optional)");
}

async fn server() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lead_funnel=info,tower_http=info".into()),
        )
        .init();

    let config = Config::load().map_err(|e| format!("Failed to load config: {e}"))?;

    tracing::info!(
        host = %config.server.host,
        port = config.server.port,
        data_dir = %config.server.data_dir.display(),
        "Starting lead-funnel"
    );

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| format!("Invalid server address: {e}"))?;

    let state = AppState::from_config(config);
    tracing::info!(leads = %state.store.leads.path().display(), "Lead store");
    let app = api::router(state);

    tracing::info!(%addr, "Listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind {addr}: {e}"))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| format!("Server error: {e}"))?;
    Ok(())
}
