use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use momenic_proxy::{
    config::Config,
    web::{AppState, WebServer},
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "momenic-proxy")]
#[command(version)]
#[command(about = "Catalog backend for the Momenic invitation site")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Listening IP address
    #[arg(short = 'H', long, value_name = "IP")]
    host: Option<String>,

    /// Listening port
    #[arg(short, long, value_name = "PORT")]
    port: Option<u16>,

    /// Directory with the built SPA to serve
    #[arg(long, value_name = "DIR")]
    static_dir: Option<std::path::PathBuf>,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,

    /// Log output format
    #[arg(long, value_enum, default_value = "text")]
    log_format: LogFormat,
}

fn init_tracing(cli: &Cli) {
    let log_filter = if cli.log_level == "trace" {
        format!("momenic_proxy={},tower_http=trace", cli.log_level)
    } else {
        format!("momenic_proxy={}", cli.log_level)
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| log_filter.into());

    let registry = tracing_subscriber::registry().with(filter);
    match cli.log_format {
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    info!("Starting momenic-proxy v{}", env!("CARGO_PKG_VERSION"));

    let mut config = Config::load_from_file(&cli.config)?;
    if let Some(host) = cli.host {
        config.web.host = host;
    }
    if let Some(port) = cli.port {
        config.web.port = port;
    }
    if let Some(dir) = cli.static_dir {
        config.web.static_dir = Some(dir);
    }

    if !config.upstream.has_credentials() {
        tracing::warn!(
            "Upstream credentials are not configured; theme queries will fail until INVISIMPLE_EMAIL and INVISIMPLE_PASSWORD are set"
        );
    }
    let session_store = if config.session.cache_file.is_some() {
        "file"
    } else {
        "memory"
    };
    info!(
        "Upstream: {} (session store: {})",
        config.upstream.base_url, session_store
    );

    let state = AppState::from_config(config)?;
    let server = WebServer::new(state)?;
    server.serve().await
}
