//! CPT Console
//!
//! Run with: cargo run -- serve
//!
//! # Configuration
//!
//! Settings come from a TOML file (`--config`, or the default locations) with
//! `CPT_CONSOLE_*` environment overrides. `RUST_LOG` takes precedence over the
//! configured log level.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cpt_console::api::{serve, AppState};
use cpt_console::config::{generate_default_config, Config, LoggingConfig};
use cpt_console::wp::WpClient;

#[derive(Parser)]
#[command(name = "cpt-console")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Admin console for WordPress custom post types and ACPT fields")]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the console server (default)
    Serve,

    /// Print a default config file
    InitConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(Commands::InitConfig) = cli.command {
        print!("{}", generate_default_config());
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::load_default(),
    };

    init_tracing(&config.logging);

    tracing::info!("Starting CPT Console v{}", env!("CARGO_PKG_VERSION"));

    let client = WpClient::new(config.client_config()).context("building HTTP client")?;
    let server_config = config.server_config();
    tracing::info!(
        max_sessions = server_config.sessions.max_sessions,
        timeout_secs = config.upstream.request_timeout_secs,
        "Console configured"
    );

    let state = AppState::new(client, server_config.clone());
    serve(state, &server_config)
        .await
        .context("running console server")?;

    tracing::info!("CPT Console stopped");
    Ok(())
}

/// Install the tracing subscriber described by the logging config
fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("cpt_console={},tower_http=info", logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
