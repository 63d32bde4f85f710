//! Bugboard Node - bug tracking REST service.

use anyhow::Context;
use bugboard_node::api::{create_router, AppState};
use bugboard_node::config::NodeConfig;
use bugboard_node::observability::{init_logging, LogFormat};
use bugboard_tracker::BugStore;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Bugboard Node - bug tracking REST service
#[derive(Parser, Debug)]
#[command(name = "bugboard-node")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (toml, yaml or json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// API listen address
    #[arg(long)]
    api_addr: Option<SocketAddr>,

    /// SQLite database file; records are kept in memory when omitted
    #[arg(long)]
    database: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Log format (pretty, json)
    #[arg(long)]
    log_format: Option<String>,
}

impl Args {
    /// Command-line flags override every other configuration source.
    fn apply(self, config: &mut NodeConfig) {
        if let Some(addr) = self.api_addr {
            config.api_addr = addr;
        }
        if let Some(path) = self.database {
            config.database_path = Some(path);
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        if let Some(format) = self.log_format {
            config.log_format = LogFormat::parse(&format);
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = NodeConfig::load(args.config.as_deref()).context("loading configuration")?;
    args.apply(&mut config);

    init_logging(&config.log_level, config.log_format);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting bugboard node");

    let store = config.open_store().context("opening bug store")?;
    tracing::info!(
        api_addr = %config.api_addr,
        backend = store.backend(),
        "Node configuration"
    );

    let app = create_router(AppState::new(store));
    let listener = tokio::net::TcpListener::bind(config.api_addr)
        .await
        .with_context(|| format!("binding {}", config.api_addr))?;

    tracing::info!("Node is ready. Press Ctrl+C to stop.");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    tracing::info!("Bugboard node stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
