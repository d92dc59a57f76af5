//! Bridge entry point: CLI parsing, logging setup, accept loop.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cmp_bridge::config::{self, BridgeConfig};
use cmp_bridge::lifecycle::{self, Shutdown};
use cmp_bridge::net::Listener;
use cmp_bridge::server::BridgeServer;

/// CMP TCP-to-HTTP bridge.
#[derive(Parser)]
#[command(name = "cmp-bridge")]
#[command(about = "Relays CMP-over-TCP requests to an HTTP transport endpoint", long_about = None)]
struct Args {
    /// Path to a TOML config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Upstream URI to POST payloads to (overrides the config file).
    #[arg(short, long)]
    uri: Option<String>,

    /// Listening address (overrides the config file).
    #[arg(short, long)]
    bind: Option<String>,

    /// Base64-transcode payloads to and from the upstream.
    #[arg(short, long)]
    transcode: bool,

    /// Maximum concurrent sessions (overrides the config file).
    #[arg(long)]
    max_connections: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => config::load_config(path)?,
        None => BridgeConfig::default(),
    };
    apply_overrides(&mut config, &args);

    config::validate_config(&config)?;
    let uri = config::upstream_uri(&config)?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("cmp_bridge={}", config.observability.log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        bind_address = %config.listener.bind_address,
        max_connections = config.listener.max_connections,
        upstream = %uri,
        transcode = config.upstream.transcode,
        "cmp-bridge starting"
    );

    let listener = Listener::bind(&config.listener).await?;

    let shutdown = Shutdown::new();
    let server = BridgeServer::new(uri, config.upstream.transcode);
    let server_shutdown = shutdown.subscribe();

    let server_task = tokio::spawn(async move {
        server.run(listener, server_shutdown).await;
    });

    lifecycle::wait_for_signal().await;
    shutdown.trigger();
    server_task.await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Fold CLI flags over the file-sourced configuration.
fn apply_overrides(config: &mut BridgeConfig, args: &Args) {
    if let Some(uri) = &args.uri {
        config.upstream.uri = uri.clone();
    }
    if let Some(bind) = &args.bind {
        config.listener.bind_address = bind.clone();
    }
    if args.transcode {
        config.upstream.transcode = true;
    }
    if let Some(max) = args.max_connections {
        config.listener.max_connections = max;
    }
}
