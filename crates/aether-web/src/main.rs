mod api;
mod config;
mod dto;
mod error;
mod middleware;
mod state;

use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;

use aether_core::RootConfig;
use axum::http::{header, Method};
use axum::middleware::from_fn;
use clap::Parser;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Overrides, ServerConfig};
use crate::state::AppState;

/// Read-only HTTP browser for one directory tree.
#[derive(Parser, Debug)]
#[command(name = "aether-web")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to a TOML configuration file (defaults to $AETHER_CONFIG)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// IP address to bind
    #[arg(long)]
    host: Option<IpAddr>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory to serve; created if missing
    #[arg(long, value_name = "DIR")]
    root_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aether_web=debug,aether_core=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let overrides = Overrides {
        host: cli.host,
        port: cli.port,
        root_dir: cli.root_dir,
    };
    let config = ServerConfig::load(cli.config.as_deref(), &overrides)?;
    let bind_addr = config.bind_addr;

    let root = RootConfig::from_settings(&config.core)?;
    tracing::info!("serving {}", root.root_dir().display());
    if !root.hidden_patterns().is_empty() {
        tracing::debug!("hidden patterns: {:?}", root.hidden_patterns());
    }

    let state = AppState {
        config: Arc::new(root),
        request_timeout: config.request_timeout(),
    };

    // Same-origin by default; the API is read-only.
    let cors = CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE]);

    let app = axum::Router::new()
        .nest("/api", api::router())
        .layer(from_fn(middleware::security_headers::security_headers))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!("aether-web listening on http://{}", bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
