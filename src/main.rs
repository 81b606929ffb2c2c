//! Chunkwise Service - Main Entry Point
//!
//! HTTP front end for the chunking engine.

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chunkwise::api::{self, handlers::AppState};
use chunkwise::router::ChunkingRouter;
use chunkwise::types::ServiceConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "chunkwise=info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = ServiceConfig::from_env();

    info!("Starting Chunkwise Service v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Default chunk size: {} chars, overlap: {} chars",
        config.default_chunk_size, config.default_chunk_overlap
    );
    info!("Semantic provider: {}", config.semantic.provider);

    let router = ChunkingRouter::new(&config)?;
    let port = config.port;

    let state = Arc::new(AppState { router, config });
    let app = api::build_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
