//! Ratings HTTP Server Binary
//!
//! Main entry point for the ratings REST API server. It loads the
//! configuration, builds the rating source, sets up the HTTP router, and
//! starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! # Serve ratings from the default CSV (data/full_ratings.csv)
//! cargo run --bin ratings-server
//!
//! # Serve ratings from another CSV
//! RATINGS_CSV=/srv/full_ratings.csv cargo run --bin ratings-server
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 5055)
//! - `RATINGS_CSV`: Ratings CSV path
//! - `SOURCE_TYPE`: `csv` or `local`
//! - `ALLOWED_ORIGINS`: Comma-separated CORS origins (default: any)
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use ratings_trends::config::AppConfig;
use ratings_trends::db::SourceFactory;
use ratings_trends::http::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting ratings HTTP server");

    let config = AppConfig::load()?;
    let source = SourceFactory::from_config(&config)?;
    info!("Rating source initialized ({})", config.source.source_type);

    let state = AppState::new(source);
    let app = create_router(state, &config.server.allowed_origins);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
