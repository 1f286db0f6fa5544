//! Weatherdeck server binary.
//!
//! Initializes logging, indexes the bundled client, and serves the proxy
//! endpoint plus static assets.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use weatherdeck::{create_router, AppState, AssetIndex, CacheStore, Fetcher};

#[derive(Parser, Debug)]
#[command(name = "weatherdeck", about = "Weather kiosk server with a caching CORS relay")]
struct Args {
    /// Address to listen on.
    #[arg(long, default_value = "0.0.0.0:8080")]
    addr: String,

    /// Directory containing the bundled web client.
    #[arg(long, default_value = "dist")]
    assets: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "weatherdeck=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let assets = AssetIndex::build(&args.assets)
        .with_context(|| format!("indexing assets in {}", args.assets.display()))?;

    let state = Arc::new(AppState {
        cache: Arc::new(CacheStore::new(Fetcher::new())),
        assets,
    });
    let app = create_router(state);

    // A bind failure here is fatal.
    let listener = tokio::net::TcpListener::bind(&args.addr)
        .await
        .with_context(|| format!("binding to {}", args.addr))?;
    info!("listening on {}", args.addr);
    axum::serve(listener, app).await?;

    Ok(())
}
