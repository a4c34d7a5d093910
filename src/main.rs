use anyhow::{Context, Result};
use clap::Parser; // for cli
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crash_stats_api::cache::spawn_sweeper;
use crash_stats_api::config::Args;
use crash_stats_api::{AppState, PgDataSource, QueryCache, router};

// this is main async function with tokio
#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        tracing::error!("server failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // parse cli arguments
    let args = Args::parse();

    let source = PgDataSource::connect(&args.database_url, args.max_connections)
        .await
        .context("failed to connect to the database")?;

    // one cache for the whole process, shared by every handler
    let cache = Arc::new(QueryCache::new(args.cache_config()));
    if let Some(every) = args.sweep_interval() {
        spawn_sweeper(cache.clone(), every);
    }

    let state = Arc::new(AppState::new(cache, Arc::new(source), args.coalesce));
    let coalescing = state.read_through.is_coalescing();
    let app = router(state);

    let addr = args.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    tracing::info!("API running on http://{}", addr);
    tracing::info!(
        ttl_seconds = args.cache_ttl,
        coalescing,
        sweep_interval = args.sweep_interval,
        "cache configured"
    );

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
