mod config;
mod errors;
mod matching;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::matching::batch::BatchOrchestrator;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Ranker API v{}", env!("CARGO_PKG_VERSION"));

    // Load the skill taxonomy once; it is read-only for the life of the process
    let taxonomy = Arc::new(config.load_taxonomy()?);
    info!(
        "Taxonomy loaded: {} skills ({})",
        taxonomy.len(),
        config
            .taxonomy_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "built-in".to_string())
    );

    if taxonomy.is_empty() {
        warn!("Taxonomy has no skills; every skill score will be 0");
    }

    // Text similarity backend (cosine by default, swap via SIMILARITY_METRIC)
    let similarity = config.similarity.scorer();
    info!(
        "Scoring: {} similarity, weights skill={} text={}, concurrency={}, timeout={}ms",
        similarity.name(),
        config.weights.skill_weight,
        config.weights.text_weight,
        config.max_concurrency,
        config.task_timeout_ms
    );

    let orchestrator = BatchOrchestrator::new(taxonomy, similarity, config.batch_options());

    // Build app state
    let state = AppState {
        config: config.clone(),
        orchestrator,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the frontend host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
