use crate::config::Config;
use crate::matching::batch::BatchOrchestrator;

/// Shared application state injected into all route handlers via Axum extractors.
/// Read-only after startup; each request builds its own inputs and report.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Taxonomy, similarity metric and fan-out limits, shared by every batch.
    pub orchestrator: BatchOrchestrator,
}
