use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::matching::batch::BatchOptions;
use crate::matching::hybrid::ScoringWeights;
use crate::matching::similarity::SimilarityMetric;
use crate::matching::taxonomy::Taxonomy;

/// Application configuration loaded from environment variables.
/// Every variable is optional; invalid values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// JSON taxonomy file. `None` uses the built-in catalogue.
    pub taxonomy_path: Option<PathBuf>,
    pub weights: ScoringWeights,
    pub similarity: SimilarityMetric,
    pub max_concurrency: usize,
    pub task_timeout_ms: u64,
    pub max_upload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            taxonomy_path: None,
            weights: ScoringWeights::default(),
            similarity: SimilarityMetric::default(),
            max_concurrency: 8,
            task_timeout_ms: 5_000,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key → value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();

        let weights = ScoringWeights::new(
            parse_or(&lookup, "SKILL_WEIGHT", defaults.weights.skill_weight)?,
            parse_or(&lookup, "TEXT_WEIGHT", defaults.weights.text_weight)?,
        )
        .context("SKILL_WEIGHT and TEXT_WEIGHT are inconsistent")?;

        let task_timeout_ms = parse_or(&lookup, "TASK_TIMEOUT_MS", defaults.task_timeout_ms)?;
        anyhow::ensure!(task_timeout_ms > 0, "TASK_TIMEOUT_MS must be greater than 0");

        Ok(Config {
            port: parse_or(&lookup, "PORT", defaults.port)?,
            rust_log: lookup("RUST_LOG").unwrap_or(defaults.rust_log),
            taxonomy_path: lookup("TAXONOMY_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            weights,
            similarity: parse_or(&lookup, "SIMILARITY_METRIC", defaults.similarity)?,
            max_concurrency: parse_or(&lookup, "MAX_CONCURRENCY", defaults.max_concurrency)?
                .max(1),
            task_timeout_ms,
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
        })
    }

    pub fn batch_options(&self) -> BatchOptions {
        BatchOptions {
            max_concurrency: self.max_concurrency,
            task_timeout: Duration::from_millis(self.task_timeout_ms),
        }
    }

    pub fn load_taxonomy(&self) -> Result<Taxonomy> {
        match &self.taxonomy_path {
            Some(path) => Taxonomy::load(path)
                .with_context(|| format!("Failed to load taxonomy from '{}'", path.display())),
            None => Taxonomy::builtin().context("Built-in taxonomy is invalid"),
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{key} has invalid value '{raw}': {e}")),
        None => Ok(default),
    }
}
