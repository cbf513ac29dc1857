//! Axum route handlers for the Matching API.

use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::JsonRejection,
        Multipart, State,
    },
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::matching::hybrid::ScoringWeights;
use crate::matching::models::{BatchReport, JobDescription, ResumeDocument};
use crate::matching::taxonomy::TaxonomyEntry;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RankRequest {
    pub job_description: String,
    pub resumes: Vec<ResumeText>,
    /// Overrides the configured weights for this batch only.
    #[serde(default)]
    pub weights: Option<ScoringWeights>,
}

#[derive(Debug, Deserialize)]
pub struct ResumeText {
    pub name: String,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct TaxonomyResponse {
    pub size: usize,
    pub entries: Vec<TaxonomyEntry>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/rank
///
/// Ranks plain-text resumes supplied inline as JSON. Body rejections (bad JSON,
/// oversized body) are answered with the usual error envelope.
pub async fn handle_rank(
    State(state): State<AppState>,
    payload: Result<Json<RankRequest>, JsonRejection>,
) -> Result<Json<BatchReport>, AppError> {
    let Json(request) = payload?;
    let weights = request.weights.unwrap_or(state.config.weights);
    let job = JobDescription::new(request.job_description);
    let resumes = request
        .resumes
        .into_iter()
        .map(|r| ResumeDocument::from_text(r.name, r.text))
        .collect();

    let report = state.orchestrator.process(&job, resumes, weights).await?;
    Ok(Json(report))
}

/// POST /api/v1/match
///
/// Multipart upload: one `job_description` text field plus one or more
/// `file` / `files` parts. Each part's file name identifies the resume.
/// Undecodable files are reported in `errors` instead of failing the request.
pub async fn handle_match(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<BatchReport>, AppError> {
    let mut multipart = multipart?;
    let mut job_text: Option<String> = None;
    let mut resumes = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "job_description" => job_text = Some(field.text().await?),
            "file" | "files" => {
                let file_name = field
                    .file_name()
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("resume-{}", resumes.len() + 1));
                let content = field.bytes().await?;
                resumes.push(ResumeDocument::new(file_name, content));
            }
            other => tracing::debug!("Ignoring unknown multipart field '{other}'"),
        }
    }

    let job_text = job_text
        .ok_or_else(|| AppError::Validation("job_description field is required".to_string()))?;
    let job = JobDescription::new(job_text);

    let report = state
        .orchestrator
        .process(&job, resumes, state.config.weights)
        .await?;
    Ok(Json(report))
}

/// GET /api/v1/taxonomy
///
/// Returns the skill catalogue used for extraction, in reporting order.
pub async fn handle_taxonomy(State(state): State<AppState>) -> Json<TaxonomyResponse> {
    let taxonomy = state.orchestrator.taxonomy();
    Json(TaxonomyResponse {
        size: taxonomy.len(),
        entries: taxonomy.entries().to_vec(),
    })
}
