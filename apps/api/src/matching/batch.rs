//! Batch orchestration: validate once, score every resume as an isolated task,
//! wait for all of them, then rank.
//!
//! A resume that cannot be scored becomes a `ProcessingError` in the report;
//! it never aborts the batch or affects its siblings.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use futures::stream::{self, StreamExt};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::matching::hybrid::{combine, skill_score, ScoringWeights};
use crate::matching::models::{
    BatchReport, JobDescription, MatchResult, ProcessingError, ProcessingErrorKind,
    ResumeDocument,
};
use crate::matching::ranker::rank;
use crate::matching::similarity::TextSimilarity;
use crate::matching::skill_extractor::{compare_skills, extract_skills, SkillSet};
use crate::matching::taxonomy::Taxonomy;

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("Input validation failed: {0}")]
    InputValidation(String),
}

#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Upper bound on resumes scored at the same time. Values below 1 are treated as 1.
    pub max_concurrency: usize,
    /// Budget for a single resume, including time spent waiting for a worker.
    pub task_timeout: Duration,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            max_concurrency: 8,
            task_timeout: Duration::from_secs(5),
        }
    }
}

/// Long-lived scoring setup: the taxonomy, the text metric, and fan-out limits.
/// Cheap to clone; every field is shared.
#[derive(Clone)]
pub struct BatchOrchestrator {
    taxonomy: Arc<Taxonomy>,
    similarity: Arc<dyn TextSimilarity>,
    options: BatchOptions,
}

/// Per-batch data every task reads. Built once after validation.
struct JobContext {
    text: String,
    required: SkillSet,
    taxonomy: Arc<Taxonomy>,
    similarity: Arc<dyn TextSimilarity>,
    weights: ScoringWeights,
}

impl BatchOrchestrator {
    pub fn new(
        taxonomy: Arc<Taxonomy>,
        similarity: Arc<dyn TextSimilarity>,
        options: BatchOptions,
    ) -> Self {
        Self {
            taxonomy,
            similarity,
            options,
        }
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    /// Scores and ranks `resumes` against `job`.
    ///
    /// Fails only on batch-level validation (blank job text, no resumes, bad
    /// weights). Every resume ends up exactly once in `ranked` or `errors`.
    pub async fn process(
        &self,
        job: &JobDescription,
        resumes: Vec<ResumeDocument>,
        weights: ScoringWeights,
    ) -> Result<BatchReport, BatchError> {
        validate_batch(job, &resumes, &weights)?;

        let batch_id = Uuid::new_v4();
        let started = Instant::now();
        let total = resumes.len();
        info!(%batch_id, resumes = total, similarity = self.similarity.name(), "Starting batch");

        let context = Arc::new(JobContext {
            text: job.text.clone(),
            required: extract_skills(&job.text, &self.taxonomy),
            taxonomy: Arc::clone(&self.taxonomy),
            similarity: Arc::clone(&self.similarity),
            weights,
        });
        let required_skills = context.required.names(&self.taxonomy);
        if context.required.is_empty() {
            info!(%batch_id, "Job description names no taxonomy skills; skill scores will be 0");
        } else {
            debug!(
                %batch_id,
                count = context.required.len(),
                required = ?required_skills,
                "Extracted required skills"
            );
        }

        let timeout = self.options.task_timeout;
        let outcomes: Vec<Result<MatchResult, ProcessingError>> =
            stream::iter(resumes.into_iter().enumerate())
                .map(|(index, resume)| run_isolated(Arc::clone(&context), index, resume, timeout))
                .buffer_unordered(self.options.max_concurrency.max(1))
                .collect()
                .await;

        // Barrier reached: every task has either finished or failed.
        let mut results = Vec::with_capacity(total);
        let mut errors = Vec::new();
        for outcome in outcomes {
            match outcome {
                Ok(result) => results.push(result),
                Err(error) => {
                    warn!(
                        %batch_id,
                        resume = %error.resume,
                        kind = ?error.kind,
                        "Resume excluded from ranking: {}",
                        error.message
                    );
                    errors.push(error);
                }
            }
        }
        errors.sort_by_key(|e| e.submission_index);
        let ranked = rank(results);

        info!(
            %batch_id,
            ranked = ranked.len(),
            failed = errors.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Batch complete"
        );

        Ok(BatchReport {
            batch_id,
            generated_at: Utc::now(),
            weights,
            similarity: self.similarity.name().to_string(),
            required_skills,
            ranked,
            errors,
        })
    }
}

fn validate_batch(
    job: &JobDescription,
    resumes: &[ResumeDocument],
    weights: &ScoringWeights,
) -> Result<(), BatchError> {
    if job.text.trim().is_empty() {
        return Err(BatchError::InputValidation(
            "job description cannot be empty".to_string(),
        ));
    }
    if resumes.is_empty() {
        return Err(BatchError::InputValidation(
            "at least one resume is required".to_string(),
        ));
    }
    weights
        .validate()
        .map_err(|e| BatchError::InputValidation(format!("invalid weights: {e}")))
}

/// Runs one resume on the blocking pool under the batch timeout, converting
/// panics and timeouts into per-item errors.
async fn run_isolated(
    context: Arc<JobContext>,
    index: usize,
    resume: ResumeDocument,
    timeout: Duration,
) -> Result<MatchResult, ProcessingError> {
    let name = resume.name.clone();
    let handle = tokio::task::spawn_blocking(move || context.score(index, &resume));

    match tokio::time::timeout(timeout, handle).await {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(join_error)) => Err(ProcessingError {
            resume: name,
            submission_index: index,
            kind: ProcessingErrorKind::TaskFailed,
            message: format!("scoring task failed: {join_error}"),
        }),
        Err(_) => Err(ProcessingError {
            resume: name,
            submission_index: index,
            kind: ProcessingErrorKind::Timeout,
            message: format!("scoring exceeded {} ms", timeout.as_millis()),
        }),
    }
}

impl JobContext {
    fn score(&self, index: usize, resume: &ResumeDocument) -> Result<MatchResult, ProcessingError> {
        let text = decode_text(resume).map_err(|message| ProcessingError {
            resume: resume.name.clone(),
            submission_index: index,
            kind: ProcessingErrorKind::ExtractionFailure,
            message,
        })?;

        let candidate = extract_skills(text, &self.taxonomy);
        let comparison = compare_skills(&self.required, &candidate, &self.taxonomy);
        let skill = skill_score(comparison.matched.len(), comparison.required_count());
        let text_score = self.similarity.similarity(&self.text, text);

        Ok(MatchResult {
            resume: resume.name.clone(),
            submission_index: index,
            rank: 0,
            hybrid_score: combine(skill, text_score, &self.weights),
            skill_score: skill,
            text_score,
            matched_skills: comparison.matched,
            missing_skills: comparison.missing,
        })
    }
}

/// Turns raw resume content into scorable text.
fn decode_text(resume: &ResumeDocument) -> Result<&str, String> {
    let text = std::str::from_utf8(&resume.content).map_err(|e| {
        format!(
            "content is not UTF-8 text (invalid byte at offset {})",
            e.valid_up_to()
        )
    })?;
    if text.contains('\0') {
        return Err("content looks like a binary file, not plain text".to_string());
    }
    if text.trim().is_empty() {
        return Err("no text could be extracted from the document".to_string());
    }
    Ok(text)
}
