use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::matching::hybrid::ScoringWeights;

/// The query document every resume is ranked against.
#[derive(Debug, Clone)]
pub struct JobDescription {
    pub text: String,
}

impl JobDescription {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// A candidate document as received from the document source.
///
/// Content is kept as raw bytes so an upload that is not text can still be
/// reported against its name instead of being rejected at the transport layer.
#[derive(Debug, Clone)]
pub struct ResumeDocument {
    pub name: String,
    pub content: Bytes,
}

impl ResumeDocument {
    pub fn new(name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    pub fn from_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(name, Bytes::from(text.into()))
    }
}

/// Score card for one resume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub resume: String,
    /// 0-based position of the resume in the submitted batch.
    pub submission_index: usize,
    /// 1-based position in the ranked list. Zero until the ranker assigns it.
    pub rank: usize,
    pub hybrid_score: u32,
    pub skill_score: f64,
    pub text_score: f64,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingErrorKind {
    /// Content could not be turned into usable text.
    ExtractionFailure,
    /// Scoring did not finish within the per-resume budget.
    Timeout,
    /// The scoring task aborted unexpectedly.
    TaskFailed,
}

/// A resume that was excluded from the ranking, and why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingError {
    pub resume: String,
    pub submission_index: usize,
    pub kind: ProcessingErrorKind,
    pub message: String,
}

/// Everything a batch produces. Serialized as-is by the HTTP layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub batch_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub weights: ScoringWeights,
    pub similarity: String,
    pub required_skills: Vec<String>,
    pub ranked: Vec<MatchResult>,
    pub errors: Vec<ProcessingError>,
}
