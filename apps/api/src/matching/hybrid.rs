use serde::{Deserialize, Serialize};
use thiserror::Error;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Error, PartialEq)]
pub enum WeightsError {
    #[error("weights must be finite numbers")]
    NotFinite,

    #[error("weights must not be negative")]
    Negative,

    #[error("skill_weight + text_weight must equal 1 (got {sum})")]
    BadSum { sum: f64 },
}

/// Relative importance of skill coverage vs. text similarity in the hybrid score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub skill_weight: f64,
    pub text_weight: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            skill_weight: 0.5,
            text_weight: 0.5,
        }
    }
}

impl ScoringWeights {
    pub fn new(skill_weight: f64, text_weight: f64) -> Result<Self, WeightsError> {
        let weights = Self {
            skill_weight,
            text_weight,
        };
        weights.validate()?;
        Ok(weights)
    }

    pub fn validate(&self) -> Result<(), WeightsError> {
        if !self.skill_weight.is_finite() || !self.text_weight.is_finite() {
            return Err(WeightsError::NotFinite);
        }
        if self.skill_weight < 0.0 || self.text_weight < 0.0 {
            return Err(WeightsError::Negative);
        }
        let sum = self.skill_weight + self.text_weight;
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(WeightsError::BadSum { sum });
        }
        Ok(())
    }
}

/// Percentage of required skills the candidate covers. No required skills → 0.
pub fn skill_score(matched: usize, required: usize) -> f64 {
    if required == 0 {
        return 0.0;
    }
    (100.0 * matched as f64 / required as f64).clamp(0.0, 100.0)
}

/// Weighted sum of the two terms, rounded half up and clamped to [0, 100].
pub fn combine(skill_score: f64, text_score: f64, weights: &ScoringWeights) -> u32 {
    let raw = weights.skill_weight * skill_score + weights.text_weight * text_score;
    if !raw.is_finite() {
        return 0;
    }
    (raw + 0.5).floor().clamp(0.0, 100.0) as u32
}
