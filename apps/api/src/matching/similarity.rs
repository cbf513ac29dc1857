//! Lexical text similarity: pluggable, trait-based scorers comparing a resume to a JD.
//!
//! Default: `CosineSimilarity` (bag-of-words cosine over stop-word-filtered terms).
//! Alternative: `JaccardSimilarity` (term-set overlap).
//!
//! `AppState` holds an `Arc<dyn TextSimilarity>`, chosen at startup via `SIMILARITY_METRIC`.

use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::matching::tokenize::content_terms;

/// Implement this to swap the text term of the hybrid score without touching
/// the orchestrator or handlers. Scores are percentages in [0, 100].
pub trait TextSimilarity: Send + Sync {
    fn name(&self) -> &'static str;

    fn similarity(&self, a: &str, b: &str) -> f64;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityMetric {
    #[default]
    Cosine,
    Jaccard,
}

impl SimilarityMetric {
    pub fn scorer(self) -> Arc<dyn TextSimilarity> {
        match self {
            SimilarityMetric::Cosine => Arc::new(CosineSimilarity),
            SimilarityMetric::Jaccard => Arc::new(JaccardSimilarity),
        }
    }
}

impl FromStr for SimilarityMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cosine" => Ok(SimilarityMetric::Cosine),
            "jaccard" => Ok(SimilarityMetric::Jaccard),
            other => Err(format!(
                "unknown similarity metric '{other}' (expected 'cosine' or 'jaccard')"
            )),
        }
    }
}

/// Bag-of-words cosine similarity on raw term counts.
pub struct CosineSimilarity;

impl TextSimilarity for CosineSimilarity {
    fn name(&self) -> &'static str {
        "cosine"
    }

    fn similarity(&self, a: &str, b: &str) -> f64 {
        let bag_a = term_counts(a);
        let bag_b = term_counts(b);
        if bag_a.is_empty() || bag_b.is_empty() {
            return 0.0;
        }

        // Integer accumulation keeps the result independent of iteration order.
        let dot: u64 = bag_a
            .iter()
            .filter_map(|(term, &ca)| bag_b.get(term).map(|&cb| ca * cb))
            .sum();
        let norm_a: u64 = bag_a.values().map(|c| c * c).sum();
        let norm_b: u64 = bag_b.values().map(|c| c * c).sum();

        let cosine = dot as f64 / ((norm_a as f64).sqrt() * (norm_b as f64).sqrt());
        to_percentage(cosine)
    }
}

/// Share of distinct terms the two texts have in common.
pub struct JaccardSimilarity;

impl TextSimilarity for JaccardSimilarity {
    fn name(&self) -> &'static str {
        "jaccard"
    }

    fn similarity(&self, a: &str, b: &str) -> f64 {
        let set_a: BTreeSet<String> = content_terms(a).into_iter().collect();
        let set_b: BTreeSet<String> = content_terms(b).into_iter().collect();
        if set_a.is_empty() || set_b.is_empty() {
            return 0.0;
        }

        let shared = set_a.intersection(&set_b).count();
        let union = set_a.union(&set_b).count();
        to_percentage(shared as f64 / union as f64)
    }
}

fn term_counts(text: &str) -> BTreeMap<String, u64> {
    let mut counts = BTreeMap::new();
    for term in content_terms(text) {
        *counts.entry(term).or_insert(0) += 1;
    }
    counts
}

fn to_percentage(ratio: f64) -> f64 {
    if ratio.is_finite() {
        (ratio * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_identical_texts_is_100() {
        let score = CosineSimilarity.similarity("Python SQL Docker", "docker, sql, python");
        assert!((score - 100.0).abs() < 1e-9, "Score was {score}");
    }

    #[test]
    fn test_cosine_disjoint_texts_is_0() {
        assert_eq!(CosineSimilarity.similarity("Python SQL", "Painting sculpture"), 0.0);
    }

    #[test]
    fn test_cosine_partial_overlap() {
        // {python:1, sql:1} vs {python:1, docker:1} → 1 / (√2·√2) = 0.5
        let score = CosineSimilarity.similarity("python sql", "python docker");
        assert!((score - 50.0).abs() < 1e-9, "Score was {score}");
    }

    #[test]
    fn test_stop_words_do_not_count_as_overlap() {
        assert_eq!(
            CosineSimilarity.similarity("the and of with", "the and of with python"),
            0.0
        );
    }

    #[test]
    fn test_empty_inputs_score_zero() {
        assert_eq!(CosineSimilarity.similarity("", ""), 0.0);
        assert_eq!(CosineSimilarity.similarity("python", ""), 0.0);
        assert_eq!(JaccardSimilarity.similarity("", ""), 0.0);
        assert_eq!(JaccardSimilarity.similarity("", "python"), 0.0);
    }

    #[test]
    fn test_jaccard_partial_overlap() {
        // {python, sql} vs {python, docker} → 1 / 3
        let score = JaccardSimilarity.similarity("python sql", "python docker");
        assert!((score - 100.0 / 3.0).abs() < 1e-9, "Score was {score}");
    }

    #[test]
    fn test_scores_bounded_0_to_100() {
        let texts = [
            "",
            "python",
            "Python python PYTHON sql",
            "We need Python and SQL experience",
            "Skilled in Python and Docker",
        ];
        for scorer in [SimilarityMetric::Cosine.scorer(), SimilarityMetric::Jaccard.scorer()] {
            for a in texts {
                for b in texts {
                    let s = scorer.similarity(a, b);
                    assert!(s.is_finite() && (0.0..=100.0).contains(&s), "{} gave {s}", scorer.name());
                }
            }
        }
    }

    #[test]
    fn test_metric_parses_case_insensitively() {
        assert_eq!("Cosine".parse::<SimilarityMetric>().unwrap(), SimilarityMetric::Cosine);
        assert_eq!(" jaccard ".parse::<SimilarityMetric>().unwrap(), SimilarityMetric::Jaccard);
        assert!("tfidf".parse::<SimilarityMetric>().is_err());
    }

    #[test]
    fn test_scorer_name_matches_metric() {
        assert_eq!(SimilarityMetric::Cosine.scorer().name(), "cosine");
        assert_eq!(SimilarityMetric::Jaccard.scorer().name(), "jaccard");
    }
}
