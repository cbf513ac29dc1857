use std::cmp::Ordering;

use crate::matching::models::MatchResult;

/// Orders results and assigns contiguous 1-based ranks.
///
/// Order: hybrid score desc → skill score desc → submission index asc.
/// Ties on every key are impossible because submission indices are unique,
/// so the output depends only on the inputs, never on their arrival order.
pub fn rank(mut results: Vec<MatchResult>) -> Vec<MatchResult> {
    results.sort_by(compare);
    for (position, result) in results.iter_mut().enumerate() {
        result.rank = position + 1;
    }
    results
}

fn compare(a: &MatchResult, b: &MatchResult) -> Ordering {
    b.hybrid_score
        .cmp(&a.hybrid_score)
        .then_with(|| b.skill_score.total_cmp(&a.skill_score))
        .then_with(|| a.submission_index.cmp(&b.submission_index))
}
