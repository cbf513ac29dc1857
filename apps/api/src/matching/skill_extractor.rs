//! Skill extraction: raw text → set of canonical taxonomy skills.
//!
//! Algorithm (longest match wins over tokens):
//! 1. Tokenize the text with the same rules used to index taxonomy phrases.
//! 2. Collect every phrase hit as a token span.
//! 3. Accept spans longest first (earlier start breaks ties), skipping any span
//!    that overlaps tokens already claimed, so `sql server` is never also
//!    reported as `sql`.

use std::collections::BTreeSet;

use crate::matching::taxonomy::Taxonomy;
use crate::matching::tokenize::tokenize;

/// Canonical skills found in a document, held as taxonomy indices so that
/// iteration is always in taxonomy order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillSet {
    indices: BTreeSet<usize>,
}

impl SkillSet {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    pub fn names(&self, taxonomy: &Taxonomy) -> Vec<String> {
        self.indices
            .iter()
            .map(|&i| taxonomy.canonical(i).to_string())
            .collect()
    }
}

/// Required skills split by whether a candidate has them.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillComparison {
    pub matched: Vec<String>,
    pub missing: Vec<String>,
}

impl SkillComparison {
    pub fn required_count(&self) -> usize {
        self.matched.len() + self.missing.len()
    }
}

pub fn extract_skills(text: &str, taxonomy: &Taxonomy) -> SkillSet {
    let tokens = tokenize(text);
    let max_len = taxonomy.max_phrase_tokens();

    // (start, token count, taxonomy index)
    let mut hits: Vec<(usize, usize, usize)> = Vec::new();
    for start in 0..tokens.len() {
        let longest = max_len.min(tokens.len() - start);
        for len in 1..=longest {
            if let Some(idx) = taxonomy.lookup(&tokens[start..start + len]) {
                hits.push((start, len, idx));
            }
        }
    }
    hits.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    let mut claimed = vec![false; tokens.len()];
    let mut indices = BTreeSet::new();
    for (start, len, idx) in hits {
        let span = &mut claimed[start..start + len];
        if span.iter().any(|&taken| taken) {
            continue;
        }
        span.fill(true);
        indices.insert(idx);
    }

    SkillSet { indices }
}

/// Partitions `required` into matched and missing, both in taxonomy order.
pub fn compare_skills(
    required: &SkillSet,
    candidate: &SkillSet,
    taxonomy: &Taxonomy,
) -> SkillComparison {
    let (matched, missing): (Vec<usize>, Vec<usize>) = required
        .indices
        .iter()
        .copied()
        .partition(|&idx| candidate.contains(idx));

    SkillComparison {
        matched: matched
            .into_iter()
            .map(|i| taxonomy.canonical(i).to_string())
            .collect(),
        missing: missing
            .into_iter()
            .map(|i| taxonomy.canonical(i).to_string())
            .collect(),
    }
}
