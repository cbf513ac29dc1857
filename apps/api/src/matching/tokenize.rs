//! Text normalization shared by skill extraction and text similarity.
//!
//! Both the taxonomy phrases and the documents go through [`tokenize`], so a
//! phrase like `Node.js` and the text `node js` always agree on their tokens.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// Letters and digits, optionally followed by the suffixes that carry meaning in
/// skill names (`c++`, `c#`). A `+` or `#` inside a word splits it: `python+sql`.
static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\p{L}\p{N}]+[+#]*").expect("token regex is valid"));

static STOP_WORDS: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| STOP_WORD_LIST.iter().copied().collect());

const STOP_WORD_LIST: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "etc",
    "few", "for", "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers",
    "him", "his", "how", "i", "if", "in", "into", "is", "it", "its", "itself", "just", "may",
    "me", "more", "most", "must", "my", "need", "no", "nor", "not", "of", "off", "on", "once",
    "only", "or", "other", "our", "ours", "out", "over", "own", "per", "same", "she", "should",
    "so", "some", "such", "than", "that", "the", "their", "theirs", "them", "then", "there",
    "these", "they", "this", "those", "through", "to", "too", "under", "until", "up", "us",
    "very", "was", "we", "were", "what", "when", "where", "which", "while", "who", "whom", "why",
    "will", "with", "within", "would", "you", "your", "yours",
];

/// Lower-cases `text` and splits it into tokens.
///
/// Anything that is not a letter or digit separates tokens, so `CI/CD` becomes
/// `["ci", "cd"]` and `scikit-learn` becomes `["scikit", "learn"]`. Trailing
/// `+`/`#` stay attached to the word before them.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN_RE
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Tokens used for lexical similarity: stop words removed.
pub fn content_terms(text: &str) -> Vec<String> {
    tokenize(text)
        .into_iter()
        .filter(|t| !is_stop_word(t))
        .collect()
}

pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(token)
}
