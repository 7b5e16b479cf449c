//! Sparse term-frequency vectors, cosine similarity, and the keyword boost
//!
//! The "embedding" used for ranking is a bag of words: each term maps to its
//! occurrence count. Frequencies are integers, so dot products and squared
//! norms are accumulated exactly in `u64` and the final score does not depend
//! on hash-map iteration order.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::tokenizer::tokenize;

/// Sparse term → frequency vector
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermVector {
    terms: HashMap<String, u32>,
}

impl TermVector {
    /// Count tokens of `text` (see [`tokenize`]).
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        tokenize(text).collect()
    }

    /// Frequency of `term`, 0 when absent.
    #[must_use]
    pub fn get(&self, term: &str) -> u32 {
        self.terms.get(term).copied().unwrap_or(0)
    }

    /// Number of distinct terms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether the vector has no terms.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Iterate `(term, frequency)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.terms.iter().map(|(t, f)| (t.as_str(), *f))
    }

    /// Sum of products of matching frequencies.
    #[must_use]
    pub fn dot(&self, other: &Self) -> u64 {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        small
            .terms
            .iter()
            .map(|(term, &freq)| u64::from(freq) * u64::from(large.get(term)))
            .sum()
    }

    /// Sum of squared frequencies.
    #[must_use]
    pub fn squared_norm(&self) -> u64 {
        self.terms
            .values()
            .map(|&f| u64::from(f) * u64::from(f))
            .sum()
    }

    /// Euclidean length.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn magnitude(&self) -> f64 {
        (self.squared_norm() as f64).sqrt()
    }
}

impl FromIterator<String> for TermVector {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut terms: HashMap<String, u32> = HashMap::new();
        for token in iter {
            *terms.entry(token).or_insert(0) += 1;
        }
        Self { terms }
    }
}

/// Cosine similarity of two term vectors, in `[0, 1]`.
///
/// Returns 0.0 when either vector is empty.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn cosine_similarity(query: &TermVector, doc: &TermVector) -> f64 {
    if query.is_empty() || doc.is_empty() {
        return 0.0;
    }
    // Non-empty vectors only hold frequencies >= 1, so both magnitudes are >= 1.
    (query.dot(doc) as f64 / (query.magnitude() * doc.magnitude())).min(1.0)
}

/// Minimum number of unique query tokens that must occur in a document for
/// the keyword boost to apply: half the tokens rounded down, at least one.
#[must_use]
pub const fn required_keyword_matches(unique_tokens: usize) -> usize {
    let half = unique_tokens / 2;
    if half == 0 { 1 } else { half }
}

/// Query-side data for the keyword-overlap check, built once per query.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    query_lower: String,
    unique_tokens: HashSet<String>,
    required: usize,
}

impl KeywordMatcher {
    /// Lowercase and tokenize `query` once.
    #[must_use]
    pub fn new(query: &str) -> Self {
        let query_lower = query.to_lowercase();
        let unique_tokens: HashSet<String> = tokenize(&query_lower).collect();
        let required = required_keyword_matches(unique_tokens.len());
        Self {
            query_lower,
            unique_tokens,
            required,
        }
    }

    /// Whether `doc_text` overlaps the query enough to earn the boost.
    ///
    /// `doc_text` is expected to be lowercase already (an index entry's
    /// searchable text). True when the lowercased query occurs verbatim, or
    /// when enough unique query tokens occur as substrings.
    #[must_use]
    pub fn matches(&self, doc_text: &str) -> bool {
        if doc_text.contains(self.query_lower.as_str()) {
            return true;
        }
        self.unique_tokens
            .iter()
            .filter(|token| doc_text.contains(token.as_str()))
            .count()
            >= self.required
    }
}

/// One-off form of [`KeywordMatcher::matches`].
#[must_use]
pub fn has_keyword_overlap(query: &str, doc_text: &str) -> bool {
    KeywordMatcher::new(query).matches(doc_text)
}

/// Apply the keyword boost to a raw cosine score.
#[must_use]
pub fn boosted_score(cosine: f64, overlap: bool, boost: f64) -> f64 {
    if overlap { cosine * boost } else { cosine }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector(text: &str) -> TermVector {
        TermVector::from_text(text)
    }

    #[test]
    fn counts_term_frequencies() {
        let v = vector("lunch team lunch on friday");
        assert_eq!(v.get("lunch"), 2);
        assert_eq!(v.get("team"), 1);
        assert_eq!(v.get("on"), 0);
        assert_eq!(v.len(), 3);
        assert_eq!(v.squared_norm(), 4 + 1 + 1);
    }

    #[test]
    fn cosine_identical_is_one() {
        let v = vector("invoice overdue please pay now");
        let score = cosine_similarity(&v, &v);
        assert!((score - 1.0).abs() < 1e-12);
        assert!(score <= 1.0);
    }

    #[test]
    fn cosine_disjoint_is_zero() {
        assert!(cosine_similarity(&vector("invoice overdue"), &vector("team lunch")).abs() < f64::EPSILON);
    }

    #[test]
    fn cosine_empty_is_zero() {
        let empty = TermVector::default();
        let v = vector("something here");
        assert!(cosine_similarity(&empty, &v).abs() < f64::EPSILON);
        assert!(cosine_similarity(&v, &empty).abs() < f64::EPSILON);
        assert!(cosine_similarity(&empty, &empty).abs() < f64::EPSILON);
    }

    #[test]
    fn cosine_known_value() {
        // q = {invoice:1}, d = {invoice:1, overdue:1} -> 1 / (1 * sqrt 2)
        let score = cosine_similarity(&vector("invoice"), &vector("invoice overdue"));
        assert!((score - 1.0 / 2f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn cosine_is_symmetric() {
        let a = vector("project update week plan review");
        let b = vector("please review the project plan plan");
        assert_eq!(
            cosine_similarity(&a, &b).to_bits(),
            cosine_similarity(&b, &a).to_bits()
        );
    }

    #[test]
    fn required_matches_rounds_down_with_floor_of_one() {
        assert_eq!(required_keyword_matches(0), 1);
        assert_eq!(required_keyword_matches(1), 1);
        assert_eq!(required_keyword_matches(2), 1);
        assert_eq!(required_keyword_matches(3), 1);
        assert_eq!(required_keyword_matches(4), 2);
        assert_eq!(required_keyword_matches(5), 2);
    }

    #[test]
    fn overlap_on_verbatim_phrase() {
        assert!(has_keyword_overlap("Invoice Overdue", "subject: invoice overdue body"));
    }

    #[test]
    fn overlap_on_token_substrings() {
        let doc = "subject: budget approval request";
        // 2 unique tokens, 1 required
        assert!(has_keyword_overlap("approval deadline", doc));
        // 4 unique tokens, 2 required, only 1 present
        assert!(!has_keyword_overlap("approval deadline tomorrow morning", doc));
        // substring, not whole-word, matching
        assert!(has_keyword_overlap("approv", doc));
    }

    #[test]
    fn no_overlap_when_nothing_matches() {
        assert!(!has_keyword_overlap("pizza", "subject: invoice overdue"));
    }

    #[test]
    fn short_only_query_needs_verbatim_match() {
        assert!(!has_keyword_overlap("hi yo", "subject: invoice"));
        assert!(has_keyword_overlap("in", "subject: invoice"));
    }

    #[test]
    fn matcher_is_reusable_across_documents() {
        let matcher = KeywordMatcher::new("Budget DEADLINE");
        let docs = [
            "subject: budget approval request",
            "subject: team lunch",
            "body: the deadline is friday",
            "subject: budget deadline",
        ];
        let hits: Vec<bool> = docs.iter().map(|d| matcher.matches(d)).collect();
        assert_eq!(hits, vec![true, false, true, true]);
        for doc in docs {
            assert_eq!(matcher.matches(doc), has_keyword_overlap("Budget DEADLINE", doc));
        }
    }

    #[test]
    fn boost_multiplies_only_on_overlap() {
        assert!((boosted_score(0.5, true, 1.5) - 0.75).abs() < 1e-12);
        assert!((boosted_score(0.5, false, 1.5) - 0.5).abs() < 1e-12);
    }
}
