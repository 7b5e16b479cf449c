//! Query-time ranking over one index generation
//!
//! For every entry, in index-iteration order: filters first (failing
//! documents are dropped, not scored zero), then cosine similarity against
//! the query vector, then the keyword boost. Results are sorted by score
//! with a stable sort, so equal scores keep index order, and truncated to
//! `top_k`.

use crate::config::RetrievalConfig;
use crate::index::IndexGeneration;
use crate::query::RetrievalQuery;
use crate::results::ScoredEmail;
use crate::similarity::{KeywordMatcher, TermVector, boosted_score, cosine_similarity};

/// Rank `generation` against `query`.
#[must_use]
pub fn rank(
    generation: &IndexGeneration,
    query: &RetrievalQuery,
    config: &RetrievalConfig,
) -> Vec<ScoredEmail> {
    if query.top_k == 0 || generation.is_empty() {
        return Vec::new();
    }

    let query_vector = TermVector::from_text(&query.raw_query);
    let keywords = KeywordMatcher::new(&query.raw_query);

    let mut hits: Vec<ScoredEmail> = generation
        .entries()
        .enumerate()
        .filter(|(_, entry)| query.filters.matches(&entry.document))
        .map(|(position, entry)| {
            let cosine = cosine_similarity(&query_vector, &entry.term_vector);
            let boosted = keywords.matches(&entry.searchable_text);
            ScoredEmail {
                document: std::sync::Arc::clone(&entry.document),
                score: boosted_score(cosine, boosted, config.keyword_boost),
                cosine,
                boosted,
                position,
            }
        })
        .collect();

    let candidates = hits.len();
    // `sort_by` is stable: ties keep index-iteration order.
    hits.sort_by(|a, b| b.score.total_cmp(&a.score));
    hits.truncate(query.top_k);

    tracing::debug!(
        epoch = generation.epoch(),
        query = %query.raw_query,
        filters = query.filters.active_count(),
        candidates,
        returned = hits.len(),
        "ranked retrieval"
    );
    hits
}

/// Query string used by the by-sender search.
#[must_use]
pub fn sender_query_text(sender: &str) -> String {
    format!("from {sender}")
}

/// Query string used by the by-keywords search.
#[must_use]
pub fn keywords_query_text<S: AsRef<str>>(keywords: &[S]) -> String {
    keywords
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" ")
}
