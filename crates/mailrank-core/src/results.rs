//! Ranked retrieval output

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::document::EmailDocument;

/// One ranked email
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredEmail {
    /// The full document as it was indexed
    pub document: Arc<EmailDocument>,
    /// Relevance score: cosine similarity, times the keyword boost when it applied
    pub score: f64,
    /// Raw cosine similarity before the boost, in `[0, 1]`
    pub cosine: f64,
    /// Whether the keyword boost was applied
    pub boosted: bool,
    /// Position of the document in index-iteration order (tie-break key)
    pub position: usize,
}

impl ScoredEmail {
    /// ID of the ranked document.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.document.id
    }
}
