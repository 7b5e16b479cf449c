//! Entry point used by the orchestration layer
//!
//! [`MailRetriever`] owns a handle to an [`EmailIndex`] plus a
//! [`RetrievalConfig`]. Several retrievers may share one index handle; every
//! read takes a snapshot of the current generation first, so a concurrent
//! re-index never shows a half-built state.

use std::sync::Arc;

use serde_json::Value;

use crate::config::RetrievalConfig;
use crate::document::EmailDocument;
use crate::error::RetrievalResult;
use crate::filter::MailFilter;
use crate::grounding::GroundingContext;
use crate::index::{EmailIndex, IndexHealth, IndexStats};
use crate::query::RetrievalQuery;
use crate::ranker::{keywords_query_text, rank, sender_query_text};
use crate::results::ScoredEmail;
use crate::source::MailboxSource;
use crate::stats::{MailboxStats, compute_stats};

/// Retrieval facade over a shared [`EmailIndex`]
#[derive(Debug, Clone, Default)]
pub struct MailRetriever {
    index: Arc<EmailIndex>,
    config: RetrievalConfig,
}

impl MailRetriever {
    /// Retriever with a fresh, never-built index.
    #[must_use]
    pub fn new(config: RetrievalConfig) -> Self {
        Self::with_index(Arc::new(EmailIndex::new()), config)
    }

    /// Retriever over an existing index handle.
    #[must_use]
    pub const fn with_index(index: Arc<EmailIndex>, config: RetrievalConfig) -> Self {
        Self { index, config }
    }

    /// Shared index handle.
    #[must_use]
    pub fn index_handle(&self) -> Arc<EmailIndex> {
        Arc::clone(&self.index)
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    /// Replace the index with `emails`.
    pub fn index_emails(&self, emails: Vec<EmailDocument>) -> IndexStats {
        self.index.index(emails)
    }

    /// Rebuild from a mailbox source. On failure the current index is kept.
    pub fn reindex_from(&self, source: &dyn MailboxSource) -> RetrievalResult<IndexStats> {
        let emails = source.fetch_all().inspect_err(|e| {
            tracing::warn!(error = %e, "mailbox fetch failed; keeping current index");
        })?;
        Ok(self.index.index(emails))
    }

    /// Whether an index (possibly empty) has been published.
    #[must_use]
    pub fn is_indexed(&self) -> bool {
        self.index.is_indexed()
    }

    /// Index health snapshot.
    #[must_use]
    pub fn health(&self) -> IndexHealth {
        self.index.health()
    }

    /// Rank the current generation against `query`.
    ///
    /// Never indexed or empty index yields an empty list.
    #[must_use]
    pub fn retrieve(&self, query: &RetrievalQuery) -> Vec<ScoredEmail> {
        self.index
            .snapshot()
            .map(|generation| rank(&generation, query, &self.config))
            .unwrap_or_default()
    }

    /// Convenience form of [`retrieve`](Self::retrieve).
    #[must_use]
    pub fn retrieve_text(
        &self,
        query: &str,
        top_k: usize,
        filters: Option<&MailFilter>,
    ) -> Vec<ScoredEmail> {
        let query = RetrievalQuery::new(query)
            .with_top_k(top_k)
            .with_filters(filters.cloned().unwrap_or_default());
        self.retrieve(&query)
    }

    /// Validate an untyped request (see [`RetrievalQuery::from_json`]) and run it.
    pub fn retrieve_json(&self, request: &Value) -> RetrievalResult<Vec<ScoredEmail>> {
        let query = RetrievalQuery::from_json(request)?;
        Ok(self.retrieve(&query))
    }

    /// Emails whose sender address contains `sender`, ranked against `"from {sender}"`.
    #[must_use]
    pub fn search_by_sender(&self, sender: &str, top_k: usize) -> Vec<ScoredEmail> {
        let query = RetrievalQuery::new(sender_query_text(sender))
            .with_top_k(top_k)
            .with_filters(MailFilter::by_sender(sender));
        self.retrieve(&query)
    }

    /// Rank against the space-joined `keywords`.
    #[must_use]
    pub fn search_by_keywords<S: AsRef<str>>(
        &self,
        keywords: &[S],
        top_k: usize,
    ) -> Vec<ScoredEmail> {
        self.retrieve(&RetrievalQuery::new(keywords_query_text(keywords)).with_top_k(top_k))
    }

    fn documents_where(&self, pred: impl Fn(&EmailDocument) -> bool) -> Vec<Arc<EmailDocument>> {
        self.index
            .snapshot()
            .map(|generation| {
                generation
                    .documents()
                    .iter()
                    .filter(|doc| pred(doc))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Unread emails, in batch order.
    #[must_use]
    pub fn unread_emails(&self) -> Vec<Arc<EmailDocument>> {
        self.documents_where(EmailDocument::is_unread)
    }

    /// Starred emails, in batch order.
    #[must_use]
    pub fn starred_emails(&self) -> Vec<Arc<EmailDocument>> {
        self.documents_where(|doc| doc.flags.starred)
    }

    /// Important emails, in batch order.
    #[must_use]
    pub fn important_emails(&self) -> Vec<Arc<EmailDocument>> {
        self.documents_where(|doc| doc.flags.important)
    }

    /// Corpus-wide counts over the current generation.
    #[must_use]
    pub fn stats(&self) -> MailboxStats {
        let generation = self.index.snapshot();
        compute_stats(generation.as_deref(), self.config.top_senders)
    }

    /// Retrieve for `query` and render the hits plus stats as prompt context.
    ///
    /// Both come from the same index generation.
    #[must_use]
    pub fn grounding_context(&self, query: &RetrievalQuery) -> String {
        let Some(generation) = self.index.snapshot() else {
            return String::new();
        };
        let hits = rank(&generation, query, &self.config);
        let stats = compute_stats(Some(&*generation), self.config.top_senders);
        GroundingContext::new(&hits).with_stats(&stats).render()
    }
}
