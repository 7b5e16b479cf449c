//! Term-vector index over an email batch
//!
//! Every call to [`EmailIndex::index`] builds a complete [`IndexGeneration`]
//! off to the side and then publishes it with a single pointer swap. Readers
//! take a snapshot (`Arc` clone) and never observe a partially built index.
//! There is no incremental update path: callers re-index after any change to
//! the underlying mailbox.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Instant;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::document::{EmailDocument, EmailId};
use crate::similarity::TermVector;

/// Synthetic tokens appended for starred mail.
pub const STARRED_TAGS: &str = "starred important";
/// Synthetic tokens appended for important mail.
pub const IMPORTANT_TAGS: &str = "important priority";
/// Synthetic tokens appended for unread mail.
pub const UNREAD_TAGS: &str = "unread new";

/// Build the lowercase searchable text for `doc`.
///
/// Layout: sender, subject, body, date, flag tags, folder, joined by single
/// spaces.
#[must_use]
pub fn searchable_text(doc: &EmailDocument) -> String {
    let mut parts = vec![
        format!("from: {} {}", doc.sender_name(), doc.sender),
        format!("subject: {}", doc.subject),
        format!("body: {}", doc.body),
        format!("date: {}", doc.timestamp),
    ];
    if doc.flags.starred {
        parts.push(STARRED_TAGS.to_owned());
    }
    if doc.flags.important {
        parts.push(IMPORTANT_TAGS.to_owned());
    }
    if doc.is_unread() {
        parts.push(UNREAD_TAGS.to_owned());
    }
    parts.push(format!("folder: {}", doc.folder()));
    parts.join(" ").to_lowercase()
}

/// Derived, searchable representation of one email
#[derive(Debug, Clone)]
pub struct IndexEntry {
    /// ID of the owning document
    pub document_id: EmailId,
    /// Lowercase text the term vector was built from
    pub searchable_text: String,
    /// Term frequencies of `searchable_text`
    pub term_vector: TermVector,
    /// The owning document, retained in full
    pub document: Arc<EmailDocument>,
}

impl IndexEntry {
    /// Derive the entry for `document`.
    #[must_use]
    pub fn build(document: Arc<EmailDocument>) -> Self {
        let searchable_text = searchable_text(&document);
        let term_vector = TermVector::from_text(&searchable_text);
        Self {
            document_id: document.id.clone(),
            searchable_text,
            term_vector,
            document,
        }
    }
}

/// One complete, immutable published state of the index
#[derive(Debug, Default)]
pub struct IndexGeneration {
    epoch: u64,
    entries: IndexMap<EmailId, IndexEntry>,
    documents: Vec<Arc<EmailDocument>>,
}

impl IndexGeneration {
    /// Build a generation from a batch.
    ///
    /// Entries keep first-seen order. A repeated id replaces the earlier
    /// entry's content in place; the batch itself is kept verbatim.
    #[must_use]
    pub fn build(epoch: u64, batch: Vec<EmailDocument>) -> Self {
        let documents: Vec<Arc<EmailDocument>> = batch.into_iter().map(Arc::new).collect();
        let mut entries = IndexMap::with_capacity(documents.len());
        for doc in &documents {
            let entry = IndexEntry::build(Arc::clone(doc));
            entries.insert(entry.document_id.clone(), entry);
        }
        Self {
            epoch,
            entries,
            documents,
        }
    }

    /// Generation number (1 for the first published index).
    #[must_use]
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Entries in index-iteration order.
    pub fn entries(&self) -> impl ExactSizeIterator<Item = &IndexEntry> {
        self.entries.values()
    }

    /// Look up the entry for a document id.
    #[must_use]
    pub fn entry(&self, id: &str) -> Option<&IndexEntry> {
        self.entries.get(id)
    }

    /// The batch exactly as indexed (duplicates included).
    #[must_use]
    pub fn documents(&self) -> &[Arc<EmailDocument>] {
        &self.documents
    }

    /// Number of distinct document ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the generation holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Statistics returned after an index rebuild
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    /// Documents in the batch
    pub docs_received: usize,
    /// Distinct entries after id de-duplication
    pub docs_indexed: usize,
    /// Epoch of the generation that was published
    pub epoch: u64,
    /// Wall-clock time for the rebuild
    pub elapsed_ms: u64,
}

/// Health snapshot of an [`EmailIndex`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexHealth {
    /// Whether an index has been published (possibly empty)
    pub indexed: bool,
    /// Number of indexed entries
    pub doc_count: usize,
    /// Epoch of the current generation (0 when never indexed)
    pub epoch: u64,
}

/// Shared handle to the current index generation.
///
/// `EMPTY` (never indexed) until the first [`index`](Self::index) call, then
/// `READY` forever; each call replaces the whole generation.
#[derive(Debug, Default)]
pub struct EmailIndex {
    current: RwLock<Option<Arc<IndexGeneration>>>,
    next_epoch: AtomicU64,
}

impl EmailIndex {
    /// Create an index that has never been built.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from `batch` and publish the result atomically.
    pub fn index(&self, batch: Vec<EmailDocument>) -> IndexStats {
        let started = Instant::now();
        let docs_received = batch.len();
        let epoch = self.next_epoch.fetch_add(1, Ordering::Relaxed) + 1;
        let generation = Arc::new(IndexGeneration::build(epoch, batch));
        let docs_indexed = generation.len();

        self.publish(generation);

        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        tracing::info!(
            docs_received,
            docs_indexed,
            epoch,
            elapsed_ms,
            "email index published"
        );
        IndexStats {
            docs_received,
            docs_indexed,
            epoch,
            elapsed_ms,
        }
    }

    fn publish(&self, generation: Arc<IndexGeneration>) {
        let mut slot = self
            .current
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        // Concurrent rebuilds may finish out of order; never go backwards.
        let stale = slot
            .as_ref()
            .is_some_and(|current| current.epoch() > generation.epoch());
        if stale {
            tracing::debug!(
                epoch = generation.epoch(),
                "discarding superseded index generation"
            );
            return;
        }
        *slot = Some(generation);
    }

    /// The current generation, or `None` if never indexed.
    #[must_use]
    pub fn snapshot(&self) -> Option<Arc<IndexGeneration>> {
        self.current
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Whether an index (possibly empty) has been published.
    #[must_use]
    pub fn is_indexed(&self) -> bool {
        self.snapshot().is_some()
    }

    /// Number of entries in the current generation.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshot().map_or(0, |g| g.len())
    }

    /// Whether the current generation is empty or absent.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Health snapshot.
    #[must_use]
    pub fn health(&self) -> IndexHealth {
        self.snapshot().map_or(
            IndexHealth {
                indexed: false,
                doc_count: 0,
                epoch: 0,
            },
            |g| IndexHealth {
                indexed: true,
                doc_count: g.len(),
                epoch: g.epoch(),
            },
        )
    }
}
