//! Abstract mailbox sources
//!
//! The orchestration layer owns persistence of the source emails. It hands
//! batches to the index through [`MailboxSource`] so the retrieval core does
//! not depend on any storage crate.

use std::path::PathBuf;

use crate::document::{EmailDocument, load_mailbox};
use crate::error::RetrievalResult;

/// Something that can produce the full current mailbox for a rebuild.
pub trait MailboxSource: Send + Sync {
    /// Fetch every email. Called once per full rebuild.
    ///
    /// # Errors
    /// Returns `RetrievalError` on data access failures.
    fn fetch_all(&self) -> RetrievalResult<Vec<EmailDocument>>;
}

impl MailboxSource for Vec<EmailDocument> {
    fn fetch_all(&self) -> RetrievalResult<Vec<EmailDocument>> {
        Ok(self.clone())
    }
}

/// Mailbox exported as a JSON array file
#[derive(Debug, Clone)]
pub struct JsonMailbox {
    path: PathBuf,
}

impl JsonMailbox {
    /// Source backed by the JSON file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl MailboxSource for JsonMailbox {
    fn fetch_all(&self) -> RetrievalResult<Vec<EmailDocument>> {
        load_mailbox(&self.path)
    }
}
