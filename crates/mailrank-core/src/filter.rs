//! Structured predicate filters applied to retrieval candidates
//!
//! [`MailFilter`] predicates are ANDed; an absent predicate (or an empty
//! sender/folder string) places no constraint. Evaluation stops at the first
//! failing predicate.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::EmailDocument;
use crate::error::{RetrievalError, RetrievalResult};

/// Structured filters applied to retrieval candidates
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MailFilter {
    /// Case-insensitive substring of the sender address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    /// Required starred flag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starred: Option<bool>,
    /// Unread selector.
    ///
    /// A document is dropped when its `read` flag *equals* this value, so
    /// `unread: true` keeps unread mail and `unread: false` keeps read mail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unread: Option<bool>,
    /// Required important flag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub important: Option<bool>,
    /// Exact folder name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
}

impl MailFilter {
    /// Filter on a sender address substring.
    #[must_use]
    pub fn by_sender(sender: impl Into<String>) -> Self {
        Self {
            sender: Some(sender.into()),
            ..Self::default()
        }
    }

    /// Set the starred predicate
    #[must_use]
    pub const fn with_starred(mut self, starred: bool) -> Self {
        self.starred = Some(starred);
        self
    }

    /// Set the unread predicate
    #[must_use]
    pub const fn with_unread(mut self, unread: bool) -> Self {
        self.unread = Some(unread);
        self
    }

    /// Set the important predicate
    #[must_use]
    pub const fn with_important(mut self, important: bool) -> Self {
        self.important = Some(important);
        self
    }

    /// Set the folder predicate
    #[must_use]
    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = Some(folder.into());
        self
    }

    /// Parse filters from an untyped JSON value.
    ///
    /// `null` means no filters. Unknown keys are ignored; a known key with
    /// the wrong type is an [`RetrievalError::InvalidArgument`].
    pub fn from_json(value: &Value) -> RetrievalResult<Self> {
        if value.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(value.clone())
            .map_err(|e| RetrievalError::invalid(format!("malformed filters: {e}")))
    }

    fn sender_predicate(&self) -> Option<&str> {
        self.sender.as_deref().filter(|s| !s.is_empty())
    }

    fn folder_predicate(&self) -> Option<&str> {
        self.folder.as_deref().filter(|s| !s.is_empty())
    }

    /// Number of predicates that constrain results.
    #[must_use]
    pub fn active_count(&self) -> usize {
        [
            self.sender_predicate().is_some(),
            self.starred.is_some(),
            self.unread.is_some(),
            self.important.is_some(),
            self.folder_predicate().is_some(),
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }

    /// Whether no predicate constrains results.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }

    /// Whether `doc` satisfies every present predicate.
    #[must_use]
    pub fn matches(&self, doc: &EmailDocument) -> bool {
        if let Some(sender) = self.sender_predicate() {
            if !doc
                .sender
                .to_lowercase()
                .contains(sender.to_lowercase().as_str())
            {
                return false;
            }
        }

        if let Some(starred) = self.starred {
            if doc.flags.starred != starred {
                return false;
            }
        }

        // Inverted on purpose: `unread` is compared against `read`.
        if let Some(unread) = self.unread {
            if doc.flags.read == unread {
                return false;
            }
        }

        if let Some(important) = self.important {
            if doc.flags.important != important {
                return false;
            }
        }

        // Compared against the stored folder; the "inbox" default is display-only.
        if let Some(folder) = self.folder_predicate() {
            if doc.folder.as_deref() != Some(folder) {
                return false;
            }
        }

        true
    }
}
