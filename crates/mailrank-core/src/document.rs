//! Email document model
//!
//! An [`EmailDocument`] is the unit of indexing. Every field has a documented
//! default so that records coming from loosely-typed sources (JSON exports,
//! hand-written fixtures) never fail an indexing batch:
//!
//! | field         | default                                   |
//! |---------------|-------------------------------------------|
//! | `id`          | `""` (numeric ids are stringified)        |
//! | `sender`      | `""`                                      |
//! | `sender_name` | absent                                    |
//! | `subject`     | `""`                                      |
//! | `body`        | `""`                                      |
//! | `timestamp`   | `""`                                      |
//! | flags         | `starred = important = read = false`      |
//! | `folder`      | absent, read back as [`DEFAULT_FOLDER`]   |
//! | `thread_id`   | absent                                    |

use std::path::Path;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{RetrievalError, RetrievalResult};

/// Folder reported for documents that do not name one.
pub const DEFAULT_FOLDER: &str = "inbox";

/// Sender label used by stats when a document has neither a display name nor an address.
pub const UNKNOWN_SENDER: &str = "Unknown";

/// Unique identifier of an email within a batch
pub type EmailId = String;

/// Boolean mailbox flags carried by every email
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MailFlags {
    /// User starred the message
    #[serde(default)]
    pub starred: bool,
    /// Message is marked important
    #[serde(default)]
    pub important: bool,
    /// Message has been read
    #[serde(default)]
    pub read: bool,
}

/// A single email as supplied by the orchestration layer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailDocument {
    /// Unique ID within the batch
    #[serde(default)]
    pub id: EmailId,
    /// Sender address
    #[serde(default)]
    pub sender: String,
    /// Sender display name
    #[serde(
        default,
        alias = "sender_display_name",
        skip_serializing_if = "Option::is_none"
    )]
    pub sender_name: Option<String>,
    /// Subject line
    #[serde(default)]
    pub subject: String,
    /// Plain-text body
    #[serde(default)]
    pub body: String,
    /// Timestamp exactly as supplied (usually RFC 3339)
    #[serde(default)]
    pub timestamp: String,
    /// Starred / important / read flags (flat keys on the wire)
    #[serde(flatten)]
    pub flags: MailFlags,
    /// Mailbox folder
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
    /// Conversation thread the message belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
}

impl EmailDocument {
    /// Create an empty document with the given id.
    #[must_use]
    pub fn new(id: impl Into<EmailId>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Set the sender address and display name
    #[must_use]
    pub fn with_sender(mut self, address: impl Into<String>, name: impl Into<String>) -> Self {
        self.sender = address.into();
        self.sender_name = Some(name.into());
        self
    }

    /// Set the subject line
    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    /// Set the body
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Set the raw timestamp
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }

    /// Replace all flags
    #[must_use]
    pub const fn with_flags(mut self, flags: MailFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Set the starred flag
    #[must_use]
    pub const fn starred(mut self, starred: bool) -> Self {
        self.flags.starred = starred;
        self
    }

    /// Set the important flag
    #[must_use]
    pub const fn important(mut self, important: bool) -> Self {
        self.flags.important = important;
        self
    }

    /// Set the read flag
    #[must_use]
    pub const fn read(mut self, read: bool) -> Self {
        self.flags.read = read;
        self
    }

    /// Set the folder
    #[must_use]
    pub fn in_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = Some(folder.into());
        self
    }

    /// Set the thread id
    #[must_use]
    pub fn in_thread(mut self, thread_id: impl Into<String>) -> Self {
        self.thread_id = Some(thread_id.into());
        self
    }

    /// Folder name, [`DEFAULT_FOLDER`] when absent.
    #[must_use]
    pub fn folder(&self) -> &str {
        self.folder.as_deref().unwrap_or(DEFAULT_FOLDER)
    }

    /// Display name, empty when absent.
    #[must_use]
    pub fn sender_name(&self) -> &str {
        self.sender_name.as_deref().unwrap_or_default()
    }

    /// Label used to group senders: display name, else address, else [`UNKNOWN_SENDER`].
    #[must_use]
    pub fn sender_label(&self) -> &str {
        match self.sender_name.as_deref() {
            Some(name) => name,
            None if self.sender.is_empty() => UNKNOWN_SENDER,
            None => self.sender.as_str(),
        }
    }

    /// Whether the message has not been read yet.
    #[must_use]
    pub const fn is_unread(&self) -> bool {
        !self.flags.read
    }

    /// Parse the raw timestamp as UTC.
    ///
    /// Accepts RFC 3339 and naive `YYYY-MM-DDTHH:MM:SS[.f][Z]` forms (naive
    /// values are taken as UTC). Returns `None` for anything else.
    #[must_use]
    pub fn timestamp_utc(&self) -> Option<DateTime<Utc>> {
        let raw = self.timestamp.trim();
        if raw.is_empty() {
            return None;
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        ["%Y-%m-%dT%H:%M:%S%.fZ", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .map(|naive| naive.and_utc())
    }

    /// Build a document from an untyped JSON value without ever failing.
    ///
    /// Missing or wrongly-typed fields take their documented defaults; a
    /// non-object value yields an all-default document.
    #[must_use]
    pub fn from_json_value(value: &Value) -> Self {
        Self {
            id: string_field(value, "id").unwrap_or_default(),
            sender: string_field(value, "sender").unwrap_or_default(),
            sender_name: string_field(value, "sender_name")
                .or_else(|| string_field(value, "sender_display_name")),
            subject: string_field(value, "subject").unwrap_or_default(),
            body: string_field(value, "body").unwrap_or_default(),
            timestamp: string_field(value, "timestamp").unwrap_or_default(),
            flags: MailFlags {
                starred: bool_field(value, "starred"),
                important: bool_field(value, "important"),
                read: bool_field(value, "read"),
            },
            folder: string_field(value, "folder"),
            thread_id: string_field(value, "thread_id"),
        }
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn bool_field(value: &Value, key: &str) -> bool {
    value.get(key).and_then(Value::as_bool).unwrap_or(false)
}

/// Parse a mailbox export: a JSON array of email objects.
///
/// Individual records are read leniently (see [`EmailDocument::from_json_value`]);
/// only a document that is not valid JSON, or not an array, is rejected.
pub fn parse_mailbox_json(text: &str) -> RetrievalResult<Vec<EmailDocument>> {
    let value: Value = serde_json::from_str(text)?;
    let Value::Array(records) = value else {
        return Err(RetrievalError::invalid(
            "mailbox must be a JSON array of email objects",
        ));
    };
    Ok(records.iter().map(EmailDocument::from_json_value).collect())
}

/// Read and parse a mailbox export from disk.
pub fn load_mailbox(path: impl AsRef<Path>) -> RetrievalResult<Vec<EmailDocument>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let docs = parse_mailbox_json(&text)?;
    tracing::debug!(path = %path.display(), count = docs.len(), "mailbox loaded");
    Ok(docs)
}
