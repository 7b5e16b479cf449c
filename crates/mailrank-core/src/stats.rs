//! Corpus-wide counts used to ground downstream generation
//!
//! Stats are recomputed from the full indexed batch on every call. Corpora
//! are small (tens to hundreds of emails), so there is no caching.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::index::IndexGeneration;

/// Message count for one sender
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenderCount {
    /// Display name, else address, else `"Unknown"`
    pub sender: String,
    /// Number of emails from this sender
    pub count: usize,
}

/// Aggregate mailbox statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailboxStats {
    /// Emails in the indexed batch (duplicates by id included)
    pub total_emails: usize,
    /// Emails whose `read` flag is false
    pub unread_count: usize,
    /// Starred emails
    pub starred_count: usize,
    /// Important emails
    pub important_count: usize,
    /// Most frequent senders, count descending, ties in first-seen order
    pub top_senders: Vec<SenderCount>,
    /// Emails per folder, in first-seen order
    pub folder_counts: IndexMap<String, usize>,
}

impl MailboxStats {
    /// Whether nothing has been counted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_emails == 0
    }
}

/// Compute stats for `generation`; `None` (never indexed) yields all zeros.
#[must_use]
pub fn compute_stats(generation: Option<&IndexGeneration>, top_senders: usize) -> MailboxStats {
    let Some(generation) = generation else {
        return MailboxStats::default();
    };

    let mut stats = MailboxStats {
        total_emails: generation.documents().len(),
        ..MailboxStats::default()
    };
    let mut senders: IndexMap<&str, usize> = IndexMap::new();

    for doc in generation.documents() {
        if doc.is_unread() {
            stats.unread_count += 1;
        }
        if doc.flags.starred {
            stats.starred_count += 1;
        }
        if doc.flags.important {
            stats.important_count += 1;
        }
        *senders.entry(doc.sender_label()).or_insert(0) += 1;
        *stats
            .folder_counts
            .entry(doc.folder().to_owned())
            .or_insert(0) += 1;
    }

    let mut ranked: Vec<(&str, usize)> = senders.into_iter().collect();
    // Stable: equal counts stay in first-seen order.
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    stats.top_senders = ranked
        .into_iter()
        .take(top_senders)
        .map(|(sender, count)| SenderCount {
            sender: sender.to_owned(),
            count,
        })
        .collect();

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_TOP_SENDERS;
    use crate::document::EmailDocument;

    fn from(id: &str, name: &str) -> EmailDocument {
        EmailDocument::new(id).with_sender(format!("{}@x.com", name.to_lowercase()), name)
    }

    #[test]
    fn never_indexed_is_all_zero() {
        let stats = compute_stats(None, DEFAULT_TOP_SENDERS);
        assert_eq!(stats, MailboxStats::default());
        assert!(stats.is_empty());
    }

    #[test]
    fn empty_batch_is_all_zero() {
        let generation = IndexGeneration::build(1, Vec::new());
        let stats = compute_stats(Some(&generation), DEFAULT_TOP_SENDERS);
        assert_eq!(stats.total_emails, 0);
        assert_eq!(stats.unread_count, 0);
        assert!(stats.top_senders.is_empty());
        assert!(stats.folder_counts.is_empty());
    }

    #[test]
    fn counts_flags_and_folders() {
        let generation = IndexGeneration::build(
            1,
            vec![
                from("1", "Ann").starred(true).read(true),
                from("2", "Ann").important(true),
                from("3", "Bob").in_folder("sent").read(true),
                EmailDocument::new("4").in_folder("drafts").starred(true),
            ],
        );
        let stats = compute_stats(Some(&generation), DEFAULT_TOP_SENDERS);
        assert_eq!(stats.total_emails, 4);
        assert_eq!(stats.unread_count, 2);
        assert_eq!(stats.starred_count, 2);
        assert_eq!(stats.important_count, 1);
        let folders: Vec<(&str, usize)> = stats
            .folder_counts
            .iter()
            .map(|(k, v)| (k.as_str(), *v))
            .collect();
        assert_eq!(folders, vec![("inbox", 2), ("sent", 1), ("drafts", 1)]);
        assert_eq!(
            stats.top_senders,
            vec![
                SenderCount { sender: "Ann".into(), count: 2 },
                SenderCount { sender: "Bob".into(), count: 1 },
                SenderCount { sender: "Unknown".into(), count: 1 },
            ]
        );
    }

    #[test]
    fn top_senders_limited_and_tie_stable() {
        let names = ["Zed", "Amy", "Kim", "Lee", "Max", "Ned", "Amy"];
        let docs = names
            .iter()
            .enumerate()
            .map(|(i, n)| from(&i.to_string(), n))
            .collect();
        let generation = IndexGeneration::build(1, docs);
        let stats = compute_stats(Some(&generation), 5);
        let labels: Vec<&str> = stats.top_senders.iter().map(|s| s.sender.as_str()).collect();
        assert_eq!(labels, vec!["Amy", "Zed", "Kim", "Lee", "Max"]);
    }

    #[test]
    fn duplicates_by_id_are_counted() {
        let generation =
            IndexGeneration::build(1, vec![EmailDocument::new("x"), EmailDocument::new("x")]);
        let stats = compute_stats(Some(&generation), 5);
        assert_eq!(stats.total_emails, 2);
        assert_eq!(generation.len(), 1);
    }

    #[test]
    fn serializes_folder_counts_as_object() {
        let generation = IndexGeneration::build(1, vec![EmailDocument::new("x").in_folder("sent")]);
        let json = serde_json::to_value(compute_stats(Some(&generation), 5)).unwrap();
        assert_eq!(json["folder_counts"]["sent"], 1);
        assert_eq!(json["top_senders"][0]["sender"], "Unknown");
    }
}
