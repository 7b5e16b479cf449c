//! Plain-text grounding block for a downstream generation prompt
//!
//! Combines the mailbox summary with the top retrieved emails. The output is
//! deterministic for a given stats value and hit list.

use std::fmt::Write as _;

use crate::results::ScoredEmail;
use crate::stats::MailboxStats;

/// Context emails listed by default.
pub const DEFAULT_CONTEXT_EMAILS: usize = 5;

/// Builder for the grounding text
#[derive(Debug, Clone, Copy)]
pub struct GroundingContext<'a> {
    stats: Option<&'a MailboxStats>,
    hits: &'a [ScoredEmail],
    max_emails: usize,
}

impl<'a> GroundingContext<'a> {
    /// Context over the given hits, listing at most [`DEFAULT_CONTEXT_EMAILS`].
    #[must_use]
    pub const fn new(hits: &'a [ScoredEmail]) -> Self {
        Self {
            stats: None,
            hits,
            max_emails: DEFAULT_CONTEXT_EMAILS,
        }
    }

    /// Include a mailbox summary section
    #[must_use]
    pub const fn with_stats(mut self, stats: &'a MailboxStats) -> Self {
        self.stats = Some(stats);
        self
    }

    /// Override how many emails are listed
    #[must_use]
    pub const fn with_max_emails(mut self, max_emails: usize) -> Self {
        self.max_emails = max_emails;
        self
    }

    /// Render the context block. Empty sections are omitted.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();

        if let Some(stats) = self.stats {
            let _ = writeln!(out, "Inbox Summary:");
            let _ = writeln!(out, "  Total Emails: {}", stats.total_emails);
            let _ = writeln!(out, "  Unread: {}", stats.unread_count);
            let _ = writeln!(out, "  Starred: {}", stats.starred_count);
            let _ = writeln!(out, "  Important: {}", stats.important_count);
            if !stats.top_senders.is_empty() {
                let senders: Vec<String> = stats
                    .top_senders
                    .iter()
                    .map(|s| format!("{} ({})", s.sender, s.count))
                    .collect();
                let _ = writeln!(out, "  Top Senders: {}", senders.join(", "));
            }
            if !stats.folder_counts.is_empty() {
                let folders: Vec<String> = stats
                    .folder_counts
                    .iter()
                    .map(|(folder, count)| format!("{folder} ({count})"))
                    .collect();
                let _ = writeln!(out, "  Folders: {}", folders.join(", "));
            }
        }

        if !self.hits.is_empty() && self.max_emails > 0 {
            if !out.is_empty() {
                out.push('\n');
            }
            let _ = writeln!(out, "Context Emails ({} emails):", self.hits.len());
            for hit in self.hits.iter().take(self.max_emails) {
                let doc = &hit.document;
                let _ = writeln!(out, "  - {} (from {})", doc.subject, doc.sender);
            }
        }

        out
    }
}
