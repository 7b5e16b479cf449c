//! Retrieval tuning knobs
//!
//! Defaults: 1.5x keyword boost, ten results, five top senders. Each knob can be
//! overridden through an environment variable; absent or unparsable values
//! fall back to the default.

use serde::{Deserialize, Serialize};

/// Environment variable for the keyword-overlap boost multiplier.
pub const KEYWORD_BOOST_ENV: &str = "MAILRANK_KEYWORD_BOOST";
/// Default multiplier applied to the cosine score on keyword overlap.
pub const DEFAULT_KEYWORD_BOOST: f64 = 1.5;

/// Environment variable for the default result count.
pub const DEFAULT_TOP_K_ENV: &str = "MAILRANK_DEFAULT_TOP_K";
/// Default `top_k` when a caller does not specify one.
pub const DEFAULT_TOP_K: usize = 10;

/// Environment variable for the number of senders reported by stats.
pub const TOP_SENDERS_ENV: &str = "MAILRANK_TOP_SENDERS";
/// Default length of the `top_senders` list.
pub const DEFAULT_TOP_SENDERS: usize = 5;

/// Configuration for ranking and stats.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Multiplier applied to the cosine score when the query overlaps the document text.
    pub keyword_boost: f64,
    /// Result count used by convenience searches when none is given.
    pub default_top_k: usize,
    /// Maximum entries in [`MailboxStats::top_senders`](crate::stats::MailboxStats).
    pub top_senders: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            keyword_boost: DEFAULT_KEYWORD_BOOST,
            default_top_k: DEFAULT_TOP_K,
            top_senders: DEFAULT_TOP_SENDERS,
        }
    }
}

impl RetrievalConfig {
    /// Load config from environment variables, falling back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load config through an arbitrary key lookup (environment, config map, ...).
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let keyword_boost = lookup(KEYWORD_BOOST_ENV)
            .and_then(|s| s.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite() && *v >= 1.0)
            .unwrap_or(DEFAULT_KEYWORD_BOOST);

        let default_top_k = lookup(DEFAULT_TOP_K_ENV)
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_TOP_K);

        let top_senders = lookup(TOP_SENDERS_ENV)
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_TOP_SENDERS);

        Self {
            keyword_boost,
            default_top_k,
            top_senders,
        }
    }
}
