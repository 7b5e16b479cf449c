//! Retrieval and ranking core for the mailrank email assistant
//!
//! This crate turns a batch of email records into a queryable index and
//! answers ranked retrieval requests against it:
//! - [`tokenizer`]: lowercase word tokens used everywhere text is compared
//! - [`EmailIndex`]: rebuild-only index with atomically published generations
//! - [`similarity`]: term-frequency cosine plus the keyword-overlap boost
//! - [`MailFilter`]: conjunctive metadata filters applied before scoring
//! - [`ranker`]: filter, score, stable-sort and truncate
//! - [`compute_stats`] / [`GroundingContext`]: corpus summary for prompt grounding
//! - [`MailRetriever`]: the facade the orchestration layer calls
//!
//! Scoring uses only bag-of-words counts; there is no embedding model and no
//! persistence. Rebuilds replace the whole index.

#![forbid(unsafe_code)]

pub mod config;
pub mod document;
pub mod error;
pub mod filter;
pub mod grounding;
pub mod index;
pub mod query;
pub mod ranker;
pub mod results;
pub mod retriever;
pub mod similarity;
pub mod source;
pub mod stats;
pub mod tokenizer;

// Re-export key types
pub use config::RetrievalConfig;
pub use document::{EmailDocument, EmailId, MailFlags, load_mailbox, parse_mailbox_json};
pub use error::{RetrievalError, RetrievalResult};
pub use filter::MailFilter;
pub use grounding::GroundingContext;
pub use index::{EmailIndex, IndexGeneration, IndexHealth, IndexStats, searchable_text};
pub use query::RetrievalQuery;
pub use ranker::rank;
pub use results::ScoredEmail;
pub use retriever::MailRetriever;
pub use similarity::{KeywordMatcher, TermVector, cosine_similarity, has_keyword_overlap};
pub use source::{JsonMailbox, MailboxSource};
pub use stats::{MailboxStats, SenderCount, compute_stats};
pub use tokenizer::tokenize;
