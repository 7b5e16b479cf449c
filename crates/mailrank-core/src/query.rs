//! Retrieval request model
//!
//! [`RetrievalQuery`] is the input to [`rank`](crate::ranker::rank). Typed
//! callers build it directly; the orchestration layer can hand over an
//! untyped JSON request and have it validated by [`RetrievalQuery::from_json`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::DEFAULT_TOP_K;
use crate::error::{RetrievalError, RetrievalResult};
use crate::filter::MailFilter;

/// A free-text query with a result limit and optional filters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievalQuery {
    /// The raw query string
    #[serde(alias = "query")]
    pub raw_query: String,
    /// Maximum number of results to return
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Structured filters
    #[serde(default, skip_serializing_if = "MailFilter::is_empty")]
    pub filters: MailFilter,
}

const fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

impl RetrievalQuery {
    /// Create a query with the default `top_k` and no filters
    #[must_use]
    pub fn new(raw_query: impl Into<String>) -> Self {
        Self {
            raw_query: raw_query.into(),
            top_k: default_top_k(),
            filters: MailFilter::default(),
        }
    }

    /// Set the result limit
    #[must_use]
    pub const fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Set the filters
    #[must_use]
    pub fn with_filters(mut self, filters: MailFilter) -> Self {
        self.filters = filters;
        self
    }

    /// Validate an untyped request object.
    ///
    /// Accepted keys: `query` (or `raw_query`, string, default empty),
    /// `top_k` (non-negative integer, default [`DEFAULT_TOP_K`]) and
    /// `filters` (object or null). Anything else about the shape is an
    /// [`RetrievalError::InvalidArgument`].
    pub fn from_json(value: &Value) -> RetrievalResult<Self> {
        let Some(obj) = value.as_object() else {
            return Err(RetrievalError::invalid("request must be a JSON object"));
        };

        let raw_query = match obj.get("query").or_else(|| obj.get("raw_query")) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => {
                return Err(RetrievalError::invalid(format!(
                    "query must be a string, got {other}"
                )));
            }
        };

        let top_k = match obj.get("top_k") {
            None | Some(Value::Null) => default_top_k(),
            Some(Value::Number(n)) => parse_top_k(n)?,
            Some(other) => {
                return Err(RetrievalError::invalid(format!(
                    "top_k must be a non-negative integer, got {other}"
                )));
            }
        };

        let filters = obj
            .get("filters")
            .map_or_else(|| Ok(MailFilter::default()), MailFilter::from_json)?;

        Ok(Self {
            raw_query,
            top_k,
            filters,
        })
    }
}

fn parse_top_k(n: &serde_json::Number) -> RetrievalResult<usize> {
    if let Some(v) = n.as_u64() {
        return usize::try_from(v)
            .map_err(|_| RetrievalError::invalid(format!("top_k {v} is too large")));
    }
    if let Some(v) = n.as_i64() {
        return Err(RetrievalError::invalid(format!(
            "top_k must be >= 0, got {v}"
        )));
    }
    Err(RetrievalError::invalid(format!(
        "top_k must be an integer, got {n}"
    )))
}
