//! Error types for the retrieval core

use thiserror::Error;

/// Result type alias for retrieval operations
pub type RetrievalResult<T> = std::result::Result<T, RetrievalError>;

/// Errors that can occur at the edges of the retrieval core.
///
/// Scoring and indexing themselves never fail: missing document fields fall
/// back to defaults and an empty index yields empty results. Errors only come
/// from validating untyped caller input and from loading mailbox files.
#[derive(Debug, Error)]
pub enum RetrievalError {
    /// Caller supplied an invalid argument (negative `top_k`, ill-typed filter, ...)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// I/O error while reading a mailbox file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON input
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RetrievalError {
    /// Returns the error type string (for JSON responses)
    #[must_use]
    pub const fn error_type(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::Io(_) => "IO_ERROR",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Shorthand for building an [`RetrievalError::InvalidArgument`].
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_type_mapping() {
        let cases: Vec<(RetrievalError, &str)> = vec![
            (
                RetrievalError::InvalidArgument("top_k".into()),
                "INVALID_ARGUMENT",
            ),
            (
                RetrievalError::Io(std::io::Error::other("disk full")),
                "IO_ERROR",
            ),
            (
                RetrievalError::Serialization(serde_json::from_str::<i32>("x").unwrap_err()),
                "SERIALIZATION_ERROR",
            ),
        ];
        for (err, expected) in &cases {
            assert_eq!(
                err.error_type(),
                *expected,
                "Error {err:?} should map to {expected}"
            );
        }
    }

    #[test]
    fn display_includes_message() {
        let err = RetrievalError::invalid("top_k must be >= 0, got -1");
        assert_eq!(err.to_string(), "Invalid argument: top_k must be >= 0, got -1");
    }

    #[test]
    fn io_error_from_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: RetrievalError = io_err.into();
        assert!(matches!(err, RetrievalError::Io(_)));
        assert_eq!(err.error_type(), "IO_ERROR");
    }

    #[test]
    fn serde_error_from_conversion() {
        let json_err = serde_json::from_str::<i32>("nope").unwrap_err();
        let err: RetrievalError = json_err.into();
        assert!(matches!(err, RetrievalError::Serialization(_)));
    }
}
