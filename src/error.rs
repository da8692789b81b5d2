//! Custom error types for rustopenalex.
//!
//! All library functions return `Result<T, OpenAlexError>`. Failures talking to
//! OpenAlex itself (`Network`, `Api`, `RateLimited`) are grouped as *upstream*
//! errors; everything else a top-level search can raise is reported by the
//! builders as `Unexpected`.

use thiserror::Error;
use tracing::error;

/// Main error type for rustopenalex operations.
#[derive(Debug, Error)]
pub enum OpenAlexError {
    /// Network/HTTP transport error (connect, timeout, body read)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// OpenAlex answered with a non-success status
    #[error("API error: {code} - {message}")]
    Api {
        /// HTTP status code
        code: u16,
        /// Error message
        message: String,
    },

    /// Rate limited by OpenAlex after exhausting retries
    #[error("Rate limited, retry after {0}s")]
    RateLimited(u64),

    /// Response body could not be interpreted
    #[error("Parse error: {0}")]
    Parse(String),

    /// A required field of an API record is missing or has the wrong type
    #[error("Malformed {record} record: missing or invalid `{field}`")]
    MalformedRecord {
        /// Record kind ("author", "work")
        record: &'static str,
        /// Dotted path of the offending field
        field: String,
    },

    /// Non-upstream failure during a top-level search call
    #[error("Unexpected error: {0}")]
    Unexpected(#[source] Box<OpenAlexError>),

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV export error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),
}

impl OpenAlexError {
    /// True for network, HTTP status and rate-limit failures.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            OpenAlexError::Network(_) | OpenAlexError::Api { .. } | OpenAlexError::RateLimited(_)
        )
    }

    /// Classify and log a failure of a top-level search call.
    ///
    /// Upstream errors pass through unchanged; anything else is wrapped in
    /// `Unexpected`. Both are logged at error level.
    pub fn into_search_failure(self) -> Self {
        if self.is_upstream() {
            error!(error = %self, "Failed to fetch data from OpenAlex");
            self
        } else {
            error!(error = %self, "An unexpected error occurred");
            match self {
                OpenAlexError::Unexpected(_) => self,
                other => OpenAlexError::Unexpected(Box::new(other)),
            }
        }
    }

    /// Shorthand for a `MalformedRecord` error.
    pub fn malformed(record: &'static str, field: impl Into<String>) -> Self {
        OpenAlexError::MalformedRecord {
            record,
            field: field.into(),
        }
    }
}

/// Result type alias using `OpenAlexError`
pub type Result<T> = std::result::Result<T, OpenAlexError>;

/// Extension trait for adding context to Option types
pub trait OptionExt<T> {
    /// Convert Option to Result with a parse error message
    fn ok_or_parse(self, msg: &str) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_parse(self, msg: &str) -> Result<T> {
        self.ok_or_else(|| OpenAlexError::Parse(msg.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_classification() {
        let api = OpenAlexError::Api {
            code: 503,
            message: "unavailable".to_string(),
        };
        assert!(api.is_upstream());
        assert!(OpenAlexError::RateLimited(60).is_upstream());
        assert!(!OpenAlexError::Parse("bad".to_string()).is_upstream());
        assert!(!OpenAlexError::malformed("work", "title").is_upstream());
    }

    #[test]
    fn test_search_failure_classification() {
        let upstream = OpenAlexError::RateLimited(60).into_search_failure();
        assert!(matches!(upstream, OpenAlexError::RateLimited(60)));

        let other = OpenAlexError::Parse("bad".to_string()).into_search_failure();
        assert!(matches!(other, OpenAlexError::Unexpected(ref inner) if matches!(**inner, OpenAlexError::Parse(_))));

        let twice = other.into_search_failure();
        assert!(matches!(twice, OpenAlexError::Unexpected(ref inner) if !matches!(**inner, OpenAlexError::Unexpected(_))));
    }

    #[test]
    fn test_malformed_display() {
        let err = OpenAlexError::malformed("work", "authorships");
        assert_eq!(
            err.to_string(),
            "Malformed work record: missing or invalid `authorships`"
        );
    }

    #[test]
    fn test_ok_or_parse() {
        let missing: Option<u8> = None;
        assert!(matches!(missing.ok_or_parse("nope"), Err(OpenAlexError::Parse(_))));
        assert_eq!(Some(3).ok_or_parse("nope").ok(), Some(3));
    }
}
