//! # Fishery Errors
//!
//! A single error type shared by every fallible operation in the crate.
//! Data-source failures travel up through `RecordStream::begin` untouched, so
//! the orchestration layer can match on the variant and decide whether to
//! abort the run or skip the stream.

use thiserror::Error;

/// The error taxonomy for fetching, extracting and configuring record streams.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FisheryError {
    /// The remote request could not complete, returned a non-2xx status,
    /// or produced a body that is not JSON.
    #[error("Transport error: {0}")]
    Transport(String),

    /// A local resource (e.g. `{route}.json`) is missing or unreadable.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Structured data could not be parsed or lacks the expected shape.
    #[error("Format error: {0}")]
    Format(String),

    /// Unknown stream kind or missing/invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Shorthand used across the crate.
pub type FisheryResult<T> = Result<T, FisheryError>;

impl From<serde_json::Error> for FisheryError {
    fn from(e: serde_json::Error) -> Self {
        FisheryError::Format(e.to_string())
    }
}

impl From<url::ParseError> for FisheryError {
    fn from(e: url::ParseError) -> Self {
        FisheryError::Config(format!("invalid URL: {}", e))
    }
}

impl From<reqwest::Error> for FisheryError {
    fn from(e: reqwest::Error) -> Self {
        FisheryError::Transport(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_errors_become_format_errors() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        assert!(matches!(FisheryError::from(err), FisheryError::Format(_)));
    }

    #[test]
    fn url_errors_become_config_errors() {
        let err = url::Url::parse("not a url").unwrap_err();
        let converted = FisheryError::from(err);
        assert!(matches!(converted, FisheryError::Config(_)));
        assert!(converted.to_string().starts_with("Configuration error: invalid URL"));
    }
}
