//! Error types surfaced by the search session.
//!
//! Only two kinds of failure ever reach a caller: a failed fetch, which the
//! presentation layer shows in place of the result list, and a rejected
//! favorites mutation. Cancelled fetches are not errors and never appear here.

use std::time::Duration;

use thiserror::Error;

/// Message shown for any non-success HTTP status.
pub const GENERIC_FETCH_MESSAGE: &str = "An error occurred. Unable to fetch data.";

/// A search request failed. Never touches favorites or selection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("{GENERIC_FETCH_MESSAGE}")]
    Status(u16),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("No API key configured (set NEWS_API_KEY or api.api_key in config.ron)")]
    MissingApiKey,
}

/// A favorites mutation was rejected before anything changed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Rating must be between 1 and 5, got {0}")]
    RatingOutOfRange(u8),

    #[error("\"{0}\" is already in favorites")]
    DuplicateTitle(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_uses_generic_message() {
        assert_eq!(FetchError::Status(500).to_string(), GENERIC_FETCH_MESSAGE);
        assert_eq!(FetchError::Status(401).to_string(), GENERIC_FETCH_MESSAGE);
    }

    #[test]
    fn test_validation_messages() {
        assert_eq!(
            ValidationError::RatingOutOfRange(7).to_string(),
            "Rating must be between 1 and 5, got 7"
        );
        assert!(
            ValidationError::DuplicateTitle("X".to_string())
                .to_string()
                .contains("already in favorites")
        );
    }
}
