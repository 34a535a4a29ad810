//! Error types for report data fetching
//!
//! Failures are classified by where they occurred:
//! - Network: transport-level failure (connect, TLS, non-success status)
//! - Malformed: the body arrived but was not JSON or violated the schema
//!
//! This layer never retries; recovery happens on the next revalidation tick
//! or a filter change that produces a new cache key.

use thiserror::Error;

/// Fetch failure taxonomy for a report request.
///
/// Clone-able so a resolved error can live in the cache and be handed to
/// every caller sharing the key until the slot goes stale.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl FetchError {
    /// Returns true for transport-level failures.
    pub fn is_network(&self) -> bool {
        matches!(self, FetchError::Network(_))
    }

    /// Returns true for non-JSON or schema-violating bodies.
    pub fn is_malformed(&self) -> bool {
        matches!(self, FetchError::Malformed(_))
    }
}

/// Serializable error representation for view rendering.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewError {
    pub message: String,
    pub kind: ErrorKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    Network,
    Malformed,
}

impl From<&FetchError> for ViewError {
    fn from(err: &FetchError) -> Self {
        let kind = match err {
            FetchError::Network(_) => ErrorKind::Network,
            FetchError::Malformed(_) => ErrorKind::Malformed,
        };
        ViewError {
            message: err.to_string(),
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_predicates() {
        assert!(FetchError::Network("connection refused".into()).is_network());
        assert!(!FetchError::Network("connection refused".into()).is_malformed());
        assert!(FetchError::Malformed("expected object".into()).is_malformed());
    }

    #[test]
    fn test_view_error_carries_kind() {
        let err = FetchError::Malformed("trailing garbage".into());
        let view: ViewError = (&err).into();
        assert_eq!(view.kind, ErrorKind::Malformed);
        assert!(view.message.contains("trailing garbage"));
    }
}
