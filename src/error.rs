//! Typed error types for the update-check core.
//!
//! Callers at the crate boundary match on specific variants instead of
//! parsing opaque strings. A fetch failure is never collapsed into a
//! "no update available" answer, since outages must stay visible.

use thiserror::Error;

/// Failures while fetching release metadata from the registry.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure: DNS, connect, TLS, timeout. No HTTP
    /// response was received.
    #[error("could not reach the release registry: {0}")]
    Network(String),

    /// The registry answered with a non-success HTTP status.
    #[error("release registry returned HTTP status {0}")]
    Http(u16),

    /// The response body was not parseable JSON, or it lacked a usable
    /// `tag_name` field.
    #[error("malformed release response: {0}")]
    MalformedResponse(String),

    /// The request URL was rejected before any network call (non-HTTPS
    /// scheme or a host outside the registry allowlist).
    #[error("invalid registry URL: {0}")]
    InvalidUrl(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_message_names_registry() {
        let err = FetchError::Network("connection refused".to_string());
        let msg = err.to_string();
        assert!(msg.contains("could not reach"), "got: {msg}");
        assert!(msg.contains("connection refused"), "got: {msg}");
    }

    #[test]
    fn test_http_message_carries_status() {
        let msg = FetchError::Http(403).to_string();
        assert!(msg.contains("403"), "got: {msg}");
    }

    #[test]
    fn test_malformed_message() {
        let msg = FetchError::MalformedResponse("missing tag_name".to_string()).to_string();
        assert!(msg.contains("malformed"), "got: {msg}");
        assert!(msg.contains("missing tag_name"), "got: {msg}");
    }
}
