//! Error types for the fetch module.
//!
//! Every variant here is fatal to a run. Rate limiting (HTTP 429) is not an
//! error: the fetch loop handles it in place and retries the same page.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a fetch run.
#[derive(Debug, Error)]
pub enum FetchError {
    /// An option is outside its accepted range.
    #[error("invalid value for {option}: {reason}")]
    InvalidOption {
        /// The option name as shown on the command line.
        option: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// The API base URL or a derived request URL could not be parsed.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The offending URL string.
        url: String,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error fetching {url}: {source}")]
    Network {
        /// The request URL.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// The request exceeded the per-request ceiling.
    #[error("timeout fetching {url}")]
    Timeout {
        /// The request URL.
        url: String,
    },

    /// The server rejected the credential.
    #[error(
        "[AUTH] 401 Unauthorized fetching page {page}\n  Suggestion: Check STRAVA_ACCESS_TOKEN; it may be expired or lack the activity:read scope."
    )]
    Unauthorized {
        /// The page being requested.
        page: u32,
    },

    /// Any non-2xx status other than 401 and 429.
    #[error("HTTP {status} fetching page {page}: {snippet}")]
    HttpStatus {
        /// The page being requested.
        page: u32,
        /// The HTTP status code.
        status: u16,
        /// Leading part of the response payload.
        snippet: String,
    },

    /// A 2xx response whose payload is not a JSON array.
    #[error("unexpected response type for page {page}: expected a JSON array, got {found}")]
    UnexpectedShape {
        /// The page being requested.
        page: u32,
        /// Short description of what was received.
        found: &'static str,
    },

    /// File system error while writing artifacts.
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The file or directory path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization error (shouldn't occur for values parsed from JSON).
    #[error("JSON serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl FetchError {
    /// Creates an invalid option error.
    pub fn invalid_option(option: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            option,
            reason: reason.into(),
        }
    }

    /// Creates a network error, mapping reqwest timeouts to [`FetchError::Timeout`].
    pub fn from_reqwest(url: impl Into<String>, source: reqwest::Error) -> Self {
        let url = url.into();
        if source.is_timeout() {
            Self::Timeout { url }
        } else {
            Self::Network { url, source }
        }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns true for errors raised before any request was sent.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidOption { .. } | Self::InvalidUrl { .. } | Self::Client(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_invalid_option_display() {
        let error = FetchError::invalid_option("--start-page", "must be >= 1");
        let msg = error.to_string();
        assert!(msg.contains("--start-page"), "Expected option in: {msg}");
        assert!(msg.contains("must be >= 1"), "Expected reason in: {msg}");
        assert!(error.is_configuration());
    }

    #[test]
    fn test_fetch_error_unauthorized_display() {
        let msg = FetchError::Unauthorized { page: 3 }.to_string();
        assert!(msg.starts_with("[AUTH]"), "Expected [AUTH] prefix in: {msg}");
        assert!(msg.contains("401"), "Expected status in: {msg}");
        assert!(msg.contains("page 3"), "Expected page in: {msg}");
        assert!(
            msg.contains("STRAVA_ACCESS_TOKEN"),
            "Expected actionable suggestion in: {msg}"
        );
    }

    #[test]
    fn test_fetch_error_http_status_display() {
        let error = FetchError::HttpStatus {
            page: 2,
            status: 503,
            snippet: "upstream unavailable".to_string(),
        };
        let msg = error.to_string();
        assert!(msg.contains("503"), "Expected '503' in: {msg}");
        assert!(msg.contains("page 2"), "Expected page in: {msg}");
        assert!(msg.contains("upstream unavailable"), "Expected snippet in: {msg}");
        assert!(!error.is_configuration());
    }

    #[test]
    fn test_fetch_error_unexpected_shape_display() {
        let msg = FetchError::UnexpectedShape {
            page: 1,
            found: "object",
        }
        .to_string();
        assert!(msg.contains("JSON array"), "Expected expectation in: {msg}");
        assert!(msg.contains("object"), "Expected found kind in: {msg}");
    }

    #[test]
    fn test_fetch_error_io_display() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let msg = FetchError::io("/tmp/out/page_1.json", io_error).to_string();
        assert!(msg.contains("/tmp/out/page_1.json"), "Expected path in: {msg}");
    }
}
