//! HTTP client wrapper for the activities endpoint.
//!
//! This module provides the [`ApiClient`] struct, which issues one page
//! request at a time and hands back a [`FetchResult`] for every HTTP response,
//! successful or not, so the fetch loop has a single decision point. Only
//! transport failures (connection errors, timeouts) surface as errors.

use std::fmt;
use std::time::Duration;

use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderMap, RETRY_AFTER};
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use super::FetchError;
use super::TimeWindow;
use super::constants::{
    ACTIVITIES_PATH, CONNECT_TIMEOUT_SECS, RATE_LIMIT_LIMIT_HEADER, RATE_LIMIT_USAGE_HEADER,
    REQUEST_TIMEOUT_SECS,
};
use crate::user_agent;

/// Body of an API response.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// The body parsed as JSON.
    Json(Value),
    /// The body was not valid JSON; kept verbatim.
    Text(String),
    /// The body was empty.
    Empty,
}

impl Payload {
    /// Classifies a raw response body.
    #[must_use]
    pub fn from_body(body: String) -> Self {
        if body.trim().is_empty() {
            return Self::Empty;
        }
        match serde_json::from_str(&body) {
            Ok(value) => Self::Json(value),
            Err(_) => Self::Text(body),
        }
    }

    /// Returns the JSON array, if the payload is one.
    #[must_use]
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Self::Json(Value::Array(items)) => Some(items),
            _ => None,
        }
    }

    /// Short description of the payload shape, for error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Json(Value::Array(_)) => "array",
            Self::Json(Value::Object(_)) => "object",
            Self::Json(Value::String(_)) => "string",
            Self::Json(Value::Number(_)) => "number",
            Self::Json(Value::Bool(_)) => "boolean",
            Self::Json(Value::Null) => "null",
            Self::Text(_) => "non-JSON text",
            Self::Empty => "empty body",
        }
    }

    /// Renders at most `max_chars` characters of the payload.
    #[must_use]
    pub fn snippet(&self, max_chars: usize) -> String {
        let full = match self {
            Self::Json(value) => value.to_string(),
            Self::Text(text) => text.clone(),
            Self::Empty => return String::new(),
        };
        if full.chars().count() <= max_chars {
            return full;
        }
        let mut truncated: String = full.chars().take(max_chars).collect();
        truncated.push_str("...");
        truncated
    }
}

/// Outcome of one page request.
#[derive(Debug, Clone)]
pub struct FetchResult {
    /// Parsed response body.
    pub payload: Payload,
    /// Response headers.
    pub headers: HeaderMap,
    /// HTTP status code.
    pub status: u16,
}

impl FetchResult {
    /// Returns true for 2xx statuses.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Returns a header value as text, if present and valid UTF-8.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// Returns the raw Retry-After header.
    #[must_use]
    pub fn retry_after(&self) -> Option<&str> {
        self.headers
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
    }

    /// Returns the `(usage, limit)` rate-limit header pair when both are present.
    #[must_use]
    pub fn rate_limit_usage(&self) -> Option<(&str, &str)> {
        Some((
            self.header(RATE_LIMIT_USAGE_HEADER)?,
            self.header(RATE_LIMIT_LIMIT_HEADER)?,
        ))
    }
}

/// Authenticated client for the activities endpoint.
///
/// Created once per run and reused for every page (connection pooling).
/// `Debug` output never includes the bearer token.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    token: String,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("token", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Creates a client with default timeouts.
    ///
    /// Default configuration:
    /// - Connect timeout: 10 seconds
    /// - Request timeout: 60 seconds
    /// - Gzip decompression: enabled
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidUrl`] if `base_url` is not an absolute
    /// http(s) URL, or [`FetchError::Client`] if the HTTP client fails to build.
    pub fn new(base_url: &str, token: impl Into<String>) -> Result<Self, FetchError> {
        Self::with_timeouts(base_url, token, CONNECT_TIMEOUT_SECS, REQUEST_TIMEOUT_SECS)
    }

    /// Creates a client with explicit timeout values.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`new`](Self::new).
    pub fn with_timeouts(
        base_url: &str,
        token: impl Into<String>,
        connect_timeout_secs: u64,
        request_timeout_secs: u64,
    ) -> Result<Self, FetchError> {
        let base_url = normalize_base_url(base_url)?;
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .timeout(Duration::from_secs(request_timeout_secs))
            .user_agent(user_agent::default_api_user_agent())
            .gzip(true)
            .build()
            .map_err(FetchError::Client)?;

        debug!(base_url = %base_url, request_timeout_secs, "created API client");
        Ok(Self {
            client,
            base_url,
            token: token.into(),
        })
    }

    /// Builds the activities list URL for one page of `window`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidUrl`] if the endpoint cannot be joined onto the base.
    pub fn activities_url(
        &self,
        window: &TimeWindow,
        page: u32,
        per_page: u32,
    ) -> Result<Url, FetchError> {
        let mut url = self
            .base_url
            .join(ACTIVITIES_PATH)
            .map_err(|_| FetchError::InvalidUrl {
                url: format!("{}{ACTIVITIES_PATH}", self.base_url),
            })?;
        url.query_pairs_mut()
            .append_pair("after", &window.after().to_string())
            .append_pair("before", &window.before().to_string())
            .append_pair("page", &page.to_string())
            .append_pair("per_page", &per_page.to_string());
        Ok(url)
    }

    /// Requests one page of activities.
    ///
    /// Any HTTP status, including 4xx and 5xx, is returned as a [`FetchResult`].
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Timeout`] when the per-request ceiling is exceeded,
    /// and [`FetchError::Network`] for other transport failures.
    #[instrument(skip(self, window), fields(year = window.year()))]
    pub async fn fetch_page(
        &self,
        window: &TimeWindow,
        page: u32,
        per_page: u32,
    ) -> Result<FetchResult, FetchError> {
        let url = self.activities_url(window, page, per_page)?;

        let response = self
            .client
            .get(url.clone())
            .bearer_auth(&self.token)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url.as_str(), e))?;

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(url.as_str(), e))?;

        debug!(status, bytes = body.len(), "received response");
        Ok(FetchResult {
            payload: Payload::from_body(body),
            headers,
            status,
        })
    }
}

fn normalize_base_url(base_url: &str) -> Result<Url, FetchError> {
    let invalid = || FetchError::InvalidUrl {
        url: base_url.to_string(),
    };
    let with_slash = format!("{}/", base_url.trim().trim_end_matches('/'));
    let url = Url::parse(&with_slash).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(invalid());
    }
    Ok(url)
}
