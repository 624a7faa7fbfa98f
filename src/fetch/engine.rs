//! The page-by-page fetch loop.
//!
//! [`fetch_year`] walks the activities list for one calendar year, one page at
//! a time, pacing requests through a [`RequestPacer`]. Each non-empty page is
//! written verbatim to `page_<n>.json`; an empty page ends the run and a
//! [`RunSummary`] is written as `meta.json`.
//!
//! # Termination
//!
//! - empty JSON array: normal end ([`StopReason::Exhausted`])
//! - `max_pages` pages written (when nonzero): [`StopReason::PageCap`]
//! - 401, any other non-2xx except 429, a non-array payload, or a transport
//!   failure: the run aborts with a [`FetchError`] and no summary is written.
//!   Pages already on disk are left in place.
//!
//! HTTP 429 is retried on the same page after sleeping for the Retry-After
//! value (or a default), with no retry cap.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use super::client::{ApiClient, FetchResult};
use super::constants::{
    DEFAULT_REQUESTS_PER_MINUTE, DEFAULT_RETRY_AFTER, MAX_PER_PAGE, PAYLOAD_SNIPPET_CHARS,
};
use super::rate_limiter::{RequestPacer, retry_delay};
use super::summary::{RunSummary, StopReason};
use super::{FetchError, TimeWindow};

/// Parameters for one fetch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    /// Calendar year to fetch.
    pub year: i32,
    /// Base output folder; pages land in `<output_root>/<year>/`.
    pub output_root: PathBuf,
    /// Items per page (1..=200 after validation).
    pub per_page: u32,
    /// First page to request (>= 1).
    pub start_page: u32,
    /// Safety cap on pages written; 0 means unbounded.
    pub max_pages: u32,
    /// Request budget per minute (>= 1).
    pub requests_per_minute: u32,
    /// Backoff for a 429 without a usable Retry-After header.
    pub default_retry_after: Duration,
}

impl FetchOptions {
    /// Creates options with the default paging and pacing settings.
    #[must_use]
    pub fn new(year: i32, output_root: impl Into<PathBuf>) -> Self {
        Self {
            year,
            output_root: output_root.into(),
            per_page: MAX_PER_PAGE,
            start_page: 1,
            max_pages: 0,
            requests_per_minute: DEFAULT_REQUESTS_PER_MINUTE,
            default_retry_after: DEFAULT_RETRY_AFTER,
        }
    }

    /// Checks ranges and clamps `per_page` to the server maximum.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidOption`] when `per_page`, `start_page` or
    /// `requests_per_minute` is zero.
    pub fn validate(mut self) -> Result<Self, FetchError> {
        if self.per_page == 0 {
            return Err(FetchError::invalid_option("--per-page", "must be >= 1"));
        }
        if self.per_page > MAX_PER_PAGE {
            warn!(
                requested = self.per_page,
                max = MAX_PER_PAGE,
                "per-page exceeds server maximum, clamping"
            );
            self.per_page = MAX_PER_PAGE;
        }
        if self.start_page == 0 {
            return Err(FetchError::invalid_option("--start-page", "must be >= 1"));
        }
        if self.requests_per_minute == 0 {
            return Err(FetchError::invalid_option("--rpm", "must be >= 1"));
        }
        Ok(self)
    }

    /// Directory holding this run's artifacts.
    #[must_use]
    pub fn run_dir(&self) -> PathBuf {
        self.output_root.join(self.year.to_string())
    }
}

/// Deterministic artifact name for a page.
#[must_use]
pub fn page_file_name(page: u32) -> String {
    format!("page_{page}.json")
}

/// What the loop should do with one response.
enum PageOutcome<'a> {
    Items(&'a [Value]),
    Empty,
    RateLimited(Duration),
}

/// Fetches every page of activities for `options.year`.
///
/// Options are validated before any file or network I/O.
///
/// # Errors
///
/// Returns [`FetchError`] for invalid options, authorization failure, fatal
/// HTTP statuses, unexpected payload shapes, transport failures and IO errors.
#[instrument(skip(client, options), fields(year = options.year))]
pub async fn fetch_year(
    client: &ApiClient,
    options: &FetchOptions,
) -> Result<RunSummary, FetchError> {
    let options = options.clone().validate()?;
    let window = TimeWindow::for_year(options.year)?;

    let out_dir = options.run_dir();
    tokio::fs::create_dir_all(&out_dir)
        .await
        .map_err(|e| FetchError::io(&out_dir, e))?;

    info!(
        after = window.after(),
        before = window.before(),
        out_dir = %out_dir.display(),
        "fetching activities"
    );

    let mut pacer = RequestPacer::per_minute(options.requests_per_minute);
    let mut page = options.start_page;
    let mut fetched_pages: u32 = 0;

    let stop_reason = loop {
        if options.max_pages != 0 && fetched_pages >= options.max_pages {
            info!(max_pages = options.max_pages, "reached max pages, stopping");
            break StopReason::PageCap;
        }

        pacer.wait_turn().await;
        let attempt = client.fetch_page(&window, page, options.per_page).await;
        pacer.mark_attempt();
        let result = attempt?;

        match classify_response(&result, page, options.default_retry_after)? {
            PageOutcome::RateLimited(delay) => {
                warn!(
                    page,
                    delay_secs = delay.as_secs(),
                    "429 rate limited, sleeping then retrying same page"
                );
                pacer.back_off(delay).await;
            }
            PageOutcome::Empty => {
                info!(
                    last_page = page.saturating_sub(1),
                    "no more activities"
                );
                break StopReason::Exhausted;
            }
            PageOutcome::Items(items) => {
                let path = write_page(&out_dir, page, items).await?;
                match result.rate_limit_usage() {
                    Some((usage, limit)) => info!(
                        path = %path.display(),
                        activities = items.len(),
                        rate_usage = usage,
                        rate_limit = limit,
                        "wrote page"
                    ),
                    None => info!(
                        path = %path.display(),
                        activities = items.len(),
                        "wrote page"
                    ),
                }
                fetched_pages += 1;
                let Some(next) = page.checked_add(1) else {
                    warn!(page, "last representable page number reached, stopping");
                    break StopReason::PageCap;
                };
                page = next;
            }
        }
    };

    let summary = RunSummary {
        year: options.year,
        after: window.after(),
        before: window.before(),
        per_page: options.per_page,
        start_page: options.start_page,
        fetched_page_count: fetched_pages,
        generated_at: Utc::now(),
        stop_reason,
    };
    let summary_path = summary.write_to(&out_dir).await?;
    debug!(path = %summary_path.display(), "wrote run summary");

    Ok(summary)
}

fn classify_response(
    result: &FetchResult,
    page: u32,
    default_retry_after: Duration,
) -> Result<PageOutcome<'_>, FetchError> {
    match result.status {
        401 => return Err(FetchError::Unauthorized { page }),
        429 => {
            return Ok(PageOutcome::RateLimited(retry_delay(
                result.retry_after(),
                default_retry_after,
            )));
        }
        status if !result.is_success() => {
            return Err(FetchError::HttpStatus {
                page,
                status,
                snippet: result.payload.snippet(PAYLOAD_SNIPPET_CHARS),
            });
        }
        _ => {}
    }

    let Some(items) = result.payload.as_array() else {
        return Err(FetchError::UnexpectedShape {
            page,
            found: result.payload.kind(),
        });
    };

    if items.is_empty() {
        Ok(PageOutcome::Empty)
    } else {
        Ok(PageOutcome::Items(items.as_slice()))
    }
}

async fn write_page(out_dir: &Path, page: u32, items: &[Value]) -> Result<PathBuf, FetchError> {
    let path = out_dir.join(page_file_name(page));
    let json = serde_json::to_string_pretty(items)?;
    tokio::fs::write(&path, json)
        .await
        .map_err(|e| FetchError::io(&path, e))?;
    Ok(path)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::fetch::client::Payload;
    use reqwest::header::{HeaderMap, HeaderValue};
    use serde_json::json;

    fn response(status: u16, payload: Payload) -> FetchResult {
        FetchResult {
            payload,
            headers: HeaderMap::new(),
            status,
        }
    }

    #[test]
    fn test_options_defaults() {
        let options = FetchOptions::new(2025, "data/strava");
        assert_eq!(options.per_page, 200);
        assert_eq!(options.start_page, 1);
        assert_eq!(options.max_pages, 0);
        assert_eq!(options.requests_per_minute, 15);
        assert_eq!(options.default_retry_after, Duration::from_secs(10));
        assert_eq!(options.run_dir(), PathBuf::from("data/strava/2025"));
    }

    #[test]
    fn test_validate_clamps_per_page() {
        let mut options = FetchOptions::new(2025, "out");
        options.per_page = 500;
        assert_eq!(options.validate().unwrap().per_page, 200);
    }

    #[test]
    fn test_validate_rejects_zero_values() {
        let mut options = FetchOptions::new(2025, "out");
        options.per_page = 0;
        assert!(matches!(
            options.validate(),
            Err(FetchError::InvalidOption { option: "--per-page", .. })
        ));

        let mut options = FetchOptions::new(2025, "out");
        options.start_page = 0;
        assert!(matches!(
            options.validate(),
            Err(FetchError::InvalidOption { option: "--start-page", .. })
        ));

        let mut options = FetchOptions::new(2025, "out");
        options.requests_per_minute = 0;
        assert!(matches!(
            options.validate(),
            Err(FetchError::InvalidOption { option: "--rpm", .. })
        ));
    }

    #[test]
    fn test_page_file_name() {
        assert_eq!(page_file_name(1), "page_1.json");
        assert_eq!(page_file_name(42), "page_42.json");
    }

    #[test]
    fn test_classify_unauthorized_is_fatal() {
        let result = response(401, Payload::Json(json!({"message": "Authorization Error"})));
        let err = classify_response(&result, 4, DEFAULT_RETRY_AFTER).err().unwrap();
        assert!(matches!(err, FetchError::Unauthorized { page: 4 }));
    }

    #[test]
    fn test_classify_rate_limited_uses_header_or_default() {
        let result = response(429, Payload::Empty);
        assert!(matches!(
            classify_response(&result, 1, Duration::from_secs(10)).unwrap(),
            PageOutcome::RateLimited(d) if d == Duration::from_secs(10)
        ));

        let mut result = response(429, Payload::Empty);
        result
            .headers
            .insert("retry-after", HeaderValue::from_static("3"));
        assert!(matches!(
            classify_response(&result, 1, Duration::from_secs(10)).unwrap(),
            PageOutcome::RateLimited(d) if d == Duration::from_secs(3)
        ));
    }

    #[test]
    fn test_classify_server_error_carries_snippet() {
        let result = response(503, Payload::Text("maintenance".to_string()));
        let err = classify_response(&result, 2, DEFAULT_RETRY_AFTER).err().unwrap();
        match err {
            FetchError::HttpStatus {
                page,
                status,
                snippet,
            } => {
                assert_eq!(page, 2);
                assert_eq!(status, 503);
                assert_eq!(snippet, "maintenance");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_classify_non_array_success_is_shape_error() {
        let result = response(200, Payload::Json(json!({"activities": []})));
        let err = classify_response(&result, 1, DEFAULT_RETRY_AFTER).err().unwrap();
        assert!(matches!(
            err,
            FetchError::UnexpectedShape { found: "object", .. }
        ));

        let result = response(200, Payload::Empty);
        let err = classify_response(&result, 1, DEFAULT_RETRY_AFTER).err().unwrap();
        assert!(matches!(
            err,
            FetchError::UnexpectedShape { found: "empty body", .. }
        ));
    }

    #[test]
    fn test_classify_empty_and_non_empty_arrays() {
        let result = response(200, Payload::Json(json!([])));
        assert!(matches!(
            classify_response(&result, 1, DEFAULT_RETRY_AFTER).unwrap(),
            PageOutcome::Empty
        ));

        let result = response(200, Payload::Json(json!([{"id": 1}])));
        assert!(matches!(
            classify_response(&result, 1, DEFAULT_RETRY_AFTER).unwrap(),
            PageOutcome::Items(items) if items.len() == 1
        ));
    }

    #[tokio::test]
    async fn test_write_page_preserves_key_order_and_unicode() {
        let dir = tempfile::tempdir().unwrap();
        let items = vec![json!({"name": "Morning Ride ☀", "id": 7, "distance": 1.5})];

        let path = write_page(dir.path(), 3, &items).await.unwrap();

        assert_eq!(path.file_name().unwrap(), "page_3.json");
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("Morning Ride ☀"));
        let name_pos = written.find("\"name\"").unwrap();
        let id_pos = written.find("\"id\"").unwrap();
        assert!(name_pos < id_pos, "key order must be preserved: {written}");
    }
}
