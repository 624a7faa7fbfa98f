//! Rate-limited, page-by-page retrieval of a year of Strava activities.
//!
//! This module provides the fetch half of the crate: an authenticated API
//! client, a deadline-based request pacer, and the [`fetch_year`] loop that
//! writes one JSON file per page plus a run summary.
//!
//! # Features
//!
//! - Calendar-year time window in UTC epoch seconds
//! - Minimum spacing between requests from a requests-per-minute budget
//! - HTTP 429 handling with Retry-After (or a 10 second default), unbounded retries
//! - Fail-fast on 401, other non-2xx statuses and non-array payloads
//! - Structured error types with full context
//!
//! # Example
//!
//! ```no_run
//! use strava_export::fetch::{ApiClient, DEFAULT_API_BASE, FetchOptions, fetch_year};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ApiClient::new(DEFAULT_API_BASE, "token")?;
//! let options = FetchOptions::new(2025, "data/strava");
//! let summary = fetch_year(&client, &options).await?;
//! println!("Fetched {} page(s)", summary.fetched_page_count);
//! # Ok(())
//! # }
//! ```

mod client;
pub mod constants;
mod engine;
mod error;
pub mod rate_limiter;
mod summary;
mod window;

pub use client::{ApiClient, FetchResult, Payload};
pub use constants::{DEFAULT_API_BASE, DEFAULT_RETRY_AFTER, MAX_PER_PAGE};
pub use engine::{FetchOptions, fetch_year, page_file_name};
pub use error::FetchError;
pub use rate_limiter::{RequestPacer, min_interval_for_rpm, parse_retry_after, retry_delay};
pub use summary::{RunSummary, StopReason};
pub use window::TimeWindow;
