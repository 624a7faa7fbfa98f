//! Constants for the fetch module (API endpoint, paging limits, timeouts).

use std::time::Duration;

/// Default Strava API v3 base URL.
pub const DEFAULT_API_BASE: &str = "https://www.strava.com/api/v3";

/// Path of the athlete activities list endpoint, relative to the API base.
pub const ACTIVITIES_PATH: &str = "athlete/activities";

/// Server-documented maximum page size for the activities endpoint.
pub const MAX_PER_PAGE: u32 = 200;

/// Default requests-per-minute budget.
pub const DEFAULT_REQUESTS_PER_MINUTE: u32 = 15;

/// Backoff applied to a 429 response without a usable Retry-After header.
pub const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(10);

/// Default HTTP connect timeout (10 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default per-request ceiling (60 seconds). Exceeding it is fatal.
pub const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Maximum number of payload characters quoted in error messages.
pub const PAYLOAD_SNIPPET_CHARS: usize = 200;

/// Response header carrying the current rate-limit usage.
pub const RATE_LIMIT_USAGE_HEADER: &str = "X-RateLimit-Usage";

/// Response header carrying the rate-limit ceiling.
pub const RATE_LIMIT_LIMIT_HEADER: &str = "X-RateLimit-Limit";

/// File name of the run summary written at the end of a run.
pub const SUMMARY_FILE_NAME: &str = "meta.json";
