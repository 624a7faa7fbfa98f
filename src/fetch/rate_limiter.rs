//! Request pacing for the activities API.
//!
//! This module provides the [`RequestPacer`] struct which enforces a minimum
//! interval between outbound requests, derived from a requests-per-minute
//! budget, and the helpers that turn a 429 response into a backoff delay.
//!
//! # Overview
//!
//! The pacer holds an explicit deadline (`next_allowed`). Before each request
//! the caller waits for that deadline; after each attempt, successful or not,
//! the deadline is moved to `now + min_interval`. There are no timers or
//! callbacks, so the whole loop stays single-threaded and runs unchanged under
//! tokio's paused test clock.
//!
//! # Example
//!
//! ```
//! use strava_export::fetch::RequestPacer;
//!
//! # async fn example() {
//! // 15 requests per minute -> one request every 4 seconds
//! let mut pacer = RequestPacer::per_minute(15);
//!
//! // First request proceeds immediately
//! pacer.wait_turn().await;
//! pacer.mark_attempt();
//!
//! // Second request waits until the deadline
//! pacer.wait_turn().await;
//! pacer.mark_attempt();
//! # }
//! ```

use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, instrument, warn};

/// Warning threshold for cumulative 429 backoff in one run (2 minutes).
const CUMULATIVE_BACKOFF_WARNING_THRESHOLD: Duration = Duration::from_secs(120);

/// Deadline-based pacer for sequential requests.
#[derive(Debug)]
pub struct RequestPacer {
    /// Minimum time between the end of one attempt and the start of the next.
    min_interval: Duration,

    /// Earliest instant the next request may start.
    /// `None` until the first attempt (first request is immediate).
    next_allowed: Option<Instant>,

    /// Total time spent sleeping on server-mandated backoff.
    cumulative_backoff: Duration,
}

impl RequestPacer {
    /// Creates a pacer with the specified minimum interval.
    #[must_use]
    #[instrument(skip_all, fields(interval_ms = min_interval.as_millis()))]
    pub fn new(min_interval: Duration) -> Self {
        debug!("creating request pacer");
        Self {
            min_interval,
            next_allowed: None,
            cumulative_backoff: Duration::ZERO,
        }
    }

    /// Creates a pacer allowing `requests_per_minute` requests per minute.
    ///
    /// A budget of zero is treated as one request per minute.
    ///
    /// # Example
    ///
    /// ```
    /// use std::time::Duration;
    /// use strava_export::fetch::RequestPacer;
    ///
    /// let pacer = RequestPacer::per_minute(15);
    /// assert_eq!(pacer.min_interval(), Duration::from_secs(4));
    /// ```
    #[must_use]
    pub fn per_minute(requests_per_minute: u32) -> Self {
        Self::new(min_interval_for_rpm(requests_per_minute))
    }

    /// Returns the minimum interval between requests.
    #[must_use]
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Returns the current deadline, if any attempt has been made.
    #[must_use]
    pub fn next_allowed(&self) -> Option<Instant> {
        self.next_allowed
    }

    /// Returns the total backoff slept so far.
    #[must_use]
    pub fn cumulative_backoff(&self) -> Duration {
        self.cumulative_backoff
    }

    /// Sleeps until the next request is allowed and returns how long it waited.
    pub async fn wait_turn(&self) -> Duration {
        let Some(deadline) = self.next_allowed else {
            debug!("first request - no delay");
            return Duration::ZERO;
        };

        let now = Instant::now();
        if now >= deadline {
            return Duration::ZERO;
        }

        let delay = deadline - now;
        debug!(delay_ms = delay.as_millis(), "applying rate limit delay");
        tokio::time::sleep_until(deadline).await;
        delay
    }

    /// Records a request attempt, pushing the deadline to `now + min_interval`.
    pub fn mark_attempt(&mut self) {
        self.next_allowed = Some(Instant::now() + self.min_interval);
    }

    /// Sleeps for a server-mandated delay, then records a fresh attempt.
    #[instrument(skip(self), fields(delay_secs = delay.as_secs_f64()))]
    pub async fn back_off(&mut self, delay: Duration) {
        self.cumulative_backoff += delay;

        if self.cumulative_backoff >= CUMULATIVE_BACKOFF_WARNING_THRESHOLD {
            warn!(
                cumulative_secs = self.cumulative_backoff.as_secs(),
                "excessive server rate limiting - consider lowering --rpm"
            );
        }

        tokio::time::sleep(delay).await;
        self.mark_attempt();
    }
}

/// Converts a requests-per-minute budget into a minimum interval (`60 / rpm` seconds).
#[must_use]
pub fn min_interval_for_rpm(requests_per_minute: u32) -> Duration {
    Duration::from_secs_f64(60.0 / f64::from(requests_per_minute.max(1)))
}

/// Parses a Retry-After header value given as whole seconds.
///
/// Only plain non-negative integers are accepted; HTTP-dates, signs, fractions
/// and surrounding garbage yield `None`.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use strava_export::fetch::parse_retry_after;
///
/// assert_eq!(parse_retry_after("120"), Some(Duration::from_secs(120)));
/// assert_eq!(parse_retry_after("0"), Some(Duration::ZERO));
/// assert_eq!(parse_retry_after("soon"), None);
/// ```
#[must_use]
pub fn parse_retry_after(header_value: &str) -> Option<Duration> {
    let header_value = header_value.trim();
    if header_value.is_empty() || !header_value.bytes().all(|b| b.is_ascii_digit()) {
        debug!(header_value, "unparseable Retry-After value");
        return None;
    }
    header_value.parse::<u64>().ok().map(Duration::from_secs)
}

/// Chooses the 429 backoff: the Retry-After value when usable, else `default`.
#[must_use]
pub fn retry_delay(header_value: Option<&str>, default: Duration) -> Duration {
    header_value.and_then(parse_retry_after).unwrap_or(default)
}
