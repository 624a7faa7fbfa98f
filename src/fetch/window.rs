//! Calendar-year time window in epoch seconds.

use chrono::NaiveDate;

use super::FetchError;

/// UTC-anchored epoch-second bounds for one calendar year.
///
/// `after` is the first second of the year and `before` is the last second,
/// one second before the next year starts. `after < before` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    year: i32,
    after: i64,
    before: i64,
}

impl TimeWindow {
    /// Computes the window for `year`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidOption`] when the year (or the following
    /// one) cannot be represented as a UTC date.
    ///
    /// # Examples
    ///
    /// ```
    /// use strava_export::fetch::TimeWindow;
    ///
    /// let window = TimeWindow::for_year(2025).unwrap();
    /// assert_eq!(window.after(), 1_735_689_600);
    /// assert_eq!(window.before(), 1_767_225_599);
    /// ```
    pub fn for_year(year: i32) -> Result<Self, FetchError> {
        let out_of_range = || FetchError::invalid_option("year", format!("{year} is out of range"));

        let after = year_start_epoch(year).ok_or_else(out_of_range)?;
        let next_start = year
            .checked_add(1)
            .and_then(year_start_epoch)
            .ok_or_else(out_of_range)?;

        Ok(Self {
            year,
            after,
            before: next_start - 1,
        })
    }

    /// The calendar year this window covers.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Start of the year, inclusive.
    #[must_use]
    pub fn after(&self) -> i64 {
        self.after
    }

    /// Last second of the year.
    #[must_use]
    pub fn before(&self) -> i64 {
        self.before
    }
}

fn year_start_epoch(year: i32) -> Option<i64> {
    NaiveDate::from_ymd_opt(year, 1, 1)?
        .and_hms_opt(0, 0, 0)
        .map(|start| start.and_utc().timestamp())
}
