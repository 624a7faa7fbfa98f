//! Run summary artifact (`meta.json`).

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::FetchError;
use super::constants::SUMMARY_FILE_NAME;

/// Why the fetch loop stopped without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The server returned an empty page.
    Exhausted,
    /// The `max_pages` safety cap, or the last representable page number, was reached.
    PageCap,
}

/// Description of a completed run, written once at loop termination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Calendar year fetched.
    pub year: i32,
    /// Window start (epoch seconds, inclusive).
    pub after: i64,
    /// Window end (epoch seconds).
    pub before: i64,
    /// Page size actually requested (after clamping).
    pub per_page: u32,
    /// First page requested.
    pub start_page: u32,
    /// Number of non-empty pages written.
    #[serde(rename = "fetched_pages")]
    pub fetched_page_count: u32,
    /// When the summary was produced.
    #[serde(rename = "generated_at_utc")]
    pub generated_at: DateTime<Utc>,
    /// Why the loop stopped.
    pub stop_reason: StopReason,
}

impl RunSummary {
    /// Writes the summary as pretty JSON into `dir` and returns the file path.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Io`] if the file cannot be written.
    pub async fn write_to(&self, dir: &Path) -> Result<PathBuf, FetchError> {
        let path = dir.join(SUMMARY_FILE_NAME);
        let json = serde_json::to_string_pretty(self)?;
        tokio::fs::write(&path, json)
            .await
            .map_err(|e| FetchError::io(&path, e))?;
        Ok(path)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::Value;

    fn sample() -> RunSummary {
        RunSummary {
            year: 2025,
            after: 1_735_689_600,
            before: 1_767_225_599,
            per_page: 200,
            start_page: 1,
            fetched_page_count: 2,
            generated_at: Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap(),
            stop_reason: StopReason::Exhausted,
        }
    }

    #[test]
    fn test_summary_serializes_on_disk_keys() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["fetched_pages"], 2);
        assert_eq!(value["stop_reason"], "exhausted");
        assert!(
            value["generated_at_utc"]
                .as_str()
                .unwrap()
                .starts_with("2026-01-02T03:04:05")
        );
        assert!(value.get("fetched_page_count").is_none());
    }

    #[test]
    fn test_page_cap_reason_serializes_snake_case() {
        let value = serde_json::to_value(StopReason::PageCap).unwrap();
        assert_eq!(value, Value::String("page_cap".to_string()));
    }

    #[tokio::test]
    async fn test_summary_write_to_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = sample().write_to(dir.path()).await.unwrap();
        assert_eq!(path.file_name().unwrap(), SUMMARY_FILE_NAME);

        let loaded: RunSummary =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded, sample());
    }
}
