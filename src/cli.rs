//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

/// Fetch one calendar year of Strava activities, one JSON file per page.
///
/// Pages are written to `<out>/<year>/page_<n>.json`, followed by a
/// `meta.json` run summary once the server returns an empty page or the page
/// cap is reached.
#[derive(Parser, Debug)]
#[command(name = "strava-export")]
#[command(author, version, about)]
pub struct Args {
    /// Calendar year to fetch (UTC)
    pub year: i32,

    /// Output root; pages land in <OUT>/<YEAR>/
    #[arg(short, long, default_value = "data/strava")]
    pub out: PathBuf,

    /// Activities per page (values above 200 are clamped)
    #[arg(long, default_value_t = 200, value_parser = clap::value_parser!(u32).range(1..))]
    pub per_page: u32,

    /// First page number to request
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub start_page: u32,

    /// Stop after this many non-empty pages (0 = no limit)
    #[arg(long, default_value_t = 0)]
    pub max_pages: u32,

    /// Maximum requests per minute
    #[arg(long, default_value_t = 15, value_parser = clap::value_parser!(u32).range(1..))]
    pub rpm: u32,

    /// Settings file holding STRAVA_ACCESS_TOKEN (environment variables take precedence)
    #[arg(long, default_value = strava_export::config::DEFAULT_SETTINGS_FILE)]
    pub env_file: PathBuf,

    /// API base URL (overrides STRAVA_API_BASE)
    #[arg(long)]
    pub api_base: Option<String>,

    /// Per-request timeout in seconds (1-600)
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u64).range(1..=600))]
    pub timeout_secs: u64,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default_args_parses_successfully() {
        let args = Args::try_parse_from(["strava-export", "2025"]).unwrap();
        assert_eq!(args.year, 2025);
        assert_eq!(args.out, PathBuf::from("data/strava"));
        assert_eq!(args.per_page, 200);
        assert_eq!(args.start_page, 1);
        assert_eq!(args.max_pages, 0);
        assert_eq!(args.rpm, 15);
        assert_eq!(args.env_file, PathBuf::from(".env"));
        assert!(args.api_base.is_none());
        assert_eq!(args.timeout_secs, 60);
        assert_eq!(args.verbose, 0);
        assert!(!args.quiet);
    }

    #[test]
    fn test_cli_year_is_required() {
        let result = Args::try_parse_from(["strava-export"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(
            err.kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn test_cli_year_must_be_numeric() {
        let result = Args::try_parse_from(["strava-export", "last-year"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_verbose_flag_increments_count() {
        let args = Args::try_parse_from(["strava-export", "2025", "-v"]).unwrap();
        assert_eq!(args.verbose, 1);

        let args = Args::try_parse_from(["strava-export", "2025", "-vv"]).unwrap();
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_cli_quiet_flag_sets_quiet() {
        let args = Args::try_parse_from(["strava-export", "2025", "--quiet"]).unwrap();
        assert!(args.quiet);
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        let result = Args::try_parse_from(["strava-export", "--help"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_cli_invalid_flag_returns_error() {
        let result = Args::try_parse_from(["strava-export", "2025", "--invalid-flag"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }

    // ==================== Paging Tests ====================

    #[test]
    fn test_cli_paging_flags() {
        let args = Args::try_parse_from([
            "strava-export",
            "2024",
            "--per-page",
            "50",
            "--start-page",
            "3",
            "--max-pages",
            "2",
        ])
        .unwrap();
        assert_eq!(args.per_page, 50);
        assert_eq!(args.start_page, 3);
        assert_eq!(args.max_pages, 2);
    }

    #[test]
    fn test_cli_per_page_above_server_max_accepted() {
        // Clamped later, not rejected at parse time.
        let args = Args::try_parse_from(["strava-export", "2025", "--per-page", "500"]).unwrap();
        assert_eq!(args.per_page, 500);
    }

    #[test]
    fn test_cli_per_page_zero_rejected() {
        let result = Args::try_parse_from(["strava-export", "2025", "--per-page", "0"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_start_page_zero_rejected() {
        let result = Args::try_parse_from(["strava-export", "2025", "--start-page", "0"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    // ==================== Pacing Tests ====================

    #[test]
    fn test_cli_rpm_flag() {
        let args = Args::try_parse_from(["strava-export", "2025", "--rpm", "60"]).unwrap();
        assert_eq!(args.rpm, 60);
    }

    #[test]
    fn test_cli_rpm_zero_rejected() {
        let result = Args::try_parse_from(["strava-export", "2025", "--rpm", "0"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_timeout_over_max_rejected() {
        let result = Args::try_parse_from(["strava-export", "2025", "--timeout-secs", "601"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    // ==================== Settings Tests ====================

    #[test]
    fn test_cli_env_file_and_api_base() {
        let args = Args::try_parse_from([
            "strava-export",
            "2025",
            "--env-file",
            "secrets/strava.env",
            "--api-base",
            "http://localhost:9000/api/v3",
        ])
        .unwrap();
        assert_eq!(args.env_file, PathBuf::from("secrets/strava.env"));
        assert_eq!(
            args.api_base.as_deref(),
            Some("http://localhost:9000/api/v3")
        );
    }
}
