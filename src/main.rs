//! CLI entry point for the Strava yearly activity fetcher.

use anyhow::{Context, Result};
use clap::Parser;
use strava_export::fetch::constants::CONNECT_TIMEOUT_SECS;
use strava_export::fetch::min_interval_for_rpm;
use strava_export::{
    ApiClient, DEFAULT_API_BASE, FetchError, FetchOptions, Settings, fetch_year, logging,
};
use tracing::{debug, info};

mod cli;

use cli::Args;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();
    logging::init(args.verbose, args.quiet);
    debug!(?args, "CLI arguments parsed");

    // Everything that can be rejected is checked before any network or disk I/O.
    let options = FetchOptions {
        per_page: args.per_page,
        start_page: args.start_page,
        max_pages: args.max_pages,
        requests_per_minute: args.rpm,
        ..FetchOptions::new(args.year, &args.out)
    }
    .validate()
    .map_err(with_hint)?;

    let settings = Settings::resolve(Some(args.env_file.as_path()), std::env::vars())
        .context("failed to load settings")?;
    let token = settings.access_token()?;

    let api_base = args
        .api_base
        .as_deref()
        .or_else(|| settings.api_base())
        .unwrap_or(DEFAULT_API_BASE);

    let client = ApiClient::with_timeouts(api_base, token, CONNECT_TIMEOUT_SECS, args.timeout_secs)
        .map_err(with_hint)?;

    info!(
        year = options.year,
        per_page = options.per_page,
        start_page = options.start_page,
        rpm = options.requests_per_minute,
        min_interval_ms = min_interval_for_rpm(options.requests_per_minute).as_millis(),
        out = %options.run_dir().display(),
        "Strava export starting"
    );

    let summary = fetch_year(&client, &options).await.map_err(with_hint)?;

    info!(
        year = summary.year,
        pages = summary.fetched_page_count,
        stop_reason = ?summary.stop_reason,
        out = %options.run_dir().display(),
        "Export complete"
    );

    Ok(())
}

/// Points configuration failures (raised before any request) at flags and settings.
fn with_hint(error: FetchError) -> anyhow::Error {
    if error.is_configuration() {
        anyhow::Error::new(error)
            .context("invalid configuration: check command-line flags and STRAVA_API_BASE")
    } else {
        error.into()
    }
}
