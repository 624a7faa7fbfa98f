//! Strava Export Core Library
//!
//! This library provides the core functionality for the `strava-export` and
//! `json-csv` tools: fetching a calendar year of athlete activities from the
//! Strava API one page at a time, and flattening the resulting JSON records
//! into a single CSV table.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`config`] - Settings file and environment resolution
//! - [`fetch`] - Rate-limited, page-by-page activity retrieval
//! - [`flatten`] - Recursive JSON flattening and CSV export
//! - [`logging`] - Tracing subscriber setup shared by both binaries
//!
//! The two halves never call each other; the fetcher writes page files and
//! the flattener reads any similarly shaped JSON.

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod fetch;
pub mod flatten;
pub mod logging;
mod user_agent;

// Re-export commonly used types
pub use config::{ACCESS_TOKEN_KEY, API_BASE_KEY, ConfigError, Settings};
pub use fetch::{
    ApiClient, DEFAULT_API_BASE, FetchError, FetchOptions, FetchResult, Payload, RequestPacer,
    RunSummary, StopReason, TimeWindow, fetch_year,
};
pub use flatten::{
    ColumnSet, ConvertReport, FlatRow, FlattenError, ShapeError, Table, collect_json_files,
    convert, default_output_path, flatten_record, flatten_records, rows_from_document,
};
