//! JSON to CSV flattening.
//!
//! This module turns one or more JSON documents into a single CSV table:
//!
//! - [`rows_from_document`] normalizes a document root into records
//! - [`flatten_record`] collapses each record into one level of keys
//! - [`Table`] unifies columns across records and files and writes the CSV
//! - [`convert`] drives the whole thing from an input path
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use strava_export::flatten::convert;
//!
//! # fn example() -> Result<(), strava_export::FlattenError> {
//! let report = convert(Path::new("data/strava/2025"), None, Some("source_file"))?;
//! println!("{} rows -> {}", report.rows, report.output.display());
//! # Ok(())
//! # }
//! ```

mod columns;
mod document;
mod error;
mod export;
mod json_text;
mod record;
mod table;

pub use columns::ColumnSet;
pub use document::{json_kind, rows_from_document};
pub use error::{FlattenError, ShapeError};
pub use export::{
    ConvertReport, MERGED_CSV_FILE_NAME, collect_json_files, convert, default_output_path,
    load_document,
};
pub use json_text::to_json_text;
pub use record::{FlatRow, flatten_record, flatten_records, flatten_value, is_scalar};
pub use table::{SourceTag, Table, render_cell};
