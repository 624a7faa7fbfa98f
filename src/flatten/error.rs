//! Error types for the flatten module.

use std::path::PathBuf;

use thiserror::Error;

/// A JSON document or record whose shape cannot be turned into rows.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShapeError {
    /// The document root is neither a list nor an object.
    #[error("unsupported JSON root type: {found}")]
    UnsupportedRoot {
        /// JSON type found at the root.
        found: &'static str,
    },

    /// A list element is not an object.
    #[error("record {index} is a JSON {found}, expected an object")]
    NonObjectRecord {
        /// Zero-based position in the list.
        index: usize,
        /// JSON type found.
        found: &'static str,
    },
}

/// Errors produced while converting JSON files to CSV.
#[derive(Debug, Error)]
pub enum FlattenError {
    /// The input path is neither a file nor a directory.
    #[error("input path not found: {path}")]
    InputNotFound {
        /// The missing path.
        path: PathBuf,
    },

    /// The input directory has no `*.json` files.
    #[error("no .json files found in folder: {path}")]
    NoJsonFiles {
        /// The directory that was scanned.
        path: PathBuf,
    },

    /// File system error while reading input or writing output.
    #[error("IO error on {path}: {source}")]
    Io {
        /// The file or directory path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// An input file is not valid JSON.
    #[error("invalid JSON in {path}: {source}")]
    Parse {
        /// The input file.
        path: PathBuf,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// An input file parsed, but its shape is unsupported.
    #[error("unexpected JSON shape in {path}: {source}")]
    Shape {
        /// The input file.
        path: PathBuf,
        /// What was wrong with it.
        #[source]
        source: ShapeError,
    },

    /// The CSV writer failed.
    #[error("CSV error writing {path}: {source}")]
    Csv {
        /// The output file.
        path: PathBuf,
        /// The underlying CSV error.
        #[source]
        source: csv::Error,
    },
}

impl FlattenError {
    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
