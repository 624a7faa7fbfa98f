//! File-level conversion: discover JSON inputs, merge them, write one CSV.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info, instrument};

use super::error::FlattenError;
use super::table::{SourceTag, Table};

/// File name used for the merged CSV when the input is a directory.
pub const MERGED_CSV_FILE_NAME: &str = "merged.csv";

/// Outcome of a successful [`convert`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertReport {
    /// Where the CSV was written.
    pub output: PathBuf,
    /// Data rows written (header excluded).
    pub rows: usize,
    /// Input files read.
    pub files: usize,
    /// Columns in the header.
    pub columns: usize,
}

/// Resolves the input path into the ordered list of files to read.
///
/// A regular file is returned as-is. A directory yields its `*.json` regular
/// files (non-recursive) sorted by path.
///
/// # Errors
///
/// - [`FlattenError::InputNotFound`] if the path is neither a file nor a directory
/// - [`FlattenError::NoJsonFiles`] if a directory holds no `*.json` files
/// - [`FlattenError::Io`] if the directory cannot be listed
pub fn collect_json_files(input: &Path) -> Result<Vec<PathBuf>, FlattenError> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }
    if !input.is_dir() {
        return Err(FlattenError::InputNotFound {
            path: input.to_path_buf(),
        });
    }

    let entries = fs::read_dir(input).map_err(|e| FlattenError::io(input, e))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| FlattenError::io(input, e))?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }

    if files.is_empty() {
        return Err(FlattenError::NoJsonFiles {
            path: input.to_path_buf(),
        });
    }

    files.sort();
    debug!(count = files.len(), dir = %input.display(), "collected JSON files");
    Ok(files)
}

/// Default CSV location for `input`.
///
/// A file maps to the same path with a `.csv` extension; anything else maps
/// to `merged.csv` inside it.
#[must_use]
pub fn default_output_path(input: &Path) -> PathBuf {
    if input.is_file() {
        input.with_extension("csv")
    } else {
        input.join(MERGED_CSV_FILE_NAME)
    }
}

/// Reads and parses one JSON file.
///
/// # Errors
///
/// Returns [`FlattenError::Io`] if the file cannot be read and
/// [`FlattenError::Parse`] if it is not valid JSON.
pub fn load_document(path: &Path) -> Result<Value, FlattenError> {
    let raw = fs::read_to_string(path).map_err(|e| FlattenError::io(path, e))?;
    serde_json::from_str(&raw).map_err(|source| FlattenError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Flattens every JSON file under `input` into a single CSV.
///
/// Files are processed in [`collect_json_files`] order. With `source_column`,
/// each row records the file name it came from. Any unreadable, invalid or
/// oddly shaped file aborts the conversion before the output is written.
///
/// # Errors
///
/// Returns the first [`FlattenError`] encountered.
#[instrument(skip_all, fields(input = %input.display()))]
pub fn convert(
    input: &Path,
    output: Option<&Path>,
    source_column: Option<&str>,
) -> Result<ConvertReport, FlattenError> {
    let files = collect_json_files(input)?;
    let output = output.map_or_else(|| default_output_path(input), Path::to_path_buf);

    let mut table = Table::new();
    for path in &files {
        let document = load_document(path)?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let source = source_column.map(|column| SourceTag {
            column,
            file_name: &file_name,
        });

        let added = table
            .add_document(document, source)
            .map_err(|source| FlattenError::Shape {
                path: path.clone(),
                source,
            })?;
        debug!(file = %path.display(), rows = added, "flattened file");
    }

    table.write_csv_file(&output)?;

    let report = ConvertReport {
        output,
        rows: table.len(),
        files: files.len(),
        columns: table.columns().len(),
    };
    info!(
        rows = report.rows,
        files = report.files,
        columns = report.columns,
        output = %report.output.display(),
        "CSV written"
    );
    Ok(report)
}
