//! Accumulating flattened rows from many documents and writing them as CSV.

use std::borrow::Cow;
use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::Path;

use csv::{Terminator, WriterBuilder};
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use super::columns::ColumnSet;
use super::document::rows_from_document;
use super::error::{FlattenError, ShapeError};
use super::json_text::to_json_text;
use super::record::{FlatRow, flatten_records};

/// Tags every row of a document with the name of the file it came from.
#[derive(Debug, Clone, Copy)]
pub struct SourceTag<'a> {
    /// Column that receives the file name.
    pub column: &'a str,
    /// File name written into that column.
    pub file_name: &'a str,
}

/// Flattened rows from one or more documents, with their unified columns.
///
/// Documents must be added in the order their rows should appear; column
/// order follows first occurrence across that sequence.
#[derive(Debug, Clone, Default)]
pub struct Table {
    rows: Vec<FlatRow>,
    columns: ColumnSet,
}

impl Table {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flattens `records` and appends them.
    ///
    /// With a `source` tag, each row gets the file name under the tag's column
    /// (replacing any flattened value of the same name), and the column is
    /// registered after this batch's own columns even when `records` is empty.
    pub fn add_records(&mut self, records: &[Map<String, Value>], source: Option<SourceTag<'_>>) {
        let (mut rows, mut columns) = flatten_records(records);

        if let Some(tag) = source {
            for row in &mut rows {
                row.insert(tag.column.to_string(), Value::String(tag.file_name.to_string()));
            }
            columns.insert(tag.column);
        }

        self.columns.extend(columns.iter());
        self.rows.extend(rows);
    }

    /// Normalizes a parsed document into records and appends them.
    ///
    /// Returns the number of rows added.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError`] if the document root or one of its records has
    /// an unsupported shape; the table is left unchanged in that case.
    pub fn add_document(
        &mut self,
        document: Value,
        source: Option<SourceTag<'_>>,
    ) -> Result<usize, ShapeError> {
        let records = rows_from_document(document)?;
        self.add_records(&records, source);
        Ok(records.len())
    }

    /// Flattened rows in insertion order.
    #[must_use]
    pub fn rows(&self) -> &[FlatRow] {
        &self.rows
    }

    /// Unified columns in first-seen order.
    #[must_use]
    pub fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true when no rows have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Writes the header and all rows as CSV.
    ///
    /// Cells for columns a row lacks are empty. With no columns at all,
    /// nothing is written.
    ///
    /// # Errors
    ///
    /// Returns [`csv::Error`] if writing to `writer` fails.
    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut writer = WriterBuilder::new()
            .terminator(Terminator::CRLF)
            .from_writer(writer);

        if self.columns.is_empty() {
            writer.flush()?;
            return Ok(());
        }

        writer.write_record(self.columns.iter())?;
        for row in &self.rows {
            writer.write_record(
                self.columns
                    .iter()
                    .map(|column| render_cell(row.get(column)).into_owned()),
            )?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Writes the CSV to `path`, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns [`FlattenError::Io`] if the file or its parent directory
    /// cannot be created, and [`FlattenError::Csv`] if writing fails.
    #[instrument(skip(self), fields(rows = self.rows.len(), columns = self.columns.len()))]
    pub fn write_csv_file(&self, path: &Path) -> Result<(), FlattenError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| FlattenError::io(parent, e))?;
        }

        let file = File::create(path).map_err(|e| FlattenError::io(path, e))?;
        self.write_csv(BufWriter::new(file))
            .map_err(|source| FlattenError::Csv {
                path: path.to_path_buf(),
                source,
            })?;

        debug!(path = %path.display(), "wrote CSV");
        Ok(())
    }
}

/// Renders one CSV cell.
///
/// Missing values and null are empty; strings are written raw; numbers and
/// booleans use their JSON spelling. Booleans are therefore lowercase
/// `true`/`false`, not the Python-style `True`/`False`.
#[must_use]
pub fn render_cell(value: Option<&Value>) -> Cow<'_, str> {
    match value {
        None | Some(Value::Null) => Cow::Borrowed(""),
        Some(Value::String(text)) => Cow::Borrowed(text.as_str()),
        Some(Value::Bool(true)) => Cow::Borrowed("true"),
        Some(Value::Bool(false)) => Cow::Borrowed("false"),
        Some(Value::Number(number)) => Cow::Owned(number.to_string()),
        Some(nested) => Cow::Owned(to_json_text(nested)),
    }
}
