//! Recursive flattening of JSON records into flat rows.
//!
//! Nested keys are joined with `_`. Lists of scalars expand positionally
//! (`laps_0`, `laps_1`, ...); lists holding any object or list are kept whole
//! as JSON text under their own key.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use strava_export::flatten::flatten_record;
//!
//! let record = json!({"a": {"b": 1, "c": [1, 2]}});
//! let row = flatten_record(record.as_object().unwrap());
//! let keys: Vec<&str> = row.keys().map(String::as_str).collect();
//! assert_eq!(keys, ["a_b", "a_c_0", "a_c_1"]);
//! ```

use serde_json::{Map, Value};

use super::columns::ColumnSet;
use super::json_text::to_json_text;

/// One flattened record: key path to scalar value (or JSON text), in insertion order.
pub type FlatRow = Map<String, Value>;

/// Returns true for null, booleans, numbers and strings.
#[must_use]
pub fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Array(_) | Value::Object(_))
}

/// Flattens `value` into `out` under the key path `prefix`.
pub fn flatten_value(value: &Value, prefix: &str, out: &mut FlatRow) {
    match value {
        Value::Object(entries) => {
            for (key, nested) in entries {
                let nested_prefix = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}_{key}")
                };
                flatten_value(nested, &nested_prefix, out);
            }
        }
        Value::Array(items) if items.iter().all(is_scalar) => {
            for (index, item) in items.iter().enumerate() {
                out.insert(format!("{prefix}_{index}"), item.clone());
            }
        }
        Value::Array(_) => {
            out.insert(prefix.to_string(), Value::String(to_json_text(value)));
        }
        scalar => {
            out.insert(prefix.to_string(), scalar.clone());
        }
    }
}

/// Flattens one record, using each top-level key as the initial prefix.
#[must_use]
pub fn flatten_record(record: &Map<String, Value>) -> FlatRow {
    let mut out = FlatRow::new();
    for (key, value) in record {
        flatten_value(value, key, &mut out);
    }
    out
}

/// Flattens every record and collects the columns in first-seen order.
#[must_use]
pub fn flatten_records(records: &[Map<String, Value>]) -> (Vec<FlatRow>, ColumnSet) {
    let mut columns = ColumnSet::new();
    let rows = records
        .iter()
        .map(|record| {
            let row = flatten_record(record);
            columns.extend(row.keys());
            row
        })
        .collect();
    (rows, columns)
}
