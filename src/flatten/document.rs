//! Normalizing a parsed JSON document into a list of records.

use serde_json::{Map, Value};

use super::error::ShapeError;

/// Extracts the records held by a JSON document.
///
/// Accepted roots:
/// - a list of objects
/// - an object whose `data` key holds a list of objects
/// - any other object, treated as a single record
///
/// # Errors
///
/// Returns [`ShapeError::UnsupportedRoot`] for scalar roots and
/// [`ShapeError::NonObjectRecord`] for list elements that are not objects.
pub fn rows_from_document(document: Value) -> Result<Vec<Map<String, Value>>, ShapeError> {
    match document {
        Value::Array(items) => records_from_list(items),
        Value::Object(mut object) => {
            if matches!(object.get("data"), Some(Value::Array(_)))
                && let Some(Value::Array(items)) = object.remove("data")
            {
                return records_from_list(items);
            }
            Ok(vec![object])
        }
        other => Err(ShapeError::UnsupportedRoot {
            found: json_kind(&other),
        }),
    }
}

fn records_from_list(items: Vec<Value>) -> Result<Vec<Map<String, Value>>, ShapeError> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(record) => Ok(record),
            other => Err(ShapeError::NonObjectRecord {
                index,
                found: json_kind(&other),
            }),
        })
        .collect()
}

/// JSON type name of `value`.
#[must_use]
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
