//! Host responses come either as a bare array or wrapped as `{"data": [...]}`.

use folio_core::{RawRecord, is_present};
use serde_json::Value;

use crate::error::FetchError;

/// Pull the record list out of a host response.
///
/// A present `data` field wins; otherwise the response itself is the list.
pub fn unwrap_records(response: Value) -> Result<Vec<RawRecord>, FetchError> {
    let list = match response {
        Value::Object(mut map) => match map.remove("data") {
            Some(data) if is_present(&data) => data,
            Some(data) => {
                map.insert("data".to_string(), data);
                Value::Object(map)
            }
            None => Value::Object(map),
        },
        other => other,
    };

    match list {
        Value::Array(items) => Ok(items.into_iter().map(RawRecord::from).collect()),
        other => Err(FetchError::UnexpectedShape(json_type_name(&other))),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
