// src/github/json.rs
// =============================================================================
// Field extraction helpers for untyped GitHub JSON.
//
// GitHub responses are read as serde_json::Value and the fields we need are
// pulled out one at a time. A key that is absent is a MissingField error; a
// key holding the wrong kind of value is UnexpectedType. The nullable_*
// helpers accept JSON null (GitHub sends null for unset company, location,
// hireable) but still insist that the key exists.
//
// Every helper takes the URL the value came from so the error can say which
// response was malformed.
// =============================================================================

use serde_json::Value;

use crate::error::{CensusError, CensusResult};

fn lookup<'a>(value: &'a Value, url: &str, field: &str) -> CensusResult<&'a Value> {
    value.get(field).ok_or_else(|| CensusError::MissingField {
        url: url.to_string(),
        field: field.to_string(),
    })
}

fn unexpected(url: &str, field: &str, expected: &'static str) -> CensusError {
    CensusError::UnexpectedType {
        url: url.to_string(),
        field: field.to_string(),
        expected,
    }
}

pub fn require_str<'a>(value: &'a Value, url: &str, field: &str) -> CensusResult<&'a str> {
    lookup(value, url, field)?
        .as_str()
        .ok_or_else(|| unexpected(url, field, "a string"))
}

pub fn require_u64(value: &Value, url: &str, field: &str) -> CensusResult<u64> {
    lookup(value, url, field)?
        .as_u64()
        .ok_or_else(|| unexpected(url, field, "a non-negative integer"))
}

pub fn nullable_str(value: &Value, url: &str, field: &str) -> CensusResult<Option<String>> {
    match lookup(value, url, field)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        _ => Err(unexpected(url, field, "a string or null")),
    }
}

pub fn nullable_bool(value: &Value, url: &str, field: &str) -> CensusResult<Option<bool>> {
    match lookup(value, url, field)? {
        Value::Null => Ok(None),
        Value::Bool(b) => Ok(Some(*b)),
        _ => Err(unexpected(url, field, "a boolean or null")),
    }
}

/// Interprets a whole response body as a JSON array.
///
/// GitHub list endpoints answer with a bare array; an error object in its
/// place (e.g. `{"message": "Not Found"}`) is reported as a missing list.
pub fn require_array<'a>(value: &'a Value, url: &str, what: &str) -> CensusResult<&'a [Value]> {
    match value {
        Value::Array(items) => Ok(items.as_slice()),
        Value::Object(_) => Err(CensusError::MissingField {
            url: url.to_string(),
            field: what.to_string(),
        }),
        _ => Err(unexpected(url, what, "a JSON array")),
    }
}

/// Follows a chain of object keys, returning None if any link is absent,
/// null, or not a string at the end.
pub fn optional_path<'a>(value: &'a Value, path: &[&str]) -> Option<&'a str> {
    path.iter()
        .try_fold(value, |current, key| current.get(key))
        .and_then(Value::as_str)
}
