//! Helpers for picking typed fields out of platform response bodies.

use crate::error::{PlatformError, Result};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

pub(crate) fn object(value: Value, what: &str) -> Result<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(PlatformError::Malformed(format!("{what} is not an object"))),
    }
}

pub(crate) fn string_field(map: &Map<String, Value>, key: &str) -> Result<String> {
    map.get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| PlatformError::Malformed(format!("missing field {key}")))
}

pub(crate) fn timestamp_field(map: &Map<String, Value>, key: &str) -> Result<DateTime<Utc>> {
    let raw = string_field(map, key)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|err| PlatformError::Malformed(format!("bad timestamp in {key}: {err}")))
}
