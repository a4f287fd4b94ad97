//! Field-path validation helpers for untrusted JSON.
//!
//! Every helper takes the path prefix of the object it inspects so the
//! error names the exact offending field, `players[1].resources.ore`
//! rather than a generic parse failure.

use derive_more::Display;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::str::FromStr;

use super::state::Resource;

/// A structural constraint violation in untrusted input.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ValidationError {
    /// The input was not parseable as JSON at all.
    #[display("malformed JSON: {_0}")]
    MalformedJson(String),
    /// A required field was absent or null.
    #[display("missing required field '{_0}'")]
    MissingField(String),
    /// A field held a value of the wrong JSON type.
    #[display("field '{path}' must be a {expected}")]
    WrongType {
        /// Dot path of the offending field.
        path: String,
        /// Human-readable description of the expected type.
        expected: &'static str,
    },
    /// A field held a value outside its allowed set.
    #[display("field '{path}' has unknown value '{value}'")]
    UnknownValue {
        /// Dot path of the offending field.
        path: String,
        /// The rejected value, rendered for the message.
        value: String,
    },
    /// A numeric field required to be positive was zero or negative.
    #[display("field '{path}' must be a positive integer, got {value}")]
    NotPositive {
        /// Dot path of the offending field.
        path: String,
        /// The rejected number.
        value: i64,
    },
    /// A player trade omitted the counterparty.
    #[display("'target_player_id' is required when trade_type is 'player'")]
    MissingTradeTarget,
}

impl std::error::Error for ValidationError {}

/// Joins a path prefix and a key with a dot, eliding the empty prefix.
pub(crate) fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

/// Requires `value` to be a JSON object.
pub(crate) fn as_object<'a>(
    value: &'a Value,
    path: &str,
) -> Result<&'a Map<String, Value>, ValidationError> {
    value.as_object().ok_or_else(|| ValidationError::WrongType {
        path: path.to_string(),
        expected: "object",
    })
}

/// Requires `key` to be present and non-null.
pub(crate) fn require<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
    prefix: &str,
) -> Result<&'a Value, ValidationError> {
    match obj.get(key) {
        Some(value) if !value.is_null() => Ok(value),
        _ => Err(ValidationError::MissingField(join_path(prefix, key))),
    }
}

/// Requires `key` to be a string.
pub(crate) fn require_str<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
    prefix: &str,
) -> Result<&'a str, ValidationError> {
    require(obj, key, prefix)?
        .as_str()
        .ok_or_else(|| ValidationError::WrongType {
            path: join_path(prefix, key),
            expected: "string",
        })
}

/// Requires `key` to be an array.
pub(crate) fn require_array<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
    prefix: &str,
) -> Result<&'a [Value], ValidationError> {
    require(obj, key, prefix)?
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| ValidationError::WrongType {
            path: join_path(prefix, key),
            expected: "array",
        })
}

/// Like [`require_array`], but an absent or null field reads as empty.
pub(crate) fn optional_array<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
    prefix: &str,
) -> Result<&'a [Value], ValidationError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(&[]),
        Some(value) => value
            .as_array()
            .map(Vec::as_slice)
            .ok_or_else(|| ValidationError::WrongType {
                path: join_path(prefix, key),
                expected: "array",
            }),
    }
}

/// Reads `value` as a `u32`.
pub(crate) fn u32_value(value: &Value, path: &str) -> Result<u32, ValidationError> {
    value
        .as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| ValidationError::WrongType {
            path: path.to_string(),
            expected: "non-negative integer",
        })
}

/// Reads `value` as a strictly positive `u32`, reporting zero and
/// negative numbers as [`ValidationError::NotPositive`].
pub(crate) fn positive_u32_value(value: &Value, path: &str) -> Result<u32, ValidationError> {
    if let Some(n) = value.as_i64() {
        if n <= 0 {
            return Err(ValidationError::NotPositive {
                path: path.to_string(),
                value: n,
            });
        }
    }
    u32_value(value, path)
}

/// Requires `key` to be a non-negative integer fitting `u32`.
pub(crate) fn require_u32(
    obj: &Map<String, Value>,
    key: &str,
    prefix: &str,
) -> Result<u32, ValidationError> {
    u32_value(require(obj, key, prefix)?, &join_path(prefix, key))
}

/// Requires `key` to be a strictly positive integer fitting `u32`.
pub(crate) fn require_positive_u32(
    obj: &Map<String, Value>,
    key: &str,
    prefix: &str,
) -> Result<u32, ValidationError> {
    positive_u32_value(require(obj, key, prefix)?, &join_path(prefix, key))
}

/// Reads an optional non-negative integer; absent or null reads as `None`.
pub(crate) fn optional_u32(
    obj: &Map<String, Value>,
    key: &str,
    prefix: &str,
) -> Result<Option<u32>, ValidationError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => u32_value(value, &join_path(prefix, key)).map(Some),
    }
}

/// Reads an optional strictly positive integer; absent or null reads as
/// `None`.
pub(crate) fn optional_positive_u32(
    obj: &Map<String, Value>,
    key: &str,
    prefix: &str,
) -> Result<Option<u32>, ValidationError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => positive_u32_value(value, &join_path(prefix, key)).map(Some),
    }
}

/// Requires `key` to be a string naming a variant of `T`.
pub(crate) fn require_enum<T: FromStr>(
    obj: &Map<String, Value>,
    key: &str,
    prefix: &str,
) -> Result<T, ValidationError> {
    let text = require_str(obj, key, prefix)?;
    T::from_str(text).map_err(|_| ValidationError::UnknownValue {
        path: join_path(prefix, key),
        value: text.to_string(),
    })
}

/// Reads an optional enum field; absent or null reads as `None`.
pub(crate) fn optional_enum<T: FromStr>(
    obj: &Map<String, Value>,
    key: &str,
    prefix: &str,
) -> Result<Option<T>, ValidationError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => {
            let path = join_path(prefix, key);
            let text = value.as_str().ok_or_else(|| ValidationError::WrongType {
                path: path.clone(),
                expected: "string",
            })?;
            T::from_str(text)
                .map(Some)
                .map_err(|_| ValidationError::UnknownValue {
                    path,
                    value: text.to_string(),
                })
        }
    }
}

/// Reads a resource-to-count map where zero counts are tolerated.
/// Absent or null reads as an empty map.
pub(crate) fn optional_resource_counts(
    obj: &Map<String, Value>,
    key: &str,
    prefix: &str,
) -> Result<BTreeMap<Resource, u32>, ValidationError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(BTreeMap::new()),
        Some(value) => resource_counts(value, &join_path(prefix, key), false),
    }
}

/// Requires `key` to be a resource-to-count map with strictly positive
/// counts, the shape of a trade's give and receive sides.
pub(crate) fn require_positive_resource_counts(
    obj: &Map<String, Value>,
    key: &str,
    prefix: &str,
) -> Result<BTreeMap<Resource, u32>, ValidationError> {
    resource_counts(require(obj, key, prefix)?, &join_path(prefix, key), true)
}

fn resource_counts(
    value: &Value,
    path: &str,
    require_positive: bool,
) -> Result<BTreeMap<Resource, u32>, ValidationError> {
    let obj = as_object(value, path)?;
    let mut counts = BTreeMap::new();
    for (name, count_value) in obj {
        let entry_path = join_path(path, name);
        let resource =
            Resource::from_str(name).map_err(|_| ValidationError::UnknownValue {
                path: entry_path.clone(),
                value: name.clone(),
            })?;
        let count = if require_positive {
            positive_u32_value(count_value, &entry_path)?
        } else {
            u32_value(count_value, &entry_path)?
        };
        counts.insert(resource, count);
    }
    Ok(counts)
}
