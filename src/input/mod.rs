//! Inventory decoding.
//!
//! Keys are matched case-insensitively: the document is read into a
//! `serde_json::Value`, every object key is folded to ASCII lowercase, and
//! only then mapped onto [`Resource`]. Absent or `null` members take the
//! model's defaults, so the only failures are structural ones. When a
//! resource carries both `cloud_specific` and its legacy spelling
//! `azure_specific`, the former wins unless it is `null`.

use std::fmt;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::core::Resource;

const CLOUD_KEY: &str = "cloud_specific";
const LEGACY_CLOUD_KEY: &str = "azure_specific";

#[derive(Debug)]
pub enum ParseError {
    /// The bytes are not UTF-8 text.
    Encoding(std::str::Utf8Error),
    /// The text is not valid JSON.
    Syntax(serde_json::Error),
    /// Valid JSON that does not describe an inventory.
    Shape(serde_json::Error),
    /// The document is the literal `null`.
    EmptyDocument,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Encoding(err) => write!(f, "inventory is not UTF-8 text: {err}"),
            ParseError::Syntax(err) => write!(f, "inventory is not valid JSON: {err}"),
            ParseError::Shape(err) => write!(f, "inventory has an unexpected shape: {err}"),
            ParseError::EmptyDocument => f.write_str("inventory document is null"),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Encoding(err) => Some(err),
            ParseError::Syntax(err) | ParseError::Shape(err) => Some(err),
            ParseError::EmptyDocument => None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawInventory {
    #[serde(deserialize_with = "null_as_empty")]
    resources: Vec<Resource>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Resource>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<Resource>>::deserialize(deserializer)?.unwrap_or_default())
}

pub fn parse(raw: &str) -> Result<Vec<Resource>, ParseError> {
    parse_bytes(raw.as_bytes())
}

/// Like [`parse`], for input read straight from a file or pipe.
pub fn parse_bytes(raw: &[u8]) -> Result<Vec<Resource>, ParseError> {
    let result = decode(raw);
    match &result {
        Ok(resources) => tracing::debug!(resources = resources.len(), "inventory parsed"),
        Err(err) => tracing::warn!(error = %err, "inventory could not be parsed"),
    }
    result
}

fn decode(raw: &[u8]) -> Result<Vec<Resource>, ParseError> {
    let text = std::str::from_utf8(raw).map_err(ParseError::Encoding)?;
    let value: Value = serde_json::from_str(text).map_err(ParseError::Syntax)?;
    if value.is_null() {
        return Err(ParseError::EmptyDocument);
    }
    if !value.is_object() {
        return Err(ParseError::Shape(serde::de::Error::custom(
            "expected an object with a `resources` list",
        )));
    }
    let mut value = fold_keys(value);
    merge_legacy_cloud_key(&mut value);
    let inventory: RawInventory = serde_json::from_value(value).map_err(ParseError::Shape)?;
    Ok(inventory.resources)
}

fn merge_legacy_cloud_key(inventory: &mut Value) {
    let Some(resources) = inventory.get_mut("resources").and_then(Value::as_array_mut) else {
        return;
    };
    for resource in resources.iter_mut().filter_map(Value::as_object_mut) {
        let Some(legacy) = resource.remove(LEGACY_CLOUD_KEY) else {
            continue;
        };
        if resource.get(CLOUD_KEY).is_none_or(Value::is_null) {
            resource.insert(CLOUD_KEY.to_string(), legacy);
        }
    }
}

fn fold_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut folded = Map::with_capacity(map.len());
            for (key, v) in map {
                folded.insert(key.to_ascii_lowercase(), fold_keys(v));
            }
            Value::Object(folded)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(fold_keys).collect()),
        other => other,
    }
}
