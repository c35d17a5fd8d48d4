//! Payload extraction from response bodies
//!
//! Selects the part of a response body that gets sampled or validated.
//! Simple dot paths (`data`, `$.data.items[0]`, `items[-1]`) are resolved
//! directly; paths with wildcards go through jsonpath-rust.

use crate::error::{Error, Result};
use serde::Serialize;
use serde_json::Value;

/// Parse a response body as JSON
pub fn parse_body(body: &str) -> Result<Value> {
    serde_json::from_str(body).map_err(Error::from)
}

/// Select the payload at `path`, or the whole body when no path is given
pub fn extract_payload(body: &Value, path: Option<&str>) -> Result<Value> {
    let Some(path) = path.filter(|p| !p.is_empty() && *p != "$") else {
        return Ok(body.clone());
    };

    let payload = if path.contains('*') && !path.contains("[-") {
        extract_with_jsonpath(body, path)?
    } else {
        extract_simple_path(body, path)
    };

    let payload = payload.ok_or_else(|| Error::extraction(path, "path matched nothing"))?;
    tracing::debug!(path, "Extracted payload");
    Ok(payload)
}

/// Check whether a payload carries nothing to sample
pub fn is_empty_payload(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(arr) => arr.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Shape overview of a response body, printed alongside a check
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResponseSummary {
    /// Raw body length
    pub size_bytes: usize,
    /// Length of the `data` array, or of a top-level array
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_items: Option<usize>,
    /// Keys of the first item when it is an object
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_item_keys: Option<Vec<String>>,
    /// Keys of a body without a `data` member
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_level_keys: Option<Vec<String>>,
}

impl ResponseSummary {
    /// Summarize a parsed body; `raw` is the text it was parsed from
    pub fn of(raw: &str, body: &Value) -> Self {
        let mut summary = Self {
            size_bytes: raw.len(),
            ..Self::default()
        };

        let items = match body {
            Value::Object(map) => match map.get("data") {
                Some(Value::Array(items)) => Some(items),
                Some(_) => None,
                None => {
                    summary.top_level_keys = Some(map.keys().cloned().collect());
                    None
                }
            },
            Value::Array(items) => Some(items),
            _ => None,
        };

        if let Some(items) = items {
            summary.data_items = Some(items.len());
            if let Some(Value::Object(first)) = items.first() {
                summary.first_item_keys = Some(first.keys().cloned().collect());
            }
        }
        summary
    }
}

impl std::fmt::Display for ResponseSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Response summary:")?;
        write!(f, "  Response size: {} bytes", self.size_bytes)?;
        if let Some(count) = self.data_items {
            write!(f, "\n  Data items: {count}")?;
        }
        if let Some(keys) = &self.first_item_keys {
            write!(f, "\n  First item keys: {}", keys.join(", "))?;
        }
        if let Some(keys) = &self.top_level_keys {
            write!(f, "\n  Top level keys: {}", keys.join(", "))?;
        }
        Ok(())
    }
}

/// Extract a value using simple dot-notation path
fn extract_simple_path(value: &Value, path: &str) -> Option<Value> {
    let path = path.strip_prefix("$.").unwrap_or(path);

    let mut current = value;
    for part in path.split('.') {
        // Handle array indexing like "data[0]" or "items[-1]"
        if let Some(bracket_pos) = part.find('[') {
            let name = &part[..bracket_pos];
            let index_str = part[bracket_pos + 1..].strip_suffix(']')?;

            if !name.is_empty() {
                current = current.get(name)?;
            }

            let index = index_str.parse::<i64>().ok()?;
            let Value::Array(arr) = current else {
                return None;
            };
            let idx = if index < 0 {
                arr.len().checked_sub(usize::try_from(index.unsigned_abs()).ok()?)?
            } else {
                usize::try_from(index).ok()?
            };
            current = arr.get(idx)?;
        } else {
            current = current.get(part)?;
        }
    }

    Some(current.clone())
}

/// Extract matches using jsonpath-rust; the result is always an array
fn extract_with_jsonpath(value: &Value, path: &str) -> Result<Option<Value>> {
    use jsonpath_rust::JsonPath;

    let jp = JsonPath::try_from(path).map_err(|e| Error::JsonPath {
        message: format!("Invalid JSONPath: {e}"),
    })?;

    match jp.find(value) {
        Value::Null => Ok(None),
        Value::Array(arr) if arr.is_empty() => Ok(None),
        Value::Array(arr) => Ok(Some(Value::Array(arr))),
        other => Ok(Some(Value::Array(vec![other]))),
    }
}
