//! Normalization of raw search descriptions into stored form
//!
//! Search types and string parameter values are trimmed and lowercased.
//! Parameters land in a [`SearchParams`], whose keys are held in ascending
//! lexicographic order. Normalizing an already-normalized event is a no-op.

use crate::error::{CinelogError, Result};
use crate::types::{ParamValue, SearchParams};
use serde_json::Value;
use tracing::debug;

/// Trim and lowercase a search type
pub fn normalize_search_type(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Normalize a single parameter value
///
/// Strings are trimmed and lowercased; integers pass through. Floats pass
/// through unless they are NaN or infinite, which no document store can
/// hold faithfully.
pub fn normalize_value(key: &str, value: ParamValue) -> Result<ParamValue> {
    match value {
        ParamValue::Text(s) => Ok(ParamValue::Text(s.trim().to_lowercase())),
        ParamValue::Integer(i) => Ok(ParamValue::Integer(i)),
        ParamValue::Float(x) if x.is_finite() => Ok(ParamValue::Float(x)),
        ParamValue::Float(x) => Err(CinelogError::malformed(format!(
            "parameter '{}' is not a finite number: {}",
            key, x
        ))),
    }
}

/// Normalize a parameter list into its canonical ascending-key mapping
///
/// A key supplied twice is rejected rather than silently overwritten.
pub fn normalize_parameters<I, K>(parameters: I) -> Result<SearchParams>
where
    I: IntoIterator<Item = (K, ParamValue)>,
    K: Into<String>,
{
    let mut normalized = SearchParams::new();
    for (key, value) in parameters {
        let key = key.into();
        let value = normalize_value(&key, value)?;
        if normalized.insert(key.clone(), value).is_some() {
            return Err(CinelogError::malformed(format!(
                "parameter '{}' supplied more than once",
                key
            )));
        }
    }

    debug!(
        "Normalized {} search parameters: {:?}",
        normalized.len(),
        normalized.keys().collect::<Vec<_>>()
    );
    Ok(normalized)
}

/// Re-normalize an already stored parameter mapping
pub fn renormalize(parameters: &SearchParams) -> Result<SearchParams> {
    normalize_parameters(
        parameters
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone())),
    )
}

/// Convert a loosely typed JSON object into scalar parameters
///
/// Only strings and numbers are accepted. Objects, arrays, booleans and
/// null are rejected as malformed, as is anything that is not an object
/// at the top level.
pub fn params_from_json(value: &Value) -> Result<Vec<(String, ParamValue)>> {
    let object = value.as_object().ok_or_else(|| {
        CinelogError::malformed(format!(
            "parameters must be a JSON object, got {}",
            json_kind(value)
        ))
    })?;

    object
        .iter()
        .map(|(key, v)| scalar_from_json(key, v).map(|scalar| (key.clone(), scalar)))
        .collect()
}

fn scalar_from_json(key: &str, value: &Value) -> Result<ParamValue> {
    match value {
        Value::String(s) => Ok(ParamValue::Text(s.clone())),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(ParamValue::Integer(i))
            } else if n.is_u64() {
                Err(CinelogError::malformed(format!(
                    "parameter '{}' is out of integer range: {}",
                    key, n
                )))
            } else {
                n.as_f64().map(ParamValue::Float).ok_or_else(|| {
                    CinelogError::malformed(format!("parameter '{}' is not a number", key))
                })
            }
        }
        other => Err(CinelogError::malformed(format!(
            "parameter '{}' must be a string or number, got {}",
            key,
            json_kind(other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
