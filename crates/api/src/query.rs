use serde::Serialize;
use serde_json::Value;

use crate::error::{ApiError, Result};

/// Serialize `params` into a query string with keys in ascending order.
///
/// `params` must serialize to a JSON object (or to `null`, meaning no
/// parameters). Null entries are dropped and arrays are sent comma-joined.
/// Nested objects are rejected. The result carries the leading `?`, or is
/// empty when nothing remains.
pub fn params_to_query<P: Serialize + ?Sized>(params: &P) -> Result<String> {
    let map = match serde_json::to_value(params)? {
        Value::Object(map) => map,
        Value::Null => return Ok(String::new()),
        other => {
            return Err(ApiError::InvalidParams(format!(
                "query parameters must be an object, got {other}"
            )))
        }
    };

    let mut pairs: Vec<(String, Value)> = map.into_iter().filter(|(_, v)| !v.is_null()).collect();
    if pairs.is_empty() {
        return Ok(String::new());
    }
    pairs.sort_by(|(a, _), (b, _)| a.cmp(b));

    let joined = pairs
        .iter()
        .map(|(key, value)| -> Result<String> {
            let text = query_text(key, value)?;
            Ok(format!("{key}={}", urlencoding::encode(&text)))
        })
        .collect::<Result<Vec<_>>>()?
        .join("&");

    Ok(format!("?{joined}"))
}

fn query_text(key: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Null => Ok(String::new()),
        Value::Array(items) => Ok(items
            .iter()
            .map(|item| query_text(key, item))
            .collect::<Result<Vec<_>>>()?
            .join(",")),
        Value::Object(_) => Err(ApiError::InvalidParams(format!(
            "query parameter '{key}' must not be an object"
        ))),
        other => Ok(other.to_string()),
    }
}
