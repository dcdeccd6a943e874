//! Field decoders tolerant of the upstream serializer's habits.
//!
//! The auditor replaces NaN/inf with `null` and fills holes in ticket rows
//! with `""`. A single damaged field must not fail the whole payload, so these
//! decoders map anything unusable to a neutral value instead of erroring.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Number, numeric string, `null`, `""` -> `f64`. Unusable values decode to `0.0`.
pub(crate) fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let v = Value::deserialize(deserializer)?;
    Ok(match v {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    })
}

/// String or number -> `String`; anything else decodes to `""`.
pub(crate) fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let v = Value::deserialize(deserializer)?;
    Ok(match v {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

/// Like [`string`], but blank values decode to `None`.
pub(crate) fn opt_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    let s = string(deserializer)?;
    if s.trim().is_empty() {
        Ok(None)
    } else {
        Ok(Some(s))
    }
}
