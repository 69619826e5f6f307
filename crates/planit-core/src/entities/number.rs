use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Coerce a JSON value into a finite number.
///
/// Numbers and numeric strings are accepted. Anything else, including
/// `NaN`/infinite values and empty strings, maps to `None`.
#[must_use]
pub fn to_finite_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64().filter(|n| n.is_finite()),
        Value::String(raw) => raw.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

pub(crate) fn finite_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(to_finite_number))
}
