//! Value resolution: interpolation followed by type coercion

use crate::domain::EnvMap;
use crate::error::Result;
use serde_json::Value;
use std::collections::BTreeMap;

pub mod coerce;
pub mod interpolate;

pub use coerce::coerce;
pub use interpolate::Interpolator;

/// Resolve the raw value of `key` against an environment snapshot and the
/// map currently being loaded.
pub fn resolve(
    key: &str,
    raw: &str,
    env: &BTreeMap<String, String>,
    parsed: &EnvMap,
) -> Result<Value> {
    let interpolated = Interpolator::new(env, parsed).interpolate(Some(key), raw)?;
    Ok(coerce(&interpolated))
}

/// String form of a value as it is written to an environment store.
pub fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(float) if n.is_f64() => render_float(float),
            _ => n.to_string(),
        },
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Plain digits for magnitudes in `[1e-6, 1e21)`, exponent form with an
/// explicit sign outside it: `12345678901234567000`, `1e+21`, `1e-7`.
fn render_float(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if (1e-6..1e21).contains(&value.abs()) {
        return value.to_string();
    }
    let exponential = format!("{value:e}");
    match exponential.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => exponential,
    }
}
