//! String → typed value coercion

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Number, Value};

static DECIMAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?$").expect("valid regex")
});

/// Largest integer an f64 represents exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Unicode whitespace plus the zero-width no-break space (BOM).
fn is_space(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

pub fn is_blank(value: &str) -> bool {
    value.chars().all(is_space)
}

/// Coerce an interpolated string, first rule that applies wins:
/// backtick-wrapped or `*`-suffixed values stay strings, then booleans,
/// numbers and JSON arrays/objects, otherwise the string itself.
pub fn coerce(value: &str) -> Value {
    let value = value.replace("\\$", "$");

    if value.starts_with('`') && value.ends_with('`') {
        let inner = if value.len() >= 2 { &value[1..value.len() - 1] } else { "" };
        return Value::String(inner.to_string());
    }

    if let Some(forced) = value.strip_suffix('*') {
        return Value::String(forced.to_string());
    }

    match value.to_lowercase().as_str() {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }

    if !is_blank(&value) {
        if let Some(number) = parse_number(&value) {
            return number;
        }
    }

    let is_array = value.starts_with('[') && value.ends_with(']');
    if is_array || (value.starts_with('{') && value.ends_with('}')) {
        return match serde_json::from_str::<Value>(&value) {
            Ok(parsed) => parsed,
            Err(_) if is_array => Value::Array(Vec::new()),
            Err(_) => Value::Object(serde_json::Map::new()),
        };
    }

    Value::String(value)
}

/// Decimal literals with optional exponent, or `0x`/`0o`/`0b` integers. Finite values only.
fn parse_number(value: &str) -> Option<Value> {
    let trimmed = value.trim_matches(is_space);

    let parsed = if let Some(digits) = strip_radix_prefix(trimmed, 'x') {
        radix_value(digits, 16)?
    } else if let Some(digits) = strip_radix_prefix(trimmed, 'o') {
        radix_value(digits, 8)?
    } else if let Some(digits) = strip_radix_prefix(trimmed, 'b') {
        radix_value(digits, 2)?
    } else if DECIMAL.is_match(trimmed) {
        trimmed.parse::<f64>().ok()?
    } else {
        return None;
    };

    if !parsed.is_finite() {
        return None;
    }
    Some(number_value(parsed))
}

fn strip_radix_prefix(value: &str, marker: char) -> Option<&str> {
    let rest = value.strip_prefix('0')?;
    rest.strip_prefix(marker).or_else(|| rest.strip_prefix(marker.to_ascii_uppercase()))
}

fn radix_value(digits: &str, radix: u32) -> Option<f64> {
    if digits.is_empty() {
        return None;
    }
    digits
        .chars()
        .try_fold(0f64, |acc, c| Some(acc * f64::from(radix) + f64::from(c.to_digit(radix)?)))
}

fn number_value(parsed: f64) -> Value {
    if parsed.fract() == 0.0 && parsed.abs() <= MAX_SAFE_INTEGER {
        return Value::Number(Number::from(parsed as i64));
    }
    Number::from_f64(parsed).map(Value::Number).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_booleans_are_case_insensitive() {
        assert_eq!(coerce("true"), json!(true));
        assert_eq!(coerce("FALSE"), json!(false));
        assert_eq!(coerce("True"), json!(true));
        assert_eq!(coerce("yes"), json!("yes"));
    }

    #[test]
    fn test_integers_and_floats() {
        assert_eq!(coerce("42"), json!(42));
        assert_eq!(coerce("-7"), json!(-7));
        assert_eq!(coerce("3.5"), json!(3.5));
        assert_eq!(coerce("1e3"), json!(1000));
        assert_eq!(coerce(".5"), json!(0.5));
        assert_eq!(coerce("  12  "), json!(12));
    }

    #[test]
    fn test_radix_literals() {
        assert_eq!(coerce("0x1F"), json!(31));
        assert_eq!(coerce("0o17"), json!(15));
        assert_eq!(coerce("0b101"), json!(5));
        assert_eq!(coerce("0xZZ"), json!("0xZZ"));
        assert_eq!(coerce("-0x10"), json!("-0x10"));
    }

    #[test]
    fn test_non_finite_and_non_numeric_stay_strings() {
        assert_eq!(coerce("Infinity"), json!("Infinity"));
        assert_eq!(coerce("NaN"), json!("NaN"));
        assert_eq!(coerce("1e999"), json!("1e999"));
        assert_eq!(coerce("12abc"), json!("12abc"));
        assert_eq!(coerce("1.2.3"), json!("1.2.3"));
    }

    #[test]
    fn test_blank_strings_are_never_numbers() {
        assert_eq!(coerce(""), json!(""));
        assert_eq!(coerce("   "), json!("   "));
        assert_eq!(coerce("\u{3000}\u{feff}"), json!("\u{3000}\u{feff}"));
        assert!(is_blank("\u{00a0}\u{2028}"));
    }

    #[test]
    fn test_asterisk_suffix_forces_string() {
        assert_eq!(coerce("3*"), json!("3"));
        assert_eq!(coerce("true*"), json!("true"));
        assert_eq!(coerce("*"), json!(""));
    }

    #[test]
    fn test_backticks_force_string() {
        assert_eq!(coerce("`42`"), json!("42"));
        assert_eq!(coerce("`true`"), json!("true"));
        assert_eq!(coerce("`"), json!(""));
    }

    #[test]
    fn test_json_arrays_and_objects() {
        assert_eq!(coerce("[1,2]"), json!([1, 2]));
        assert_eq!(coerce(r#"{"a": {"b": true}}"#), json!({"a": {"b": true}}));
    }

    #[test]
    fn test_malformed_json_falls_back_to_empty() {
        assert_eq!(coerce("[1,2"), json!("[1,2"));
        assert_eq!(coerce("[not json]"), json!([]));
        assert_eq!(coerce("{oops}"), json!({}));
    }

    #[test]
    fn test_escaped_dollar_is_unescaped() {
        assert_eq!(coerce(r"\$5.00"), json!("$5.00"));
        assert_eq!(coerce(r"price: \$HOME"), json!("price: $HOME"));
    }

    #[test]
    fn test_plain_strings_pass_through() {
        assert_eq!(coerce("hello world"), json!("hello world"));
        assert_eq!(coerce("postgres://localhost/db"), json!("postgres://localhost/db"));
    }
}
