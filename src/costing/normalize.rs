//! Numeric normalization
//!
//! Coerces loosely typed input (workbook cells, tool parameters) into finite
//! numbers so that a malformed field costs zero instead of failing a calculation.

use serde_json::Value;

/// Return `value` if it is finite, otherwise `default`
pub fn finite_or(value: f64, default: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        default
    }
}

/// Parse a numeric string, falling back to `default` for blank or malformed text
pub fn normalize_str(text: &str, default: f64) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return default;
    }
    match trimmed.parse::<f64>() {
        Ok(n) => finite_or(n, default),
        Err(_) => default,
    }
}

/// Normalize an arbitrary JSON value to a finite number
///
/// Numbers pass through, strings are parsed, everything else (null, booleans,
/// arrays, objects) yields `default`.
pub fn normalize(value: &Value, default: f64) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().map_or(default, |n| finite_or(n, default)),
        Value::String(s) => normalize_str(s, default),
        _ => default,
    }
}

/// Normalize an optional value, treating absence like null
pub fn normalize_opt(value: Option<&Value>, default: f64) -> f64 {
    value.map_or(default, |v| normalize(v, default))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_malformed_inputs_yield_default() {
        assert_eq!(normalize(&Value::Null, 7.0), 7.0);
        assert_eq!(normalize(&json!(""), 7.0), 7.0);
        assert_eq!(normalize(&json!("   "), 7.0), 7.0);
        assert_eq!(normalize(&json!("abc"), 7.0), 7.0);
        assert_eq!(normalize(&json!("12abc"), 7.0), 7.0);
        assert_eq!(normalize(&json!(true), 7.0), 7.0);
        assert_eq!(normalize(&json!([1, 2]), 7.0), 7.0);
        assert_eq!(normalize(&json!({"a": 1}), 7.0), 7.0);
        assert_eq!(normalize_opt(None, 7.0), 7.0);
    }

    #[test]
    fn test_numeric_inputs_pass_through() {
        assert_eq!(normalize(&json!(12), 0.0), 12.0);
        assert_eq!(normalize(&json!(-3.5), 0.0), -3.5);
        assert_eq!(normalize(&json!("1000"), 0.0), 1000.0);
        assert_eq!(normalize(&json!(" 2.25 "), 0.0), 2.25);
        assert_eq!(normalize(&json!("0"), 9.0), 0.0);
    }

    #[test]
    fn test_non_finite_yields_default() {
        assert_eq!(finite_or(f64::NAN, 1.0), 1.0);
        assert_eq!(finite_or(f64::INFINITY, 1.0), 1.0);
        assert_eq!(normalize_str("NaN", 4.0), 4.0);
        assert_eq!(normalize_str("inf", 4.0), 4.0);
        assert_eq!(finite_or(2.0, 1.0), 2.0);
    }
}
