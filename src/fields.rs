//! Total accessors over loosely-typed JSON.
//!
//! The search API hands back a generic JSON tree. Every accessor here returns a
//! zero value instead of failing when a key is missing or carries an unexpected type.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static LEADING_INT: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\s*([+-]?\d+)").ok());

static YEAR: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\b(1[5-9]\d{2}|20\d{2})\b").ok());

/// Walk a key path through nested objects.
pub fn nested<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |current, key| current.get(key))
}

/// String at `key`, or `""` when absent or not a string.
pub fn string_or_default(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_default()
}

/// Integer at `key`, or `0`.
///
/// Accepts integers, floats (truncated) and numeric strings.
pub fn int_or_default(value: &Value, key: &str) -> i64 {
    value.get(key).map(value_to_int).unwrap_or(0)
}

/// Integer conversion of a single value, `0` when not numeric.
pub fn value_to_int(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Value::String(s) => parse_leading_int(s),
        _ => 0,
    }
}

/// Parse the leading integer of a string (`"2020a"` -> 2020), `0` on failure.
pub fn parse_leading_int(s: &str) -> i64 {
    LEADING_INT
        .as_ref()
        .and_then(|re| re.captures(s))
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// First plausible publication year in free text.
pub fn find_year(text: &str) -> Option<i64> {
    YEAR.as_ref()?
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}
