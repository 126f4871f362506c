//! Lenient readers for engine output.
//!
//! The engine's JSON is only loosely typed: keys go missing, numbers show up as
//! floats or strings, and `null` is common. Everything here falls back to a default
//! instead of failing, the one exception being fields a record cannot live without.

use serde_json::Value;

#[must_use]
pub fn str_field<'a>(info: &'a Value, key: &str) -> Option<&'a str> {
    info.get(key).and_then(Value::as_str)
}

#[must_use]
pub fn non_empty_str_field<'a>(info: &'a Value, key: &str) -> Option<&'a str> {
    str_field(info, key).filter(|x| !x.is_empty())
}

#[must_use]
pub fn string_or(info: &Value, key: &str, default: &str) -> String {
    str_field(info, key).unwrap_or(default).to_string()
}

#[must_use]
pub fn string_or_empty(info: &Value, key: &str) -> String {
    string_or(info, key, "")
}

/// Only actual integers count, `12.5` or `"12"` become `0`
#[must_use]
pub fn int_or_zero(info: &Value, key: &str) -> i64 {
    info.get(key).and_then(Value::as_i64).unwrap_or(0)
}

#[must_use]
pub fn uint_or_zero(info: &Value, key: &str) -> u64 {
    info.get(key).and_then(Value::as_u64).unwrap_or(0)
}

#[must_use]
pub fn float_or_zero(info: &Value, key: &str) -> f64 {
    info.get(key).and_then(Value::as_f64).unwrap_or(0.0)
}

/// Array elements under `key`, or nothing if it isn't an array
pub fn array_items<'a>(info: &'a Value, key: &str) -> impl Iterator<Item = &'a Value> {
    info.get(key)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn strings_fall_back_on_wrong_types() {
        let info = json!({ "a": "x", "b": 1, "c": null, "d": "" });

        assert_eq!(string_or_empty(&info, "a"), "x");
        assert_eq!(string_or_empty(&info, "b"), "");
        assert_eq!(string_or(&info, "c", "fallback"), "fallback");
        assert_eq!(string_or(&info, "missing", "fallback"), "fallback");
        assert_eq!(non_empty_str_field(&info, "d"), None);
    }

    #[test]
    fn integers_are_strict() {
        let info = json!({ "a": 212, "b": 212.5, "c": "212", "d": -3 });

        assert_eq!(int_or_zero(&info, "a"), 212);
        assert_eq!(int_or_zero(&info, "b"), 0);
        assert_eq!(int_or_zero(&info, "c"), 0);
        assert_eq!(int_or_zero(&info, "d"), -3);
        assert_eq!(uint_or_zero(&info, "d"), 0);
    }

    #[test]
    fn floats_accept_integers() {
        let info = json!({ "a": 12, "b": 12.5, "c": "12" });

        assert!((float_or_zero(&info, "a") - 12.0).abs() < f64::EPSILON);
        assert!((float_or_zero(&info, "b") - 12.5).abs() < f64::EPSILON);
        assert!(float_or_zero(&info, "c").abs() < f64::EPSILON);
    }

    #[test]
    fn arrays_of_the_wrong_type_are_empty() {
        let info = json!({ "a": [1, 2], "b": "nope" });

        assert_eq!(array_items(&info, "a").count(), 2);
        assert_eq!(array_items(&info, "b").count(), 0);
        assert_eq!(array_items(&info, "c").count(), 0);
    }
}
