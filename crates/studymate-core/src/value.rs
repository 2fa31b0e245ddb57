//! Helpers for reading loosely typed JSON values.
//!
//! - [`to_finite_number`] / [`to_id`]: numeric coercion that accepts numbers
//!   and numeric strings
//! - [`probe`] / [`probe_str`]: ordered alias lookup over a JSON object
//! - [`coerce_text`]: render any scalar as display text
//! - [`is_truthy`]: the falsy check the sessions normalizer needs

use serde_json::{Map, Number, Value};

/// Coerce a value into a finite `f64`.
///
/// Accepts a JSON number, or a string that is non-blank and parses (after
/// trimming) as a finite number. Everything else is invalid.
pub fn to_finite_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
        }
        _ => None,
    }
}

/// Coerce a value into an integral identifier.
///
/// Same inputs as [`to_finite_number`]; a finite value with a fractional part
/// or outside the `i64` range is rejected.
#[allow(
    clippy::float_cmp,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]
pub fn to_id(value: &Value) -> Option<i64> {
    if let Some(id) = value.as_i64() {
        return Some(id);
    }
    let number = to_finite_number(value)?;
    if number.trunc() != number || number < i64::MIN as f64 || number >= i64::MAX as f64 {
        return None;
    }
    Some(number as i64)
}

/// First alias whose value is present and not `null`.
pub fn probe<'a>(record: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| record.get(*key))
        .find(|value| !value.is_null())
}

/// First alias whose value is a string.
///
/// Unlike [`probe`], a non-string value does not stop the search.
pub fn probe_str<'a>(record: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|key| record.get(*key))
        .find_map(Value::as_str)
}

/// Render a value as display text.
///
/// Strings pass through, numbers use their shortest form, booleans become
/// `true`/`false`, `null` becomes empty, and containers become compact JSON.
pub fn coerce_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => display_number(n),
        other => other.to_string(),
    }
}

/// Shortest display form of a JSON number (`3.0` renders as `3`).
#[allow(clippy::float_cmp, clippy::cast_possible_truncation)]
pub fn display_number(number: &Number) -> String {
    if let Some(i) = number.as_i64() {
        return i.to_string();
    }
    if let Some(u) = number.as_u64() {
        return u.to_string();
    }
    match number.as_f64() {
        Some(f) if f.trunc() == f && f.abs() < 1e15 => (f as i64).to_string(),
        Some(f) => f.to_string(),
        None => number.to_string(),
    }
}

/// Whether a value counts as "present" for the sessions normalizer.
///
/// `null`, `false`, `0`, `NaN`, and the empty string are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    // -- to_finite_number --

    #[test]
    fn number_accepts_native_numbers() {
        assert_eq!(to_finite_number(&json!(42)), Some(42.0));
        assert_eq!(to_finite_number(&json!(-1.5)), Some(-1.5));
    }

    #[test]
    fn number_accepts_numeric_strings() {
        assert_eq!(to_finite_number(&json!("7")), Some(7.0));
        assert_eq!(to_finite_number(&json!("  12  ")), Some(12.0));
        assert_eq!(to_finite_number(&json!("1e3")), Some(1000.0));
    }

    #[test]
    fn number_rejects_blank_and_garbage() {
        assert_eq!(to_finite_number(&json!("")), None);
        assert_eq!(to_finite_number(&json!("   ")), None);
        assert_eq!(to_finite_number(&json!("abc")), None);
        assert_eq!(to_finite_number(&json!("inf")), None);
        assert_eq!(to_finite_number(&json!("NaN")), None);
        assert_eq!(to_finite_number(&json!(true)), None);
        assert_eq!(to_finite_number(&Value::Null), None);
        assert_eq!(to_finite_number(&json!([1])), None);
    }

    // -- to_id --

    #[test]
    fn id_accepts_integral_values() {
        assert_eq!(to_id(&json!(7)), Some(7));
        assert_eq!(to_id(&json!("7")), Some(7));
        assert_eq!(to_id(&json!(7.0)), Some(7));
        assert_eq!(to_id(&json!("-3")), Some(-3));
    }

    #[test]
    fn id_rejects_fractional_values() {
        assert_eq!(to_id(&json!(7.5)), None);
        assert_eq!(to_id(&json!("7.5")), None);
        assert_eq!(to_id(&json!(1e300)), None);
    }

    // -- probe --

    #[test]
    fn probe_skips_missing_and_null() {
        let record = object(json!({"a": null, "b": 2, "c": 3}));
        assert_eq!(probe(&record, &["x", "a", "b", "c"]), Some(&json!(2)));
    }

    #[test]
    fn probe_stops_at_first_non_null_even_if_wrong_type() {
        let record = object(json!({"name": 5, "title": "Bio"}));
        assert_eq!(probe(&record, &["name", "title"]), Some(&json!(5)));
    }

    #[test]
    fn probe_str_continues_past_non_strings() {
        let record = object(json!({"created_at": 5, "uploaded_at": "2024-01-01"}));
        assert_eq!(
            probe_str(&record, &["created_at", "uploaded_at"]),
            Some("2024-01-01")
        );
    }

    #[test]
    fn probe_returns_none_when_no_alias_matches() {
        let record = object(json!({"other": 1}));
        assert!(probe(&record, &["a", "b"]).is_none());
        assert!(probe_str(&record, &["a", "b"]).is_none());
    }

    // -- coerce_text --

    #[test]
    fn coerce_text_renders_scalars() {
        assert_eq!(coerce_text(&json!("hi")), "hi");
        assert_eq!(coerce_text(&json!(3)), "3");
        assert_eq!(coerce_text(&json!(3.0)), "3");
        assert_eq!(coerce_text(&json!(2.5)), "2.5");
        assert_eq!(coerce_text(&json!(false)), "false");
        assert_eq!(coerce_text(&Value::Null), "");
        assert_eq!(coerce_text(&json!({"a": 1})), r#"{"a":1}"#);
    }

    // -- is_truthy --

    #[test]
    fn truthiness_matches_falsy_set() {
        assert!(!is_truthy(&Value::Null));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!("0")));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!({})));
        assert!(is_truthy(&json!(1)));
    }

    proptest! {
        #[test]
        fn integer_strings_round_trip_through_to_id(n in -1_000_000_000i64..1_000_000_000i64) {
            prop_assert_eq!(to_id(&json!(n.to_string())), Some(n));
            prop_assert_eq!(to_id(&json!(n)), Some(n));
        }

        #[test]
        fn to_finite_number_never_panics(s in ".*") {
            let _ = to_finite_number(&Value::String(s));
        }
    }
}
