// crates/form-logic-core/src/runtime/coercion.rs
// ============================================================================
// Module: Value Coercion
// Description: Loose text, number, and emptiness coercions for field values.
// Purpose: Reproduce the renderer's loose comparison rules deterministically.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! Form values arrive as loosely typed JSON: checkboxes may be booleans or
//! `"Yes"`, numeric inputs may be strings. These helpers coerce values the
//! way browser form code does (`String(x)`, `Number(x)`, truthiness), with
//! one deliberate difference: `null` and missing values render as the empty
//! string rather than `"null"` / `"undefined"`.
//!
//! An absent value is modelled as `None` and is distinct from JSON `null`
//! for numeric coercion only (`None` is NaN, `null` is 0).

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::borrow::Cow;

use serde_json::Number;
use serde_json::Value;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Largest decimal point position rendered without an exponent (1e21).
const MAX_PLAIN_POINT: i32 = 21;
/// Smallest decimal point position rendered without an exponent (1e-6).
const MIN_PLAIN_POINT: i32 = -5;

// ============================================================================
// SECTION: Text Coercion
// ============================================================================

/// Renders a value as text.
///
/// Arrays join their elements with `,`; objects render as `[object Object]`.
#[must_use]
pub fn to_text(value: Option<&Value>) -> Cow<'_, str> {
    match value {
        None | Some(Value::Null) => Cow::Borrowed(""),
        Some(Value::Bool(true)) => Cow::Borrowed("true"),
        Some(Value::Bool(false)) => Cow::Borrowed("false"),
        Some(Value::Number(number)) => Cow::Owned(number_text(number)),
        Some(Value::String(text)) => Cow::Borrowed(text),
        Some(Value::Array(items)) => Cow::Owned(
            items.iter().map(|item| to_text(Some(item))).collect::<Vec<_>>().join(","),
        ),
        Some(Value::Object(_)) => Cow::Borrowed("[object Object]"),
    }
}

/// Renders a JSON number the way `String(number)` does.
///
/// Integral values drop the fraction; magnitudes of at least 1e21 or below
/// 1e-6 use exponent form (`1e+21`, `1.5e-7`).
fn number_text(number: &Number) -> String {
    number.as_f64().map_or_else(|| number.to_string(), float_text)
}

/// Lays out the shortest round-trip digits of `float` in JavaScript style.
fn float_text(float: f64) -> String {
    if float == 0.0 {
        return "0".to_string();
    }
    let scientific = format!("{:e}", float.abs());
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let point = exponent + 1;
    let digit_count = i32::try_from(digits.len()).unwrap_or(i32::MAX);
    let zeros = |count: i32| "0".repeat(usize::try_from(count).unwrap_or(0));

    let body = if (digit_count ..= MAX_PLAIN_POINT).contains(&point) {
        format!("{digits}{}", zeros(point - digit_count))
    } else if (1 ..= MAX_PLAIN_POINT).contains(&point) {
        let (whole, fraction) = digits.split_at(usize::try_from(point).unwrap_or(0));
        format!("{whole}.{fraction}")
    } else if (MIN_PLAIN_POINT ..= 0).contains(&point) {
        format!("0.{}{digits}", zeros(-point))
    } else {
        let (lead, rest) = digits.split_at(1);
        let fraction = if rest.is_empty() { String::new() } else { format!(".{rest}") };
        let exponent_sign = if exponent < 0 { '-' } else { '+' };
        format!("{lead}{fraction}e{exponent_sign}{}", exponent.unsigned_abs())
    };
    if float < 0.0 { format!("-{body}") } else { body }
}

// ============================================================================
// SECTION: Numeric Coercion
// ============================================================================

/// Coerces a value to a number; anything non-numeric yields NaN.
#[must_use]
pub fn to_number(value: Option<&Value>) -> f64 {
    match value {
        None | Some(Value::Object(_)) => f64::NAN,
        Some(Value::Null | Value::Bool(false)) => 0.0,
        Some(Value::Bool(true)) => 1.0,
        Some(Value::Number(number)) => number.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(text)) => parse_numeric_text(text),
        Some(array @ Value::Array(_)) => parse_numeric_text(&to_text(Some(array))),
    }
}

/// Parses numeric text: decimal, `Infinity`, and `0x` / `0o` / `0b` literals.
///
/// Surrounding whitespace is ignored and blank text is zero.
fn parse_numeric_text(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    if let Some(value) = parse_radix_literal(trimmed) {
        return value;
    }
    if is_decimal_literal(trimmed) { trimmed.parse::<f64>().unwrap_or(f64::NAN) } else { f64::NAN }
}

/// Parses an unsigned hex, octal, or binary literal. Returns `None` when
/// `text` has no radix prefix.
fn parse_radix_literal(text: &str) -> Option<f64> {
    let radix = match text.get(.. 2) {
        Some("0x" | "0X") => 16,
        Some("0o" | "0O") => 8,
        Some("0b" | "0B") => 2,
        _ => return None,
    };
    let digits = text.get(2 ..).unwrap_or_default();
    if digits.is_empty() {
        return Some(f64::NAN);
    }
    let mut total = 0.0_f64;
    for ch in digits.chars() {
        let Some(digit) = ch.to_digit(radix) else {
            return Some(f64::NAN);
        };
        total = total.mul_add(f64::from(radix), f64::from(digit));
    }
    Some(total)
}

/// Returns true for `[+-]digits[.digits][(e|E)[+-]digits]` with at least one
/// mantissa digit.
///
/// Rejects the `inf` / `nan` spellings that `f64::from_str` would accept.
fn is_decimal_literal(text: &str) -> bool {
    let bytes = text.as_bytes();
    let mut index = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        index += 1;
    }
    let integer_start = index;
    while bytes.get(index).is_some_and(u8::is_ascii_digit) {
        index += 1;
    }
    let mut mantissa_digits = index - integer_start;
    if bytes.get(index) == Some(&b'.') {
        index += 1;
        let fraction_start = index;
        while bytes.get(index).is_some_and(u8::is_ascii_digit) {
            index += 1;
        }
        mantissa_digits += index - fraction_start;
    }
    if mantissa_digits == 0 {
        return false;
    }
    if matches!(bytes.get(index), Some(b'e' | b'E')) {
        index += 1;
        if matches!(bytes.get(index), Some(b'+' | b'-')) {
            index += 1;
        }
        let exponent_start = index;
        while bytes.get(index).is_some_and(u8::is_ascii_digit) {
            index += 1;
        }
        if index == exponent_start {
            return false;
        }
    }
    index == bytes.len()
}

// ============================================================================
// SECTION: Truthiness
// ============================================================================

/// Returns true for falsy values (absent, null, false, 0, NaN, `""`) and
/// zero-length arrays.
#[must_use]
pub fn is_empty_value(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Bool(flag)) => !flag,
        Some(Value::Number(number)) => {
            number.as_f64().is_none_or(|float| float == 0.0 || float.is_nan())
        }
        Some(Value::String(text)) => text.is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::Object(_)) => false,
    }
}

// ============================================================================
// SECTION: Equality
// ============================================================================

/// Decodes the textual boolean encodings a form may store for a checkbox.
///
/// Only the exact literals `Yes`, `yes`, `true`, `No`, `no`, and `false` are
/// recognized; other spellings are compared as text.
#[must_use]
pub fn boolean_text(value: &Value) -> Option<bool> {
    match value.as_str()? {
        "Yes" | "yes" | "true" => Some(true),
        "No" | "no" | "false" => Some(false),
        _ => None,
    }
}

/// Value-aware equality used by `=` and `!=`.
///
/// When either side is a boolean, the other side's boolean text is decoded
/// first. Otherwise both sides are compared as lowercased text.
#[must_use]
pub fn loose_equals(left: Option<&Value>, right: Option<&Value>) -> bool {
    match (left, right) {
        (Some(Value::Bool(left_flag)), Some(Value::Bool(right_flag))) => left_flag == right_flag,
        (Some(Value::Bool(flag)), Some(other)) | (Some(other), Some(Value::Bool(flag))) => {
            boolean_text(other)
                .map_or_else(|| lowered_text_equals(left, right), |decoded| decoded == *flag)
        }
        _ => lowered_text_equals(left, right),
    }
}

/// Compares two values as lowercased text.
fn lowered_text_equals(left: Option<&Value>, right: Option<&Value>) -> bool {
    to_text(left).to_lowercase() == to_text(right).to_lowercase()
}
