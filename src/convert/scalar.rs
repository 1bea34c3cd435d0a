//! Scalar conversion of raw environment strings.

use crate::error::ConvertError;
use crate::value::{ScalarType, Value};
use std::str::FromStr;

/// Literals accepted as `true` when a boolean is expected (case-insensitive).
pub const TRUTHY: &[&str] = &["true", "yes", "1", "on", "t"];

/// Literals accepted as `false` when a boolean is expected (case-insensitive).
pub const FALSY: &[&str] = &["false", "no", "0", "off", "f"];

/// Best-effort conversion with no type known in advance.
///
/// Order: the literals `true`/`false`, then base-10 integer, then float,
/// and finally the untouched string. Numeric parsing wins over the wider
/// boolean literal set, so `"1"` and `"0"` stay integers here.
pub fn convert_scalar(raw: &str) -> Value {
    let trimmed = raw.trim();

    if trimmed.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    if let Some(i) = parse_number::<i64>(trimmed) {
        return Value::Int(i);
    }
    // Rust also parses "inf" and "NaN"; only digit-bearing strings become floats.
    if trimmed.bytes().any(|b| b.is_ascii_digit()) {
        if let Some(f) = parse_number::<f64>(trimmed) {
            return Value::Float(f);
        }
    }

    Value::String(raw.to_string())
}

/// Conversion forced by the type of an existing default.
///
/// A string that does not fit the type is an error, never a fallback.
pub fn convert_as(raw: &str, ty: ScalarType) -> Result<Value, ConvertError> {
    match ty {
        ScalarType::Bool => parse_bool(raw).map(Value::Bool),
        ScalarType::Int => parse_number::<i64>(raw.trim())
            .map(Value::Int)
            .ok_or_else(|| ConvertError::invalid(raw, ty.name())),
        ScalarType::Float => parse_number::<f64>(raw.trim())
            .map(Value::Float)
            .ok_or_else(|| ConvertError::invalid(raw, ty.name())),
        ScalarType::String => Ok(Value::String(raw.to_string())),
    }
}

/// Numbers take an optional leading `-` only; `FromStr` would also accept `+`.
fn parse_number<T: FromStr>(s: &str) -> Option<T> {
    if s.starts_with('+') {
        return None;
    }
    s.parse().ok()
}

/// Parse one of the documented boolean literals.
pub fn parse_bool(raw: &str) -> Result<bool, ConvertError> {
    let trimmed = raw.trim();
    if TRUTHY.iter().any(|t| trimmed.eq_ignore_ascii_case(t)) {
        Ok(true)
    } else if FALSY.iter().any(|f| trimmed.eq_ignore_ascii_case(f)) {
        Ok(false)
    } else {
        Err(ConvertError::invalid(raw, ScalarType::Bool.name()))
    }
}
