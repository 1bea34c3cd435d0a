//! Delimited list and `key=value` mapping parsing.

use super::scalar::{convert_as, convert_scalar};
use crate::error::ConvertError;
use crate::value::{Mapping, ScalarType, Value};

/// Separates list elements and mapping entries.
pub const ITEM_DELIMITER: char = ',';

/// Separates a mapping key from its value.
pub const PAIR_DELIMITER: char = '=';

/// Split a comma-separated list. Elements are trimmed; empty ones are dropped.
pub fn parse_sequence(raw: &str) -> Vec<String> {
    raw.split(ITEM_DELIMITER)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split `a=1,b=2` into ordered string pairs, without any value conversion.
///
/// Each element is split on its first `=`, so values may contain `=`.
pub fn split_pairs(raw: &str) -> Result<Vec<(String, String)>, ConvertError> {
    raw.split(ITEM_DELIMITER)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            item.split_once(PAIR_DELIMITER)
                .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
                .ok_or_else(|| ConvertError::MissingSeparator(item.to_string()))
        })
        .collect()
}

/// Parse a mapping, coercing each value by the scalar default stored under
/// the same key in `defaults`. Keys without a scalar default are inferred.
pub fn parse_mapping(raw: &str, defaults: &Mapping) -> Result<Mapping, ConvertError> {
    split_pairs(raw)?
        .into_iter()
        .map(|(key, value)| {
            let converted = match defaults.get(&key).and_then(Value::scalar_type) {
                Some(ty) => convert_as(&value, ty)?,
                None => convert_scalar(&value),
            };
            Ok((key, converted))
        })
        .collect()
}

/// Parse a list, coercing elements to the scalar type shared by every
/// element of the default list. Mixed or empty defaults keep strings.
pub fn parse_typed_sequence(raw: &str, defaults: &[Value]) -> Result<Vec<Value>, ConvertError> {
    let items = parse_sequence(raw);
    match element_type(defaults) {
        Some(ty) => items.iter().map(|item| convert_as(item, ty)).collect(),
        None => Ok(items.into_iter().map(Value::String).collect()),
    }
}

fn element_type(items: &[Value]) -> Option<ScalarType> {
    let first = items.first()?.scalar_type()?;
    items
        .iter()
        .all(|item| item.scalar_type() == Some(first))
        .then_some(first)
}
