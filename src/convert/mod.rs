//! Type-directed conversion of raw environment strings.
//!
//! The shape of the default decides the parser: scalars force their own type,
//! lists are split on `,`, mappings are split into `key=value` pairs, and a
//! missing default falls back to best-effort scalar inference.

pub mod collection;
pub mod scalar;

pub use collection::{parse_mapping, parse_sequence, parse_typed_sequence, split_pairs};
pub use scalar::{convert_as, convert_scalar, parse_bool, FALSY, TRUTHY};

use crate::error::ConvertError;
use crate::value::{DefaultKind, Mapping, Value};

/// Convert `raw` into the shape implied by `default`.
pub fn convert_with_default(raw: &str, default: Option<&Value>) -> Result<Value, ConvertError> {
    match DefaultKind::of(default) {
        DefaultKind::Absent => Ok(convert_scalar(raw)),
        DefaultKind::Scalar(ty) => convert_as(raw, ty),
        DefaultKind::Sequence => {
            let items = default.and_then(Value::as_list).unwrap_or_default();
            parse_typed_sequence(raw, items).map(Value::List)
        }
        DefaultKind::Mapping => {
            let empty = Mapping::new();
            let nested = default.and_then(Value::as_map).unwrap_or(&empty);
            parse_mapping(raw, nested).map(Value::Map)
        }
    }
}
