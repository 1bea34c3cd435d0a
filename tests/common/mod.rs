//! Shared builders for collector tests.

#![allow(dead_code)]

use confcollect::{Environ, Mapping, Value};

/// Build an environment snapshot from string pairs.
pub fn env(pairs: &[(&str, &str)]) -> Environ {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Build a mapping from key/value pairs.
pub fn mapping<V: Into<Value> + Clone>(pairs: &[(&str, V)]) -> Mapping {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone().into()))
        .collect()
}

/// A single-entry defaults mapping.
pub fn default_of(key: &str, value: impl Into<Value>) -> Mapping {
    let mut map = Mapping::new();
    map.insert(key.to_string(), value.into());
    map
}
