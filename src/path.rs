//! Write locations inside a nested configuration mapping.

use crate::error::{ConfigError, ConfigResult};
use crate::value::{Mapping, Value};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// A non-empty sequence of key segments, e.g. `["HAYSTACK", "ENGINE"]`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Path {
    segments: Vec<String>,
}

impl Path {
    /// Build a path from explicit segments. Segments may contain dots.
    pub fn from_segments<I, S>(segments: I) -> ConfigResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(ConfigError::invalid_spec("write path is empty"));
        }
        if segments.iter().any(String::is_empty) {
            return Err(ConfigError::invalid_spec(format!(
                "write path '{}' has an empty segment",
                segments.join(".")
            )));
        }
        Ok(Self { segments })
    }

    /// Parse a dotted path such as `"A.B.C"`.
    pub fn dotted(path: &str) -> ConfigResult<Self> {
        Self::from_segments(path.split('.'))
    }

    /// A top-level key, taken literally even if it contains dots.
    pub fn key(key: impl Into<String>) -> Self {
        Self {
            segments: vec![key.into()],
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Never true for a constructed path.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// First segment, i.e. the top-level key written to.
    pub fn root(&self) -> &str {
        &self.segments[0]
    }

    /// Append a child segment.
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }
}

impl FromStr for Path {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::dotted(s)
    }
}

impl TryFrom<Vec<String>> for Path {
    type Error = ConfigError;

    fn try_from(segments: Vec<String>) -> Result<Self, Self::Error> {
        Self::from_segments(segments)
    }
}

impl TryFrom<&[&str]> for Path {
    type Error = ConfigError;

    fn try_from(segments: &[&str]) -> Result<Self, Self::Error> {
        Self::from_segments(segments.iter().copied())
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

/// Write `value` at `path`, creating intermediate mappings as needed.
///
/// An intermediate segment holding a non-mapping value is replaced by an
/// empty mapping; the previous value is lost.
pub fn write_path(root: &mut Mapping, path: &Path, value: Value) {
    let Some((leaf, parents)) = path.segments.split_last() else {
        return;
    };

    let mut node = root;
    for segment in parents {
        let slot = node
            .entry(segment.clone())
            .or_insert_with(|| Value::Map(Mapping::new()));
        node = ensure_map(slot, path, segment);
    }
    node.insert(leaf.clone(), value);
}

/// Look up the value stored at `path`, if every segment resolves.
pub fn read_path<'a>(root: &'a Mapping, path: &Path) -> Option<&'a Value> {
    let (leaf, parents) = path.segments.split_last()?;
    let mut node = root;
    for segment in parents {
        node = node.get(segment)?.as_map()?;
    }
    node.get(leaf)
}

fn ensure_map<'a>(slot: &'a mut Value, path: &Path, segment: &str) -> &'a mut Mapping {
    if !matches!(slot, Value::Map(_)) {
        warn!(%path, segment, "Replacing non-mapping value with a mapping");
        *slot = Value::Map(Mapping::new());
    }
    match slot {
        Value::Map(map) => map,
        _ => unreachable!("slot was just replaced with a mapping"),
    }
}
