//! Declarative read, convert and write rules.
//!
//! A [`Spec`] names the environment entry to read (with optional fallbacks),
//! the location to write in the result, and optionally a converter that
//! replaces default-driven inference.
//!
//! ```rust
//! use confcollect::{Path, Spec, Value};
//!
//! let port = Spec::new("PORT").convert(|raw| {
//!     raw.parse::<i64>()
//!         .map(Value::Int)
//!         .map_err(|e| confcollect::ConvertError::custom(e.to_string()))
//! });
//!
//! let engine = Spec::new("SEARCH_BACKEND")
//!     .write_to(Path::dotted("HAYSTACK.ENGINE").unwrap());
//! # let _ = (port, engine);
//! ```

use crate::convert::convert_with_default;
use crate::error::{ConfigError, ConfigResult, ConvertError};
use crate::path::Path;
use crate::value::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A caller-supplied conversion from the raw string.
pub type Converter = Arc<dyn Fn(&str) -> Result<Value, ConvertError> + Send + Sync>;

/// Where a spec came from; explicit specs win over inferred ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecOrigin {
    /// Supplied by the caller
    Explicit,
    /// Derived from an existing default
    Inferred,
    /// Derived from an environment entry that matches no default
    Bootstrapped,
}

/// One read, convert and write rule.
#[derive(Clone)]
pub struct Spec {
    read_keys: Vec<String>,
    write_path: Path,
    converter: Option<Converter>,
    origin: SpecOrigin,
}

impl Spec {
    /// Read `key` and write to the top-level entry of the same name.
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            write_path: Path::key(key.clone()),
            read_keys: vec![key],
            converter: None,
            origin: SpecOrigin::Explicit,
        }
    }

    pub(crate) fn inferred(env_name: impl Into<String>, write_path: Path) -> Self {
        Self::derived(env_name, write_path, SpecOrigin::Inferred)
    }

    pub(crate) fn bootstrapped(env_name: impl Into<String>, write_path: Path) -> Self {
        Self::derived(env_name, write_path, SpecOrigin::Bootstrapped)
    }

    fn derived(env_name: impl Into<String>, write_path: Path, origin: SpecOrigin) -> Self {
        Self {
            read_keys: vec![env_name.into()],
            write_path,
            converter: None,
            origin,
        }
    }

    /// Also accept `key` when none of the earlier keys is set.
    pub fn or_read(mut self, key: impl Into<String>) -> Self {
        self.read_keys.push(key.into());
        self
    }

    /// Write to `path` instead of the read key.
    pub fn write_to(mut self, path: Path) -> Self {
        self.write_path = path;
        self
    }

    /// Replace inference with a custom converter.
    pub fn convert<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> Result<Value, ConvertError> + Send + Sync + 'static,
    {
        self.converter = Some(Arc::new(f));
        self
    }

    pub fn read_keys(&self) -> &[String] {
        &self.read_keys
    }

    pub fn write_path(&self) -> &Path {
        &self.write_path
    }

    pub fn origin(&self) -> SpecOrigin {
        self.origin
    }

    pub fn has_converter(&self) -> bool {
        self.converter.is_some()
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.read_keys.iter().any(String::is_empty) {
            return Err(ConfigError::invalid_spec(format!(
                "empty read key for '{}'",
                self.write_path
            )));
        }
        Ok(())
    }

    /// First configured key present in `environment`, with its raw value.
    pub fn read<'a>(&'a self, environment: &'a BTreeMap<String, String>) -> Option<(&'a str, &'a str)> {
        self.read_keys.iter().find_map(|key| {
            environment
                .get(key)
                .map(|raw| (key.as_str(), raw.as_str()))
        })
    }

    /// Convert `raw`, using the converter if set, otherwise the shape of `default`.
    pub fn apply(&self, raw: &str, default: Option<&Value>) -> Result<Value, ConvertError> {
        match &self.converter {
            Some(convert) => convert(raw),
            None => convert_with_default(raw, default),
        }
    }
}

impl fmt::Debug for Spec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Spec")
            .field("read_keys", &self.read_keys)
            .field("write_path", &self.write_path)
            .field("converter", &self.converter.as_ref().map(|_| "<fn>"))
            .field("origin", &self.origin)
            .finish()
    }
}
