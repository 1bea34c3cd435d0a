//! Configuration sources.
//!
//! A [`ConfigSource`] yields a flat mapping of name to value. Definition
//! sources ([`PairsSource`], [`ModuleSource`]) carry already-typed values and
//! keep only uppercase names; [`EnvSource`] yields the raw strings that the
//! collector converts.

use crate::error::{ConfigError, ConfigResult};
use crate::value::{Mapping, Value};
use std::collections::BTreeMap;
use std::path::{Path as FsPath, PathBuf};
use tracing::{debug, warn};

/// A flat snapshot of environment variables.
pub type Environ = BTreeMap<String, String>;

/// Something that can produce a configuration mapping.
pub trait ConfigSource {
    /// Name used in logs and errors.
    fn name(&self) -> &str;

    fn load(&self) -> ConfigResult<Mapping>;
}

/// Python-style `isupper`: at least one cased character and no lowercase one.
pub fn is_upper_name(name: &str) -> bool {
    name.chars().any(char::is_uppercase) && !name.chars().any(char::is_lowercase)
}

/// Keep public names, and only uppercase ones when `upper_only` is set.
fn select_names<I>(entries: I, upper_only: bool) -> Mapping
where
    I: IntoIterator<Item = (String, Value)>,
{
    entries
        .into_iter()
        .filter(|(name, _)| !name.starts_with('_'))
        .filter(|(name, _)| !upper_only || is_upper_name(name))
        .collect()
}

/// A fixed set of key/value definitions.
#[derive(Debug, Clone)]
pub struct PairsSource {
    name: String,
    entries: Vec<(String, Value)>,
    upper_only: bool,
}

impl PairsSource {
    pub fn new<I, K, V>(name: impl Into<String>, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self {
            name: name.into(),
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            upper_only: true,
        }
    }

    /// Also keep names that are not entirely uppercase.
    pub fn upper_only(mut self, enabled: bool) -> Self {
        self.upper_only = enabled;
        self
    }
}

impl ConfigSource for PairsSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> ConfigResult<Mapping> {
        Ok(select_names(self.entries.iter().cloned(), self.upper_only))
    }
}

/// A TOML definition file whose uppercase top-level keys become settings.
#[derive(Debug, Clone)]
pub struct ModuleSource {
    name: String,
    path: PathBuf,
    upper_only: bool,
}

impl ModuleSource {
    pub fn new(path: impl AsRef<FsPath>) -> Self {
        let path = path.as_ref().to_path_buf();
        Self {
            name: path.display().to_string(),
            path,
            upper_only: true,
        }
    }

    pub fn upper_only(mut self, enabled: bool) -> Self {
        self.upper_only = enabled;
        self
    }

    pub fn path(&self) -> &FsPath {
        &self.path
    }
}

impl ConfigSource for ModuleSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> ConfigResult<Mapping> {
        let content =
            std::fs::read_to_string(&self.path).map_err(|source| ConfigError::ModuleLoad {
                name: self.name.clone(),
                source,
            })?;

        let table: toml::Table = content.parse().map_err(|source| ConfigError::ModuleParse {
            name: self.name.clone(),
            source,
        })?;

        let entries = table.into_iter().map(|(k, v)| (k, Value::from(v)));
        let mapping = select_names(entries, self.upper_only);
        debug!(module = %self.name, keys = mapping.len(), "Loaded configuration module");
        Ok(mapping)
    }
}

/// An environment snapshot. Values are raw strings.
#[derive(Debug, Clone, Default)]
pub struct EnvSource {
    vars: Environ,
}

impl EnvSource {
    /// Snapshot the current process environment.
    ///
    /// Entries whose name or value is not valid Unicode are skipped.
    pub fn process() -> Self {
        let vars = std::env::vars_os()
            .filter_map(|(k, v)| match (k.into_string(), v.into_string()) {
                (Ok(k), Ok(v)) => Some((k, v)),
                (k, _) => {
                    warn!(name = ?k, "Skipping non-Unicode environment entry");
                    None
                }
            })
            .collect();
        Self { vars }
    }

    pub fn from_map(vars: Environ) -> Self {
        Self { vars }
    }

    pub fn vars(&self) -> &Environ {
        &self.vars
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvSource {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_map(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl ConfigSource for EnvSource {
    fn name(&self) -> &str {
        "environment"
    }

    fn load(&self) -> ConfigResult<Mapping> {
        Ok(self
            .vars
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect())
    }
}

/// Load a definition source as-is.
///
/// With `silent`, a source that cannot be found or read yields an empty
/// mapping instead of an error. Parse errors are always reported.
pub fn from_module(source: &dyn ConfigSource, silent: bool) -> ConfigResult<Mapping> {
    match source.load() {
        Err(e) if silent && e.is_load_failure() => {
            debug!(module = source.name(), error = %e, "Module unavailable, using empty mapping");
            Ok(Mapping::new())
        }
        other => other,
    }
}
