//! Collects configuration from an environment snapshot.
//!
//! A run merges caller-supplied specs with specs inferred from the defaults,
//! then executes each one (read, convert, write) into a copy of the defaults.
//! Either the fully merged mapping is returned or the first failure is.

use crate::error::{ConfigError, ConfigResult};
use crate::infer::infer_specs;
use crate::path::{read_path, write_path, Path};
use crate::spec::{Spec, SpecOrigin};
use crate::value::Mapping;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, trace, warn};

/// Options for a collection run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectOptions {
    /// Explode mapping defaults into `PARENT_CHILD` environment entries
    pub nested_dicts: bool,
    /// Lowercase top-level keys of the result
    pub key_lower: bool,
    /// Prefix prepended (with `_`) to every inferred environment name
    pub env_prefix: Option<String>,
    /// Add environment entries that match no default as new keys
    pub include_unknown: bool,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            nested_dicts: false,
            key_lower: false,
            env_prefix: None,
            include_unknown: true,
        }
    }
}

impl CollectOptions {
    pub fn nested_dicts(mut self, enabled: bool) -> Self {
        self.nested_dicts = enabled;
        self
    }

    pub fn key_lower(mut self, enabled: bool) -> Self {
        self.key_lower = enabled;
        self
    }

    pub fn env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    pub fn include_unknown(mut self, enabled: bool) -> Self {
        self.include_unknown = enabled;
        self
    }
}

/// Runs specs against an environment snapshot.
#[derive(Debug, Clone, Default)]
pub struct Collector {
    options: CollectOptions,
}

impl Collector {
    pub fn new(options: CollectOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CollectOptions {
        &self.options
    }

    /// Collect configuration, starting from `defaults`.
    ///
    /// Neither `environment` nor `defaults` is modified. Specs whose source
    /// entries are all missing are skipped.
    pub fn collect(
        &self,
        environment: &BTreeMap<String, String>,
        explicit: &[Spec],
        defaults: &Mapping,
    ) -> ConfigResult<Mapping> {
        for spec in explicit {
            spec.validate()?;
        }

        let inferred = infer_specs(environment, defaults, &self.options);
        let plan = merge_specs(explicit, inferred);

        let mut result = defaults.clone();
        let mut applied = 0usize;
        for spec in &plan {
            let Some((name, raw)) = spec.read(environment) else {
                trace!(path = %spec.write_path(), "No source entry, skipping spec");
                continue;
            };

            let default = read_path(defaults, spec.write_path());
            let value = spec
                .apply(raw, default)
                .map_err(|e| ConfigError::from_convert(name, e))?;

            debug!(
                source = name,
                path = %spec.write_path(),
                origin = ?spec.origin(),
                "Applying environment value"
            );
            write_path(&mut result, spec.write_path(), value);
            applied += 1;
        }

        if self.options.key_lower {
            result = lower_keys(result);
        }

        info!(
            applied,
            planned = plan.len(),
            keys = result.len(),
            "Collected configuration from environment"
        );
        Ok(result)
    }
}

/// Inferred specs first, then explicit specs in caller order. A derived spec
/// is dropped when an explicit spec writes the same path; a bootstrapped one
/// is also dropped when an explicit spec reads the same environment entry.
fn merge_specs(explicit: &[Spec], inferred: Vec<Spec>) -> Vec<Spec> {
    let explicit_paths: BTreeSet<&Path> = explicit.iter().map(Spec::write_path).collect();
    let explicit_reads: BTreeSet<&str> = explicit
        .iter()
        .flat_map(|spec| spec.read_keys().iter().map(String::as_str))
        .collect();

    let mut plan: Vec<Spec> = inferred
        .into_iter()
        .filter(|spec| {
            let shadowed = explicit_paths.contains(spec.write_path())
                || (spec.origin() == SpecOrigin::Bootstrapped
                    && spec
                        .read_keys()
                        .iter()
                        .any(|key| explicit_reads.contains(key.as_str())));
            if shadowed {
                trace!(path = %spec.write_path(), "Explicit spec overrides inferred spec");
            }
            !shadowed
        })
        .collect();
    plan.extend(explicit.iter().cloned());
    plan
}

/// Lowercase top-level keys. Keys that collide after lowercasing keep the
/// value of the last original key in sorted order (`A` loses to `a`).
fn lower_keys(map: Mapping) -> Mapping {
    let mut lowered = Mapping::new();
    for (key, value) in map {
        let lower = key.to_lowercase();
        if lowered.insert(lower.clone(), value).is_some() {
            warn!(key = %key, lowered = %lower, "Lowercased key collides, keeping later value");
        }
    }
    lowered
}

/// Collect from `environment` with the given explicit specs and defaults.
pub fn from_environ(
    environment: &BTreeMap<String, String>,
    explicit_specs: &[Spec],
    by_defaults: &Mapping,
    nested_dicts: bool,
) -> ConfigResult<Mapping> {
    Collector::new(CollectOptions::default().nested_dicts(nested_dicts)).collect(
        environment,
        explicit_specs,
        by_defaults,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;
    use pretty_assertions::assert_eq;

    fn env(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_empty_environment_returns_defaults() {
        let mut defaults = Mapping::new();
        defaults.insert("X".into(), Value::Int(5));
        assert_eq!(from_environ(&env(&[]), &[], &defaults, false).expect("ok"), defaults);
    }

    #[test]
    fn test_typed_overrides() {
        let mut defaults = Mapping::new();
        defaults.insert("debug".into(), Value::Bool(false));
        defaults.insert("workers".into(), Value::Int(1));
        defaults.insert("ratio".into(), Value::Float(0.5));
        defaults.insert("name".into(), Value::from("svc"));

        let environment = env(&[("DEBUG", "yes"), ("WORKERS", "42"), ("RATIO", "4")]);
        let result = from_environ(&environment, &[], &defaults, false).expect("ok");

        assert_eq!(result["debug"], Value::Bool(true));
        assert_eq!(result["workers"], Value::Int(42));
        assert_eq!(result["ratio"], Value::Float(4.0));
        assert_eq!(result["name"], Value::from("svc"));
    }

    #[test]
    fn test_explicit_spec_wins_over_inferred() {
        let mut defaults = Mapping::new();
        defaults.insert("port".into(), Value::Int(80));

        let environment = env(&[("PORT", "8080"), ("LISTEN_PORT", "9090")]);
        let explicit = [Spec::new("LISTEN_PORT").write_to(Path::key("port"))];
        let result = from_environ(&environment, &explicit, &defaults, false).expect("ok");

        assert_eq!(result["port"], Value::Int(9090));
        assert!(!result.contains_key("LISTEN_PORT"));
    }

    #[test]
    fn test_explicit_spec_with_missing_source_is_skipped() {
        let mut defaults = Mapping::new();
        defaults.insert("port".into(), Value::Int(80));

        let explicit = [Spec::new("LISTEN_PORT").write_to(Path::key("port"))];
        let result = from_environ(&env(&[("PORT", "8080")]), &explicit, &defaults, false)
            .expect("ok");

        // The inferred spec was shadowed and the explicit one had no source.
        assert_eq!(result["port"], Value::Int(80));
    }

    #[test]
    fn test_failure_is_atomic() {
        let mut defaults = Mapping::new();
        defaults.insert("port".into(), Value::Int(80));

        let err = from_environ(&env(&[("PORT", "http")]), &[], &defaults, false)
            .expect_err("must fail");
        assert!(matches!(
            err,
            ConfigError::TypeCoercion { ref key, ref raw, expected: "integer" }
                if key == "PORT" && raw == "http"
        ));
    }

    #[test]
    fn test_invalid_explicit_spec() {
        let err = from_environ(&env(&[]), &[Spec::new("")], &Mapping::new(), false)
            .expect_err("must fail");
        assert!(matches!(err, ConfigError::InvalidSpec(_)));
    }

    #[test]
    fn test_key_lower() {
        let collector = Collector::new(CollectOptions::default().key_lower(true));
        let result = collector
            .collect(&env(&[("NEW", "1")]), &[], &Mapping::new())
            .expect("ok");
        assert_eq!(result.get("new"), Some(&Value::Int(1)));
    }

    #[test]
    fn test_merge_keeps_unshadowed_inferred() {
        let inferred = vec![
            Spec::new("A").write_to(Path::key("a")),
            Spec::new("B").write_to(Path::key("b")),
        ];
        let explicit = [
            Spec::new("OTHER").write_to(Path::key("b")),
            Spec::new("C").write_to(Path::key("c")),
        ];
        let plan = merge_specs(&explicit, inferred);

        let reads: Vec<&str> = plan.iter().map(|s| s.read_keys()[0].as_str()).collect();
        assert_eq!(reads, vec!["A", "OTHER", "C"]);
    }

    #[test]
    fn test_shared_read_key_only_shadows_bootstrapped() {
        let inferred = vec![
            Spec::inferred("PORT", Path::key("port")),
            Spec::bootstrapped("EXTRA", Path::key("EXTRA")),
        ];
        let explicit = [
            Spec::new("PORT").write_to(Path::dotted("server.port").expect("valid")),
            Spec::new("EXTRA").write_to(Path::dotted("extra.value").expect("valid")),
        ];
        let plan = merge_specs(&explicit, inferred);

        let paths: Vec<String> = plan.iter().map(|s| s.write_path().to_string()).collect();
        assert_eq!(paths, vec!["port", "server.port", "extra.value"]);
    }

    #[test]
    fn test_key_lower_collision_keeps_later_key() {
        let mut map = Mapping::new();
        map.insert("A".into(), Value::Int(1));
        map.insert("a".into(), Value::Int(2));
        map.insert("B".into(), Value::Int(3));

        let lowered = lower_keys(map);
        assert_eq!(lowered.len(), 2);
        assert_eq!(lowered["a"], Value::Int(2));
        assert_eq!(lowered["b"], Value::Int(3));
    }
}
