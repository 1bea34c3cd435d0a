//! Default-driven spec inference.
//!
//! For each default key `K` the engine looks for the environment entry
//! `K.to_uppercase()` (prefixed when an environment prefix is configured).
//! Mapping defaults are only reachable in nested-dicts mode, where each child
//! `K2` is read from `K_K2`. Environment entries that match no default are
//! bootstrapped as new top-level keys with unconstrained inference. `K` and
//! every `K_K2` name belong to their default whether or not the mode is on,
//! so they are never bootstrapped.

use crate::collector::CollectOptions;
use crate::path::Path;
use crate::spec::Spec;
use crate::value::{DefaultKind, Mapping};
use std::collections::{BTreeMap, BTreeSet};
use tracing::trace;

/// Joins a parent and child key in nested-dicts mode.
pub const NESTED_SEPARATOR: &str = "_";

/// Derive one spec per resolvable environment entry.
pub fn infer_specs(
    environment: &BTreeMap<String, String>,
    defaults: &Mapping,
    options: &CollectOptions,
) -> Vec<Spec> {
    let mut specs = Vec::new();
    // Names claimed by a default, present in the environment or not.
    let mut claimed = BTreeSet::new();

    for (key, default) in defaults {
        let name = env_name(options, &[key.as_str()]);
        claimed.insert(name.clone());

        match (default.kind(), default.as_map()) {
            (DefaultKind::Mapping, Some(children)) => {
                let parent = Path::key(key.clone());
                for child in children.keys() {
                    let nested = env_name(options, &[key.as_str(), child.as_str()]);
                    claimed.insert(nested.clone());
                    if !options.nested_dicts {
                        continue;
                    }
                    if environment.contains_key(&nested) {
                        specs.push(Spec::inferred(nested, parent.child(child.clone())));
                    }
                }
                if !options.nested_dicts {
                    trace!(key = %key, "Skipping mapping default outside nested-dicts mode");
                }
            }
            _ => {
                if environment.contains_key(&name) {
                    specs.push(Spec::inferred(name, Path::key(key.clone())));
                }
            }
        }
    }

    if options.include_unknown {
        for name in environment.keys() {
            if claimed.contains(name) {
                continue;
            }
            if let Some(key) = unprefixed(options, name) {
                if key.is_empty() || defaults.contains_key(key) {
                    continue;
                }
                specs.push(Spec::bootstrapped(name.clone(), Path::key(key)));
            }
        }
    }

    specs
}

/// Environment name for a default key path, e.g. `["haystack", "url"]` to
/// `HAYSTACK_URL`, or `APP_HAYSTACK_URL` with prefix `APP`.
pub fn env_name(options: &CollectOptions, parts: &[&str]) -> String {
    let joined = parts
        .iter()
        .map(|part| part.to_uppercase())
        .collect::<Vec<_>>()
        .join(NESTED_SEPARATOR);
    match options.env_prefix.as_deref() {
        Some(prefix) if !prefix.is_empty() => {
            format!("{}{NESTED_SEPARATOR}{joined}", prefix.to_uppercase())
        }
        _ => joined,
    }
}

/// Strip the configured prefix; `None` if `name` does not carry it.
fn unprefixed<'a>(options: &CollectOptions, name: &'a str) -> Option<&'a str> {
    match options.env_prefix.as_deref() {
        Some(prefix) if !prefix.is_empty() => {
            let rest = name.strip_prefix(&prefix.to_uppercase())?;
            rest.strip_prefix(NESTED_SEPARATOR)
        }
        _ => Some(name),
    }
}
