//! Property tests for type-directed conversion.

mod common;

use common::{default_of, env};
use confcollect::{from_environ, parse_mapping, parse_sequence, Mapping, Value};
use proptest::prelude::*;

fn truthy() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["true", "1", "yes", "on"]).prop_flat_map(cased)
}

fn falsy() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["false", "0", "no", "off"]).prop_flat_map(cased)
}

/// Randomly upper- or lower-case each character of `word`.
fn cased(word: &'static str) -> impl Strategy<Value = String> {
    prop::collection::vec(any::<bool>(), word.len()).prop_map(move |flags| {
        word.chars()
            .zip(flags)
            .map(|(c, upper)| if upper { c.to_ascii_uppercase() } else { c })
            .collect()
    })
}

proptest! {
    #[test]
    fn bool_default_accepts_truthy(raw in truthy()) {
        let result = from_environ(&env(&[("FLAG", raw.as_str())]), &[], &default_of("FLAG", false), false)
            .expect("collects");
        prop_assert_eq!(&result["FLAG"], &Value::Bool(true));
    }

    #[test]
    fn bool_default_accepts_falsy(raw in falsy()) {
        let result = from_environ(&env(&[("FLAG", raw.as_str())]), &[], &default_of("FLAG", true), false)
            .expect("collects");
        prop_assert_eq!(&result["FLAG"], &Value::Bool(false));
    }

    #[test]
    fn int_default_yields_int(n in any::<i64>()) {
        let raw = n.to_string();
        let result = from_environ(&env(&[("N", raw.as_str())]), &[], &default_of("N", 0), false)
            .expect("collects");
        prop_assert_eq!(&result["N"], &Value::Int(n));
    }

    #[test]
    fn float_default_yields_float_for_integer_shapes(n in -1_000_000i64..1_000_000) {
        let raw = n.to_string();
        let result = from_environ(&env(&[("F", raw.as_str())]), &[], &default_of("F", 0.0), false)
            .expect("collects");
        prop_assert_eq!(&result["F"], &Value::Float(n as f64));
    }

    #[test]
    fn collection_is_idempotent(
        entries in prop::collection::btree_map("[A-Z]{1,6}", "[a-z0-9,=.]{0,12}", 0..8)
    ) {
        let environment: Vec<(&str, &str)> = entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        let environment = env(&environment);
        let defaults = Mapping::new();

        let first = from_environ(&environment, &[], &defaults, false).expect("collects");
        let second = from_environ(&environment, &[], &defaults, false).expect("collects");
        prop_assert_eq!(first, second);
    }

    #[test]
    fn sequence_never_yields_blank_items(raw in "[a-z ,]{0,24}") {
        for item in parse_sequence(&raw) {
            prop_assert!(!item.is_empty());
            prop_assert_eq!(item.trim(), item.as_str());
        }
    }

    #[test]
    fn mapping_of_integers_infers_integers(
        pairs in prop::collection::btree_map("[a-z]{1,5}", any::<i32>(), 1..6)
    ) {
        let raw = pairs
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(",");
        let parsed = parse_mapping(&raw, &Mapping::new()).expect("well formed");
        for (k, v) in &pairs {
            prop_assert_eq!(&parsed[k], &Value::Int(i64::from(*v)));
        }
    }
}
