//! Property-based tests for table name resolution.
//!
//! These tests use proptest to verify resolution invariants hold across
//! randomly generated keys, defaults, and configuration contents.

use std::collections::{BTreeMap, HashMap};

use proptest::prelude::*;

use timeline_tables::config::Config;
use timeline_tables::store::TableName;
use timeline_tables::table::TableDescriptor;

/// Strategy for dotted configuration keys.
fn conf_key() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z][a-z0-9-]{0,8}", 1..5).prop_map(|parts| parts.join("."))
}

/// Strategy for arbitrary configured values, including ones the store rejects.
fn any_value() -> impl Strategy<Value = String> {
    ".{0,40}"
}

/// Strategy for names the store accepts.
fn valid_table_name() -> impl Strategy<Value = String> {
    ("[a-z_]{1,10}", "[a-zA-Z0-9_][a-zA-Z0-9_.-]{0,20}")
        .prop_map(|(namespace, qualifier)| format!("{}:{}", namespace, qualifier))
}

proptest! {
    #[test]
    fn configured_value_wins_over_default(
        key in conf_key(),
        default in any_value(),
        value in any_value(),
        noise in prop::collection::btree_map(conf_key(), any_value(), 0..8),
    ) {
        let descriptor = TableDescriptor::owned(key.clone(), default);
        let mut conf: BTreeMap<String, String> = noise;
        conf.insert(key, value.clone());

        let name = descriptor.resolve(&conf);
        prop_assert_eq!(name.as_str(), value.as_str());
    }

    #[test]
    fn default_used_when_key_absent(
        key in conf_key(),
        default in any_value(),
        noise in prop::collection::hash_map(conf_key(), any_value(), 0..8),
    ) {
        let mut conf: HashMap<String, String> = noise;
        conf.remove(&key);
        let descriptor = TableDescriptor::owned(key, default.clone());

        let name = descriptor.resolve(&conf);
        prop_assert_eq!(name.as_str(), default.as_str());
    }

    #[test]
    fn resolution_is_repeatable(key in conf_key(), default in any_value(), value in any_value()) {
        let descriptor = TableDescriptor::owned(key.clone(), default);
        let mut conf = Config::new();
        conf.set(key, value);

        prop_assert_eq!(descriptor.resolve(&conf), descriptor.resolve(&conf));
    }

    #[test]
    fn generated_valid_names_validate(name in valid_table_name()) {
        prop_assert!(TableName::new(name).validate().is_ok());
    }

    #[test]
    fn names_with_spaces_never_validate(left in "[a-z]{1,8}", right in "[a-z]{1,8}") {
        let name = TableName::new(format!("{} {}", left, right));
        prop_assert!(name.validate().is_err());
    }
}
