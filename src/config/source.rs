//! config::source
//!
//! The key-value lookup contract consumed by table name resolution and
//! schema creation.
//!
//! # Design
//!
//! `ConfigSource` is deliberately tiny: a string lookup with a caller-supplied
//! default. Absence of a key is never an error. Typed helpers are layered on
//! top as provided methods so every implementation gets them for free.
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use timeline_tables::config::ConfigSource;
//!
//! let mut conf = HashMap::new();
//! conf.insert("my.table.name".to_string(), "custom_events".to_string());
//!
//! // `HashMap::get` shadows the trait method, so call it through the trait.
//! assert_eq!(ConfigSource::get(&conf, "my.table.name", "events"), "custom_events");
//! assert_eq!(ConfigSource::get(&conf, "other.key", "events"), "events");
//! ```

use std::collections::{BTreeMap, HashMap};

use super::ConfigError;

/// A source of string configuration values.
///
/// Implementations must be pure lookups: no side effects, safe to call any
/// number of times from any thread.
pub trait ConfigSource: Send + Sync {
    /// Look up `key`, returning `default` when it is not defined.
    ///
    /// A defined value is returned verbatim, including the empty string.
    fn get(&self, key: &str, default: &str) -> String;

    /// Look up `key` as an unsigned integer.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the key is defined but does not
    /// parse as a `u32`. An absent key yields `default`.
    fn get_u32(&self, key: &str, default: u32) -> Result<u32, ConfigError> {
        let raw = self.get(key, &default.to_string());
        raw.trim().parse().map_err(|_| {
            ConfigError::InvalidValue(format!("'{}' is not a valid integer for {}", raw, key))
        })
    }
}

impl ConfigSource for HashMap<String, String> {
    fn get(&self, key: &str, default: &str) -> String {
        HashMap::get(self, key)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }
}

impl ConfigSource for BTreeMap<String, String> {
    fn get(&self, key: &str, default: &str) -> String {
        BTreeMap::get(self, key)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }
}
