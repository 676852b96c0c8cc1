//! config
//!
//! Configuration sources and layered configuration loading.
//!
//! # Overview
//!
//! Table names and schema options are looked up by dotted key
//! (e.g. `yarn.timeline-service.entity.table.name`) through the
//! [`ConfigSource`] trait. [`Config`] is the file-backed implementation used by
//! the `tlt` binary; plain maps implement the trait too, which is what tests
//! and embedding services usually pass.
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Defaults (supplied at each lookup site)
//! 2. Global config file
//! 3. Explicit config file (`--config`)
//! 4. Command-line overrides (`--set key=value`)
//!
//! # Global Config Locations
//!
//! Searched in order, first hit wins:
//! 1. `$TIMELINE_TABLES_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/timeline-tables/config.toml`
//! 3. `~/.timeline-tables/config.toml`
//!
//! # File Format
//!
//! TOML. Nested tables are flattened to dotted keys, so these are equivalent:
//!
//! ```toml
//! "yarn.timeline-service.entity.table.name" = "prod.entity"
//!
//! [yarn.timeline-service.entity.table]
//! name = "prod.entity"
//! ```

mod source;

pub use source::ConfigSource;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming the global config file.
pub const CONFIG_ENV_VAR: &str = "TIMELINE_TABLES_CONFIG";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Merged configuration from all sources.
///
/// Keys are stored flattened. Lookups through [`ConfigSource`] fall back to
/// the caller's default for anything not set by any layer.
#[derive(Debug, Clone, Default)]
pub struct Config {
    values: BTreeMap<String, String>,
    /// Files that contributed values, lowest precedence first
    loaded_from: Vec<PathBuf>,
}

impl Config {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from the global location, then `explicit` on top.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read or parsed,
    /// or if `explicit` names a file that does not exist. A missing global
    /// file is not an error.
    pub fn load(explicit: Option<&Path>) -> Result<Config, ConfigError> {
        let mut config = Config::new();

        if let Some(path) = Self::find_global() {
            config.merge_file(&path)?;
        }

        if let Some(path) = explicit {
            config.merge_file(path)?;
        }

        log::debug!(
            "loaded {} config value(s) from {} file(s)",
            config.values.len(),
            config.loaded_from.len()
        );
        Ok(config)
    }

    /// Load configuration from a single file.
    pub fn from_file(path: &Path) -> Result<Config, ConfigError> {
        let mut config = Config::new();
        config.merge_file(path)?;
        Ok(config)
    }

    /// Locate the global config file, if any.
    fn find_global() -> Option<PathBuf> {
        // 1. Check $TIMELINE_TABLES_CONFIG
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        // 2. Check $XDG_CONFIG_HOME/timeline-tables/config.toml
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("timeline-tables/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        // 3. Check ~/.timeline-tables/config.toml
        if let Some(home) = dirs::home_dir() {
            let path = home.join(".timeline-tables/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        None
    }

    /// Read `path` and overlay its values onto this configuration.
    pub fn merge_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let values = parse_toml(&contents, path)?;
        self.values.extend(values);
        self.loaded_from.push(path.to_path_buf());
        Ok(())
    }

    /// Apply `key=value` overrides, as given on the command line.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for an entry without `=` or with an
    /// empty key.
    pub fn apply_overrides<S: AsRef<str>>(&mut self, overrides: &[S]) -> Result<(), ConfigError> {
        for entry in overrides {
            let entry = entry.as_ref();
            let (key, value) = entry.split_once('=').ok_or_else(|| {
                ConfigError::InvalidValue(format!("override '{}' must be key=value", entry))
            })?;
            let key = key.trim();
            if key.is_empty() {
                return Err(ConfigError::InvalidValue(format!(
                    "override '{}' has an empty key",
                    entry
                )));
            }
            self.set(key, value);
        }
        Ok(())
    }

    /// Set a single value, replacing any existing one.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Get a value if some layer defines it.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Iterate over all defined values in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Files that contributed values, lowest precedence first.
    pub fn loaded_from(&self) -> &[PathBuf] {
        &self.loaded_from
    }
}

impl ConfigSource for Config {
    fn get(&self, key: &str, default: &str) -> String {
        self.value(key).unwrap_or(default).to_string()
    }
}

/// Parse TOML into flattened dotted keys.
fn parse_toml(contents: &str, path: &Path) -> Result<BTreeMap<String, String>, ConfigError> {
    let table: toml::Table = toml::from_str(contents).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut out = BTreeMap::new();
    flatten("", &table, &mut out, path)?;
    Ok(out)
}

fn flatten(
    prefix: &str,
    table: &toml::Table,
    out: &mut BTreeMap<String, String>,
    path: &Path,
) -> Result<(), ConfigError> {
    for (k, v) in table {
        let key = if prefix.is_empty() {
            k.clone()
        } else {
            format!("{}.{}", prefix, k)
        };

        let rendered = match v {
            toml::Value::Table(nested) => {
                flatten(&key, nested, out, path)?;
                continue;
            }
            toml::Value::String(s) => s.clone(),
            toml::Value::Integer(i) => i.to_string(),
            toml::Value::Float(f) => f.to_string(),
            toml::Value::Boolean(b) => b.to_string(),
            toml::Value::Datetime(d) => d.to_string(),
            toml::Value::Array(_) => {
                return Err(ConfigError::ParseError {
                    path: path.to_path_buf(),
                    message: format!("'{}': arrays are not supported", key),
                })
            }
        };
        out.insert(key, rendered);
    }
    Ok(())
}
