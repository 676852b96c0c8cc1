//! table::descriptor
//!
//! Physical name resolution for a table kind.

use std::borrow::Cow;

use crate::config::ConfigSource;
use crate::store::TableName;

/// Where a table kind's physical name comes from.
///
/// Pairs the configuration key that may override the name with the name
/// used when it does not. Both are fixed for the life of the owning table.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use timeline_tables::table::TableDescriptor;
///
/// let descriptor = TableDescriptor::new("my.table.name", "events");
///
/// let empty: HashMap<String, String> = HashMap::new();
/// assert_eq!(descriptor.resolve(&empty).as_str(), "events");
///
/// let mut conf = HashMap::new();
/// conf.insert("my.table.name".to_string(), "custom_events".to_string());
/// assert_eq!(descriptor.resolve(&conf).as_str(), "custom_events");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableDescriptor {
    conf_key: Cow<'static, str>,
    default_name: Cow<'static, str>,
}

impl TableDescriptor {
    /// Descriptor with static key and default, usable in `static` items.
    pub const fn new(conf_key: &'static str, default_name: &'static str) -> Self {
        Self {
            conf_key: Cow::Borrowed(conf_key),
            default_name: Cow::Borrowed(default_name),
        }
    }

    /// Descriptor built from runtime strings.
    pub fn owned(conf_key: impl Into<String>, default_name: impl Into<String>) -> Self {
        Self {
            conf_key: Cow::Owned(conf_key.into()),
            default_name: Cow::Owned(default_name.into()),
        }
    }

    /// Configuration key that overrides the name.
    pub fn conf_key(&self) -> &str {
        &self.conf_key
    }

    /// Name used when the key is not configured.
    pub fn default_name(&self) -> &str {
        &self.default_name
    }

    /// Resolve the physical table name against `conf`.
    ///
    /// A configured value is used verbatim; otherwise the default. Nothing is
    /// cached and the result is not validated here.
    pub fn resolve(&self, conf: &dyn ConfigSource) -> TableName {
        TableName::new(conf.get(&self.conf_key, &self.default_name))
    }
}
