//! schema::application
//!
//! Application-level entities. Same layout as the entity table, keyed by
//! application instead of entity id.

use crate::config::ConfigSource;
use crate::store::{Admin, StoreError};
use crate::table::{TableAccess, TableDescriptor};

use super::entity_like_schema;

/// Configuration key overriding the application table name.
pub const TABLE_NAME_CONF: &str = "yarn.timeline-service.application.table.name";

/// Default application table name.
pub const DEFAULT_TABLE_NAME: &str = "timelineservice.application";

/// Configuration key for the metrics family TTL, in seconds.
pub const METRICS_TTL_CONF: &str = "yarn.timeline-service.application.table.metrics.ttl";

/// Configuration key for the versions kept per metric column.
pub const METRICS_MAX_VERSIONS_CONF: &str =
    "yarn.timeline-service.application.table.metrics.max-versions";

/// The application table.
#[derive(Debug, Clone)]
pub struct ApplicationTable {
    descriptor: TableDescriptor,
}

/// Shared instance.
pub static APPLICATION_TABLE: ApplicationTable = ApplicationTable::new();

impl ApplicationTable {
    pub const fn new() -> Self {
        Self {
            descriptor: TableDescriptor::new(TABLE_NAME_CONF, DEFAULT_TABLE_NAME),
        }
    }
}

impl Default for ApplicationTable {
    fn default() -> Self {
        Self::new()
    }
}

impl TableAccess for ApplicationTable {
    fn descriptor(&self) -> &TableDescriptor {
        &self.descriptor
    }

    fn kind(&self) -> &str {
        "application"
    }

    fn create_table(&self, admin: &dyn Admin, conf: &dyn ConfigSource) -> Result<(), StoreError> {
        let schema = entity_like_schema(
            self.table_name(conf),
            conf,
            METRICS_TTL_CONF,
            METRICS_MAX_VERSIONS_CONF,
        )?;
        admin.create_table(schema)
    }
}
