//! schema::entity
//!
//! Generic timeline entities, keyed by cluster, user, flow, flow run,
//! application, entity type and entity id.

use crate::config::ConfigSource;
use crate::store::{Admin, StoreError};
use crate::table::{TableAccess, TableDescriptor};

use super::entity_like_schema;

/// Configuration key overriding the entity table name.
pub const TABLE_NAME_CONF: &str = "yarn.timeline-service.entity.table.name";

/// Default entity table name.
pub const DEFAULT_TABLE_NAME: &str = "timelineservice.entity";

/// Configuration key for the metrics family TTL, in seconds.
pub const METRICS_TTL_CONF: &str = "yarn.timeline-service.entity.table.metrics.ttl";

/// Configuration key for the versions kept per metric column.
pub const METRICS_MAX_VERSIONS_CONF: &str =
    "yarn.timeline-service.entity.table.metrics.max-versions";

/// The entity table.
#[derive(Debug, Clone)]
pub struct EntityTable {
    descriptor: TableDescriptor,
}

/// Shared instance.
pub static ENTITY_TABLE: EntityTable = EntityTable::new();

impl EntityTable {
    pub const fn new() -> Self {
        Self {
            descriptor: TableDescriptor::new(TABLE_NAME_CONF, DEFAULT_TABLE_NAME),
        }
    }
}

impl Default for EntityTable {
    fn default() -> Self {
        Self::new()
    }
}

impl TableAccess for EntityTable {
    fn descriptor(&self) -> &TableDescriptor {
        &self.descriptor
    }

    fn kind(&self) -> &str {
        "entity"
    }

    /// Info, config and metrics families, pre-split by user name.
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
