//! schema::app_to_flow
//!
//! Maps an application id to the flow and flow run it belongs to.

use crate::config::ConfigSource;
use crate::store::{Admin, BloomType, ColumnFamily, StoreError, TableSchema};
use crate::table::{TableAccess, TableDescriptor};

/// Configuration key overriding the app-to-flow table name.
pub const TABLE_NAME_CONF: &str = "yarn.timeline-service.app-flow.table.name";

/// Default app-to-flow table name.
pub const DEFAULT_TABLE_NAME: &str = "timelineservice.app_flow";

/// Family holding the flow mapping columns.
pub const MAPPING_FAMILY: &str = "m";

/// The app-to-flow table.
#[derive(Debug, Clone)]
pub struct AppToFlowTable {
    descriptor: TableDescriptor,
}

/// Shared instance.
pub static APP_TO_FLOW_TABLE: AppToFlowTable = AppToFlowTable::new();

impl AppToFlowTable {
    pub const fn new() -> Self {
        Self {
            descriptor: TableDescriptor::new(TABLE_NAME_CONF, DEFAULT_TABLE_NAME),
        }
    }
}

impl Default for AppToFlowTable {
    fn default() -> Self {
        Self::new()
    }
}

impl TableAccess for AppToFlowTable {
    fn descriptor(&self) -> &TableDescriptor {
        &self.descriptor
    }

    fn kind(&self) -> &str {
        "app_to_flow"
    }

    fn create_table(&self, admin: &dyn Admin, conf: &dyn ConfigSource) -> Result<(), StoreError> {
        let schema = TableSchema::new(self.table_name(conf)).with_family(
            ColumnFamily::new(MAPPING_FAMILY)
                .with_bloom_filter(BloomType::RowCol)
                .with_block_cache(true)
                .with_max_versions(1),
        );
        admin.create_table(schema)
    }
}
