//! schema::flow_activity
//!
//! Daily record of which flows ran, keyed by cluster and inverted day.

use crate::config::ConfigSource;
use crate::store::{Admin, BloomType, ColumnFamily, StoreError, TableSchema};
use crate::table::{TableAccess, TableDescriptor};

use super::INFO_FAMILY;

/// Configuration key overriding the flow activity table name.
pub const TABLE_NAME_CONF: &str = "yarn.timeline-service.flowactivity.table.name";

/// Default flow activity table name.
pub const DEFAULT_TABLE_NAME: &str = "timelineservice.flowactivity";

/// The flow activity table.
#[derive(Debug, Clone)]
pub struct FlowActivityTable {
    descriptor: TableDescriptor,
}

/// Shared instance.
pub static FLOW_ACTIVITY_TABLE: FlowActivityTable = FlowActivityTable::new();

impl FlowActivityTable {
    pub const fn new() -> Self {
        Self {
            descriptor: TableDescriptor::new(TABLE_NAME_CONF, DEFAULT_TABLE_NAME),
        }
    }
}

impl Default for FlowActivityTable {
    fn default() -> Self {
        Self::new()
    }
}

impl TableAccess for FlowActivityTable {
    fn descriptor(&self) -> &TableDescriptor {
        &self.descriptor
    }

    fn kind(&self) -> &str {
        "flow_activity"
    }

    fn create_table(&self, admin: &dyn Admin, conf: &dyn ConfigSource) -> Result<(), StoreError> {
        let schema = TableSchema::new(self.table_name(conf)).with_family(
            ColumnFamily::new(INFO_FAMILY)
                .with_bloom_filter(BloomType::RowCol)
                .with_block_cache(true),
        );
        admin.create_table(schema)
    }
}
