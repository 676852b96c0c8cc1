//! schema::flow_run
//!
//! Per-run aggregates of a flow: start and end times plus summed metrics.
//! Every version of a cell is kept so aggregation can see all contributions.

use crate::config::ConfigSource;
use crate::store::{Admin, BloomType, ColumnFamily, StoreError, TableSchema};
use crate::table::{TableAccess, TableDescriptor};

use super::INFO_FAMILY;

/// Configuration key overriding the flow run table name.
pub const TABLE_NAME_CONF: &str = "yarn.timeline-service.flowrun.table.name";

/// Default flow run table name.
pub const DEFAULT_TABLE_NAME: &str = "timelineservice.flowrun";

/// Versions kept in the info family: effectively unbounded.
pub const INFO_MAX_VERSIONS: u32 = i32::MAX as u32;

/// The flow run table.
#[derive(Debug, Clone)]
pub struct FlowRunTable {
    descriptor: TableDescriptor,
}

/// Shared instance.
pub static FLOW_RUN_TABLE: FlowRunTable = FlowRunTable::new();

impl FlowRunTable {
    pub const fn new() -> Self {
        Self {
            descriptor: TableDescriptor::new(TABLE_NAME_CONF, DEFAULT_TABLE_NAME),
        }
    }
}

impl Default for FlowRunTable {
    fn default() -> Self {
        Self::new()
    }
}

impl TableAccess for FlowRunTable {
    fn descriptor(&self) -> &TableDescriptor {
        &self.descriptor
    }

    fn kind(&self) -> &str {
        "flow_run"
    }

    fn create_table(&self, admin: &dyn Admin, conf: &dyn ConfigSource) -> Result<(), StoreError> {
        let schema = TableSchema::new(self.table_name(conf)).with_family(
            ColumnFamily::new(INFO_FAMILY)
                .with_bloom_filter(BloomType::RowCol)
                .with_block_cache(true)
                .with_max_versions(INFO_MAX_VERSIONS),
        );
        admin.create_table(schema)
    }
}
