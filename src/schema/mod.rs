//! schema
//!
//! The concrete table kinds of the timeline store and their provisioning.
//!
//! # Tables
//!
//! | kind | default name | families |
//! |------|--------------|----------|
//! | [`EntityTable`] | `timelineservice.entity` | info, config, metrics |
//! | [`ApplicationTable`] | `timelineservice.application` | info, config, metrics |
//! | [`AppToFlowTable`] | `timelineservice.app_flow` | mapping |
//! | [`FlowActivityTable`] | `timelineservice.flowactivity` | info |
//! | [`FlowRunTable`] | `timelineservice.flowrun` | info |
//!
//! Each name can be overridden through the table's configuration key (see
//! the `TABLE_NAME_CONF` constant in each module).
//!
//! # Provisioning
//!
//! [`create_all_tables`] provisions every kind in a fixed order. Existence
//! checks, when wanted, happen there rather than inside the individual
//! `create_table` hooks.

mod app_to_flow;
mod application;
mod entity;
mod flow_activity;
mod flow_run;

pub use app_to_flow::{AppToFlowTable, APP_TO_FLOW_TABLE};
pub use application::{ApplicationTable, APPLICATION_TABLE};
pub use entity::{EntityTable, ENTITY_TABLE};
pub use flow_activity::{FlowActivityTable, FLOW_ACTIVITY_TABLE};
pub use flow_run::{FlowRunTable, FLOW_RUN_TABLE};

pub use app_to_flow::TABLE_NAME_CONF as APP_TO_FLOW_TABLE_NAME_CONF;
pub use application::TABLE_NAME_CONF as APPLICATION_TABLE_NAME_CONF;
pub use entity::TABLE_NAME_CONF as ENTITY_TABLE_NAME_CONF;
pub use flow_activity::TABLE_NAME_CONF as FLOW_ACTIVITY_TABLE_NAME_CONF;
pub use flow_run::TABLE_NAME_CONF as FLOW_RUN_TABLE_NAME_CONF;

use crate::config::ConfigSource;
use crate::store::{Admin, BloomType, ColumnFamily, StoreError, TableName, TableSchema};
use crate::table::TableAccess;

/// Prefix shared by every timeline-service configuration key.
pub const CONF_PREFIX: &str = "yarn.timeline-service.";

/// Info column family.
pub const INFO_FAMILY: &str = "i";
/// Config column family.
pub const CONFIG_FAMILY: &str = "c";
/// Metrics column family.
pub const METRICS_FAMILY: &str = "m";

/// Metrics are kept for 30 days unless configured otherwise.
pub const DEFAULT_METRICS_TTL_SECONDS: u32 = 2_592_000;
/// Versions kept per metric column unless configured otherwise.
pub const DEFAULT_METRICS_MAX_VERSIONS: u32 = 10_000;

/// Region boundaries for tables keyed by user name first.
pub const USERNAME_SPLITS: &[&str] = &[
    "a", "ad", "an", "b", "ca", "cl", "d", "e", "f", "g", "h", "i", "j", "k", "l", "m", "n", "o",
    "q", "r", "s", "se", "t", "u", "v", "w", "x", "y", "z",
];

/// Every table kind, in provisioning order.
pub fn all_tables() -> [&'static dyn TableAccess; 5] {
    [
        &ENTITY_TABLE,
        &APP_TO_FLOW_TABLE,
        &APPLICATION_TABLE,
        &FLOW_ACTIVITY_TABLE,
        &FLOW_RUN_TABLE,
    ]
}

/// Provision every table kind through its own `create_table`.
///
/// With `skip_existing`, tables that already exist are left alone and
/// skipped. Otherwise the first failure stops provisioning and is returned
/// unchanged; tables created before it are not rolled back.
///
/// Returns the names of the tables created.
pub fn create_all_tables(
    admin: &dyn Admin,
    conf: &dyn ConfigSource,
    skip_existing: bool,
) -> Result<Vec<TableName>, StoreError> {
    let mut created = Vec::new();

    for table in all_tables() {
        let name = table.table_name(conf);
        if skip_existing && admin.table_exists(&name)? {
            log::info!("skipping existing {} table {}", table.kind(), name);
            continue;
        }

        table.create_table(admin, conf)?;
        log::info!("created {} table {}", table.kind(), name);
        created.push(name);
    }

    Ok(created)
}

/// Schema shared by the entity and application tables.
///
/// Metrics TTL and max versions come from `ttl_conf` and `max_versions_conf`.
fn entity_like_schema(
    name: TableName,
    conf: &dyn ConfigSource,
    ttl_conf: &str,
    max_versions_conf: &str,
) -> Result<TableSchema, StoreError> {
    let ttl = conf
        .get_u32(ttl_conf, DEFAULT_METRICS_TTL_SECONDS)
        .map_err(|e| StoreError::InvalidSchema(e.to_string()))?;
    let max_versions = conf
        .get_u32(max_versions_conf, DEFAULT_METRICS_MAX_VERSIONS)
        .map_err(|e| StoreError::InvalidSchema(e.to_string()))?;

    Ok(TableSchema::new(name)
        .with_family(lookup_family(INFO_FAMILY))
        .with_family(lookup_family(CONFIG_FAMILY))
        .with_family(
            ColumnFamily::new(METRICS_FAMILY)
                .with_block_cache(true)
                .with_min_versions(1)
                .with_max_versions(max_versions)
                .with_ttl(ttl),
        )
        .with_split_keys(USERNAME_SPLITS))
}

/// A family read by exact column: row-col bloom filter, block cache on.
fn lookup_family(name: &str) -> ColumnFamily {
    ColumnFamily::new(name)
        .with_bloom_filter(BloomType::RowCol)
        .with_block_cache(true)
}
