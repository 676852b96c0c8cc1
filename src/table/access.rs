//! table::access
//!
//! The contract every table kind implements.
//!
//! # Design
//!
//! Name resolution, writer acquisition, and scanner acquisition are the same
//! for every table and are provided here. Provisioning is the one thing each
//! table kind must supply itself, through [`TableAccess::create_table`], so
//! its schema stays in its own module.
//!
//! Nothing here holds state beyond the descriptor. Each call resolves the
//! name afresh, asks the connection for a handle, and returns it. Errors
//! from the connection are returned as they are, without retries.
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use timeline_tables::schema::ENTITY_TABLE;
//! use timeline_tables::store::memory::MemoryStore;
//! use timeline_tables::store::{BufferedMutator, Put, Scan};
//! use timeline_tables::table::TableAccess;
//!
//! let store = MemoryStore::new();
//! let conf: HashMap<String, String> = HashMap::new();
//!
//! ENTITY_TABLE.create_table(&store, &conf).unwrap();
//!
//! let mut writer = ENTITY_TABLE.writer(&conf, &store).unwrap();
//! writer.mutate(Put::new("alice!c1!flow!1!app_1!YARN_CONTAINER!c_1").add("i", "state", "RUNNING").into()).unwrap();
//! writer.close().unwrap();
//!
//! let rows = ENTITY_TABLE
//!     .scanner(&conf, &store, &Scan::new().with_row_prefix("alice!"))
//!     .unwrap()
//!     .count();
//! assert_eq!(rows, 1);
//! ```

use super::{TableDescriptor, TypedWriter};
use crate::config::ConfigSource;
use crate::store::{Admin, Connection, ResultScanner, Scan, StoreError, TableName};

/// Shared access operations for one logical table kind.
///
/// Implementations are typically process-wide singletons, constructed once
/// and never mutated. The trait is object safe apart from
/// [`writer`](Self::writer), which needs the concrete kind for its tag.
pub trait TableAccess: Send + Sync + 'static {
    /// Name resolution settings for this table kind.
    fn descriptor(&self) -> &TableDescriptor;

    /// Provision the physical table.
    ///
    /// Call at most once per store. Implementations must create the table
    /// under [`table_name`](Self::table_name) and must not check for an
    /// existing table first; that decision belongs to the caller. Failures
    /// from `admin` are returned unchanged.
    fn create_table(&self, admin: &dyn Admin, conf: &dyn ConfigSource) -> Result<(), StoreError>;

    /// Short label for this table kind, used in logs and listings.
    fn kind(&self) -> &str {
        self.descriptor().default_name()
    }

    /// Physical name of this table under `conf`.
    fn table_name(&self, conf: &dyn ConfigSource) -> TableName {
        self.descriptor().resolve(conf)
    }

    /// Acquire a writer bound to this table kind.
    ///
    /// Each call returns an independent handle owned by the caller.
    fn writer(
        &self,
        conf: &dyn ConfigSource,
        conn: &dyn Connection,
    ) -> Result<TypedWriter<Self>, StoreError>
    where
        Self: Sized,
    {
        let name = self.table_name(conf);
        log::debug!("acquiring writer for {} table {}", self.kind(), name);

        let mutator = conn.buffered_mutator(&name)?;
        Ok(TypedWriter::new(mutator))
    }

    /// Open a scanner over `scan`, which is passed to the store unchanged.
    ///
    /// The scanner is owned by the caller.
    fn scanner(
        &self,
        conf: &dyn ConfigSource,
        conn: &dyn Connection,
        scan: &Scan,
    ) -> Result<Box<dyn ResultScanner>, StoreError> {
        let name = self.table_name(conf);
        log::debug!("opening scanner on {} table {}", self.kind(), name);

        let table = conn.table(&name)?;
        table.scanner(scan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::{FailOn, MemoryStore, StoreOperation};
    use crate::store::{ColumnFamily, TableSchema};
    use std::collections::HashMap;
    use std::io;

    #[derive(Debug)]
    struct EventsTable {
        descriptor: TableDescriptor,
    }

    static EVENTS: EventsTable = EventsTable {
        descriptor: TableDescriptor::new("my.table.name", "events"),
    };

    impl TableAccess for EventsTable {
        fn descriptor(&self) -> &TableDescriptor {
            &self.descriptor
        }

        fn create_table(
            &self,
            admin: &dyn Admin,
            conf: &dyn ConfigSource,
        ) -> Result<(), StoreError> {
            admin.create_table(
                TableSchema::new(self.table_name(conf)).with_family(ColumnFamily::new("e")),
            )
        }
    }

    fn empty() -> HashMap<String, String> {
        HashMap::new()
    }

    #[test]
    fn kind_defaults_to_default_name() {
        assert_eq!(EVENTS.kind(), "events");
    }

    #[test]
    fn writer_uses_resolved_name() {
        let store = MemoryStore::new();
        EVENTS.create_table(&store, &empty()).unwrap();
        store.clear_operations();

        let writer = EVENTS.writer(&empty(), &store).unwrap();

        assert_eq!(writer.table_name().as_str(), "events");
        assert_eq!(
            store.operations(),
            vec![StoreOperation::BufferedMutator {
                name: TableName::new("events")
            }]
        );
    }

    #[test]
    fn create_table_uses_configured_name() {
        let store = MemoryStore::new();
        let mut conf = empty();
        conf.insert("my.table.name".into(), "custom_events".into());

        EVENTS.create_table(&store, &conf).unwrap();

        assert!(store.schema(&TableName::new("custom_events")).is_some());
        assert!(store.schema(&TableName::new("events")).is_none());
    }

    #[test]
    fn scanner_error_propagates_unchanged() {
        let store = MemoryStore::new();
        EVENTS.create_table(&store, &empty()).unwrap();
        let store = store.fail_on(FailOn::Scanner(StoreError::Io(io::Error::new(
            io::ErrorKind::TimedOut,
            "region server timed out",
        ))));

        match EVENTS.scanner(&empty(), &store, &Scan::new()) {
            Err(StoreError::Io(e)) => {
                assert_eq!(e.kind(), io::ErrorKind::TimedOut);
                assert_eq!(e.to_string(), "region server timed out");
            }
            Err(other) => panic!("unexpected error: {:?}", other),
            Ok(_) => panic!("expected error"),
        }
    }

    #[test]
    fn usable_as_trait_object() {
        let tables: Vec<&dyn TableAccess> = vec![&EVENTS];
        let names: Vec<TableName> = tables.iter().map(|t| t.table_name(&empty())).collect();
        assert_eq!(names, vec![TableName::new("events")]);
    }
}
