//! End-to-end tests for typed table access.
//!
//! These drive `TableAccess` through the public API against both the
//! in-memory store and hand-written stub connections.

use std::collections::HashMap;
use std::fmt;
use std::io;
use std::sync::{Arc, Mutex};

use timeline_tables::config::ConfigSource;
use timeline_tables::store::memory::{FailOn, MemoryStore, StoreOperation};
use timeline_tables::store::{
    Admin, BufferedMutator, ColumnFamily, Connection, Put, ResultScanner, Scan, StoreError, Table,
    TableName, TableSchema,
};
use timeline_tables::table::{TableAccess, TableDescriptor};

// =============================================================================
// Test Fixtures
// =============================================================================

/// A table kind defined outside the crate, the way an embedding service would.
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

    fn create_table(&self, admin: &dyn Admin, conf: &dyn ConfigSource) -> Result<(), StoreError> {
        admin.create_table(
            TableSchema::new(self.table_name(conf)).with_family(ColumnFamily::new("e")),
        )
    }
}

fn empty_conf() -> HashMap<String, String> {
    HashMap::new()
}

fn custom_conf() -> HashMap<String, String> {
    let mut conf = HashMap::new();
    conf.insert("my.table.name".to_string(), "custom_events".to_string());
    conf
}

/// Error type used to prove an error arrives as the very value raised.
#[derive(Debug)]
struct Severed(u32);

impl fmt::Display for Severed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "connection severed (attempt {})", self.0)
    }
}

impl std::error::Error for Severed {}

/// Connection that records requested names and refuses every request.
#[derive(Default)]
struct RefusingConnection {
    requested: Mutex<Vec<String>>,
}

impl RefusingConnection {
    fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }

    fn refuse(&self, name: &TableName) -> StoreError {
        self.requested.lock().unwrap().push(name.to_string());
        StoreError::Io(io::Error::new(io::ErrorKind::BrokenPipe, Severed(3)))
    }
}

impl Connection for RefusingConnection {
    fn buffered_mutator(&self, name: &TableName) -> Result<Box<dyn BufferedMutator>, StoreError> {
        Err(self.refuse(name))
    }

    fn table(&self, name: &TableName) -> Result<Box<dyn Table>, StoreError> {
        Err(self.refuse(name))
    }
}

/// Connection whose table handles record every scan they are given.
#[derive(Default)]
struct RecordingConnection {
    scans: Arc<Mutex<Vec<(String, Scan)>>>,
}

struct RecordingTable {
    name: TableName,
    scans: Arc<Mutex<Vec<(String, Scan)>>>,
}

struct EmptyScanner;

impl Iterator for EmptyScanner {
    type Item = Result<timeline_tables::store::Row, StoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        None
    }
}

impl ResultScanner for EmptyScanner {
    fn close(&mut self) {}
}

impl Table for RecordingTable {
    fn name(&self) -> &TableName {
        &self.name
    }

    fn scanner(&self, scan: &Scan) -> Result<Box<dyn ResultScanner>, StoreError> {
        self.scans
            .lock()
            .unwrap()
            .push((self.name.to_string(), scan.clone()));
        Ok(Box::new(EmptyScanner))
    }
}

impl Connection for RecordingConnection {
    fn buffered_mutator(&self, name: &TableName) -> Result<Box<dyn BufferedMutator>, StoreError> {
        Err(StoreError::TableNotFound(name.clone()))
    }

    fn table(&self, name: &TableName) -> Result<Box<dyn Table>, StoreError> {
        Ok(Box::new(RecordingTable {
            name: name.clone(),
            scans: Arc::clone(&self.scans),
        }))
    }
}

// =============================================================================
// Name resolution
// =============================================================================

mod resolution {
    use super::*;

    #[test]
    fn configured_name_is_used() {
        assert_eq!(EVENTS.table_name(&custom_conf()).as_str(), "custom_events");
    }

    #[test]
    fn default_name_without_configuration() {
        assert_eq!(EVENTS.table_name(&empty_conf()).as_str(), "events");
    }

    #[test]
    fn kind_defaults_to_default_name() {
        assert_eq!(EVENTS.kind(), "events");
    }
}

// =============================================================================
// Writer acquisition
// =============================================================================

mod writers {
    use super::*;

    #[test]
    fn connection_sees_default_name() {
        let conn = RefusingConnection::default();
        let _ = EVENTS.writer(&empty_conf(), &conn);
        assert_eq!(conn.requested(), vec!["events"]);
    }

    #[test]
    fn connection_sees_configured_name() {
        let store = MemoryStore::new();
        EVENTS.create_table(&store, &custom_conf()).unwrap();

        let writer = EVENTS.writer(&custom_conf(), &store).unwrap();

        assert_eq!(writer.table_name().as_str(), "custom_events");
        assert!(store.operations().contains(&StoreOperation::BufferedMutator {
            name: TableName::new("custom_events"),
        }));
    }

    #[test]
    fn missing_table_surfaces_store_error() {
        let store = MemoryStore::new();
        match EVENTS.writer(&empty_conf(), &store) {
            Err(StoreError::TableNotFound(name)) => assert_eq!(name.as_str(), "events"),
            other => panic!("expected TableNotFound, got {:?}", other),
        }
    }

    #[test]
    fn two_writers_are_independent() {
        let store = MemoryStore::new();
        let conf = empty_conf();
        EVENTS.create_table(&store, &conf).unwrap();
        let name = EVENTS.table_name(&conf);

        let mut first = EVENTS.writer(&conf, &store).unwrap();
        let mut second = EVENTS.writer(&conf, &store).unwrap();

        first
            .mutate(Put::new("r1").add_at("e", "q", 1, "a").into())
            .unwrap();
        assert!(first.write_buffer_size() > 0);
        assert_eq!(second.write_buffer_size(), 0);

        // nothing is visible until the store is flushed to
        assert_eq!(store.row_count(&name), Some(0));

        second
            .mutate(Put::new("r2").add_at("e", "q", 1, "b").into())
            .unwrap();
        second.flush().unwrap();
        assert_eq!(store.row_count(&name), Some(1));

        first.close().unwrap();
        second.close().unwrap();
        assert_eq!(store.row_count(&name), Some(2));
    }

    #[test]
    fn flush_failure_reaches_caller() {
        let conf = empty_conf();
        let store = MemoryStore::new();
        EVENTS.create_table(&store, &conf).unwrap();
        let store = store.fail_on(FailOn::Flush(StoreError::Io(io::Error::new(
            io::ErrorKind::TimedOut,
            "region server timed out",
        ))));

        let mut writer = EVENTS.writer(&conf, &store).unwrap();
        writer
            .mutate(Put::new("r").add_at("e", "q", 1, "v").into())
            .unwrap();

        match writer.flush() {
            Err(StoreError::Io(e)) => {
                assert_eq!(e.kind(), io::ErrorKind::TimedOut);
                assert_eq!(e.to_string(), "region server timed out");
            }
            other => panic!("expected Io error, got {:?}", other),
        }
    }
}

// =============================================================================
// Scanner acquisition
// =============================================================================

mod scanners {
    use super::*;

    #[test]
    fn scan_is_forwarded_unchanged() {
        let conn = RecordingConnection::default();
        let sentinel = Scan::new()
            .with_start_row("sentinel-start")
            .with_stop_row("sentinel-stop")
            .add_column("e", "marker")
            .with_max_versions(17)
            .with_time_range(5, 500)
            .with_limit(3);

        let scanner = EVENTS.scanner(&custom_conf(), &conn, &sentinel).unwrap();
        assert_eq!(scanner.count(), 0);

        let scans = conn.scans.lock().unwrap();
        assert_eq!(scans.len(), 1);
        assert_eq!(scans[0].0, "custom_events");
        assert_eq!(scans[0].1, sentinel);
    }

    #[test]
    fn memory_store_observes_same_scan() {
        let store = MemoryStore::new();
        let conf = empty_conf();
        EVENTS.create_table(&store, &conf).unwrap();
        let scan = Scan::new().with_row_prefix("user!").add_family("e");

        let _ = EVENTS.scanner(&conf, &store, &scan).unwrap();

        assert!(store.operations().contains(&StoreOperation::Scanner {
            name: TableName::new("events"),
            scan,
        }));
    }

    #[test]
    fn read_handle_error_is_not_wrapped() {
        let conn = RefusingConnection::default();

        let err = match EVENTS.scanner(&empty_conf(), &conn, &Scan::new()) {
            Err(e) => e,
            Ok(_) => panic!("expected an error"),
        };

        match err {
            StoreError::Io(io_err) => {
                assert_eq!(io_err.kind(), io::ErrorKind::BrokenPipe);
                let inner = io_err
                    .get_ref()
                    .and_then(|e| e.downcast_ref::<Severed>())
                    .expect("original error preserved");
                assert_eq!(inner.0, 3);
            }
            other => panic!("expected Io error, got {:?}", other),
        }
        assert_eq!(conn.requested(), vec!["events"]);
    }

    #[test]
    fn injected_read_handle_failure_propagates() {
        let store = MemoryStore::new().fail_on(FailOn::Table(StoreError::Io(io::Error::new(
            io::ErrorKind::ConnectionAborted,
            "connection severed",
        ))));

        match EVENTS.scanner(&empty_conf(), &store, &Scan::new()) {
            Err(StoreError::Io(e)) => {
                assert_eq!(e.kind(), io::ErrorKind::ConnectionAborted);
                assert_eq!(e.to_string(), "connection severed");
            }
            Err(other) => panic!("expected Io error, got {:?}", other),
            Ok(_) => panic!("expected an error"),
        }
        // no scan was attempted
        assert!(!store
            .operations()
            .iter()
            .any(|op| matches!(op, StoreOperation::Scanner { .. })));
    }

    #[test]
    fn round_trip_through_typed_writer() {
        let store = MemoryStore::new();
        let conf = empty_conf();
        EVENTS.create_table(&store, &conf).unwrap();

        let mut writer = EVENTS.writer(&conf, &store).unwrap();
        writer
            .mutate_all(vec![
                Put::new("b").add_at("e", "kind", 1, "stop").into(),
                Put::new("a").add_at("e", "kind", 1, "start").into(),
            ])
            .unwrap();
        writer.close().unwrap();

        let rows: Vec<_> = EVENTS
            .scanner(&conf, &store, &Scan::new())
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        let keys: Vec<&[u8]> = rows.iter().map(|r| r.key()).collect();
        assert_eq!(keys, vec![&b"a"[..], &b"b"[..]]);
        assert_eq!(rows[0].value("e", b"kind"), Some(&b"start"[..]));
    }
}

// =============================================================================
// Schema creation
// =============================================================================

mod creation {
    use super::*;

    #[test]
    fn creates_under_resolved_name() {
        let store = MemoryStore::new();
        EVENTS.create_table(&store, &custom_conf()).unwrap();

        assert!(store.table_exists(&TableName::new("custom_events")).unwrap());
        assert!(!store.table_exists(&TableName::new("events")).unwrap());
    }

    #[test]
    fn second_creation_fails_in_store() {
        let store = MemoryStore::new();
        EVENTS.create_table(&store, &empty_conf()).unwrap();

        let again = EVENTS.create_table(&store, &empty_conf());
        assert!(matches!(again, Err(StoreError::TableExists(ref n)) if n.as_str() == "events"));
    }

    #[test]
    fn invalid_configured_name_rejected_by_store() {
        let mut conf = empty_conf();
        conf.insert("my.table.name".to_string(), "bad name!".to_string());

        let store = MemoryStore::new();
        let result = EVENTS.create_table(&store, &conf);

        assert!(matches!(result, Err(StoreError::InvalidTableName { .. })));
    }

    #[test]
    fn trait_objects_work() {
        let tables: Vec<&dyn TableAccess> = vec![&EVENTS];
        let store = MemoryStore::new();
        for table in tables {
            table.create_table(&store, &empty_conf()).unwrap();
        }
        assert_eq!(store.list_tables().unwrap(), vec![TableName::new("events")]);
    }
}
