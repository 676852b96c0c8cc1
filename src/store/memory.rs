//! store::memory
//!
//! In-memory wide-column store for tests and dry runs.
//!
//! # Design
//!
//! `MemoryStore` implements both [`Connection`] and [`Admin`]. State lives
//! behind an `Arc<Mutex<...>>`, so clones share one store. Every call is
//! recorded as a [`StoreOperation`] and any of them can be made to fail
//! through [`FailOn`].
//!
//! Semantics follow the real store closely enough for the table layer:
//! - Names are validated on every call
//! - Mutators buffer client-side; nothing is visible until `flush`/`close`
//! - A rejected flush leaves the whole batch queued; a put without cells is
//!   refused when queued
//! - Scanners are snapshots taken when opened
//! - Reads return at most `min(scan, family)` versions per column
//!
//! TTLs are stored but never expire data.
//!
//! # Example
//!
//! ```
//! use timeline_tables::store::memory::MemoryStore;
//! use timeline_tables::store::{
//!     Admin, BufferedMutator, ColumnFamily, Connection, Put, Scan, TableName, TableSchema,
//! };
//!
//! let store = MemoryStore::new();
//! let name = TableName::new("events");
//! store
//!     .create_table(TableSchema::new(name.clone()).with_family(ColumnFamily::new("i")))
//!     .unwrap();
//!
//! let mut mutator = store.buffered_mutator(&name).unwrap();
//! mutator.mutate(Put::new("row1").add("i", "k", "v").into()).unwrap();
//! mutator.close().unwrap();
//!
//! let rows: Vec<_> = store
//!     .table(&name)
//!     .unwrap()
//!     .scanner(&Scan::new())
//!     .unwrap()
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! assert_eq!(rows.len(), 1);
//! ```

use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::traits::{Admin, BufferedMutator, Connection, ResultScanner, StoreError, Table};
use super::types::{Cell, Mutation, Row, Scan, TableName, TableSchema};

/// Versions of one column, newest first.
type Versions = BTreeMap<Reverse<i64>, Vec<u8>>;
/// Columns of one row keyed by (family, qualifier).
type Columns = BTreeMap<(String, Vec<u8>), Versions>;

/// In-memory store.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    /// Internal state shared across clones.
    inner: Arc<Mutex<MemoryStoreInner>>,
}

#[derive(Debug, Default)]
struct MemoryStoreInner {
    tables: BTreeMap<TableName, MemTable>,
    /// Operation to fail on (for testing error paths).
    fail_on: Option<FailOn>,
    /// Recorded operations for verification.
    operations: Vec<StoreOperation>,
}

#[derive(Debug)]
struct MemTable {
    schema: TableSchema,
    enabled: bool,
    rows: BTreeMap<Vec<u8>, Columns>,
}

/// Configuration for which operation should fail.
#[derive(Debug)]
pub enum FailOn {
    /// Fail `Connection::buffered_mutator`.
    BufferedMutator(StoreError),
    /// Fail `Connection::table`.
    Table(StoreError),
    /// Fail `Table::scanner`.
    Scanner(StoreError),
    /// Fail mutator flushes (including the flush in `close`).
    Flush(StoreError),
    /// Fail `Admin::table_exists`.
    TableExists(StoreError),
    /// Fail `Admin::create_table`.
    CreateTable(StoreError),
}

/// Recorded operation for test verification.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreOperation {
    BufferedMutator { name: TableName },
    Table { name: TableName },
    Scanner { name: TableName, scan: Scan },
    Flush { name: TableName, mutations: usize },
    TableExists { name: TableName },
    CreateTable { schema: TableSchema },
    DisableTable { name: TableName },
    DeleteTable { name: TableName },
    ListTables,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MemoryStoreInner::default())),
        }
    }

    /// Configure the store to fail on a specific operation.
    ///
    /// # Example
    ///
    /// ```
    /// use std::io;
    /// use timeline_tables::store::memory::{FailOn, MemoryStore};
    /// use timeline_tables::store::StoreError;
    ///
    /// let store = MemoryStore::new().fail_on(FailOn::Table(StoreError::Io(
    ///     io::Error::new(io::ErrorKind::ConnectionAborted, "connection severed"),
    /// )));
    /// ```
    pub fn fail_on(self, fail_on: FailOn) -> Self {
        self.lock().fail_on = Some(fail_on);
        self
    }

    /// Clear the failure configuration.
    pub fn clear_fail_on(&self) {
        self.lock().fail_on = None;
    }

    /// Get all recorded operations.
    pub fn operations(&self) -> Vec<StoreOperation> {
        self.lock().operations.clone()
    }

    /// Clear recorded operations.
    pub fn clear_operations(&self) {
        self.lock().operations.clear();
    }

    /// Schema a table was created with.
    pub fn schema(&self, name: &TableName) -> Option<TableSchema> {
        self.lock().tables.get(name).map(|t| t.schema.clone())
    }

    /// Number of rows currently stored in a table.
    pub fn row_count(&self, name: &TableName) -> Option<usize> {
        self.lock().tables.get(name).map(|t| t.rows.len())
    }

    /// Lock the shared state, recovering from a poisoned lock.
    fn lock(&self) -> MutexGuard<'_, MemoryStoreInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record an operation.
    fn record(&self, op: StoreOperation) {
        self.lock().operations.push(op);
    }

    /// Check if we should fail and return the error if so.
    fn check_fail(&self, expected: &str) -> Result<(), StoreError> {
        let inner = self.lock();
        match &inner.fail_on {
            Some(FailOn::BufferedMutator(e)) if expected == "buffered_mutator" => {
                Err(clone_error(e))
            }
            Some(FailOn::Table(e)) if expected == "table" => Err(clone_error(e)),
            Some(FailOn::Scanner(e)) if expected == "scanner" => Err(clone_error(e)),
            Some(FailOn::Flush(e)) if expected == "flush" => Err(clone_error(e)),
            Some(FailOn::TableExists(e)) if expected == "table_exists" => Err(clone_error(e)),
            Some(FailOn::CreateTable(e)) if expected == "create_table" => Err(clone_error(e)),
            _ => Ok(()),
        }
    }

    /// Check that `name` is valid, exists, and is enabled.
    fn check_online(&self, name: &TableName) -> Result<(), StoreError> {
        name.validate()?;
        let inner = self.lock();
        match inner.tables.get(name) {
            None => Err(StoreError::TableNotFound(name.clone())),
            Some(t) if !t.enabled => Err(StoreError::TableDisabled(name.clone())),
            Some(_) => Ok(()),
        }
    }

    /// Apply a batch of mutations atomically.
    ///
    /// All families are checked before anything is written.
    fn apply(&self, name: &TableName, mutations: &[Mutation]) -> Result<(), StoreError> {
        let mut inner = self.lock();
        let table = match inner.tables.get_mut(name) {
            None => return Err(StoreError::TableNotFound(name.clone())),
            Some(t) if !t.enabled => return Err(StoreError::TableDisabled(name.clone())),
            Some(t) => t,
        };

        for mutation in mutations {
            let families: Vec<&str> = match mutation {
                Mutation::Put(put) => put.cells().iter().map(|c| c.family.as_str()).collect(),
                Mutation::Delete(delete) => delete.target_family().into_iter().collect(),
            };
            if let Some(missing) = families.iter().find(|f| table.schema.family(f).is_none()) {
                return Err(StoreError::InvalidSchema(format!(
                    "no such column family '{}' in {}",
                    missing, name
                )));
            }
        }

        for mutation in mutations {
            match mutation {
                Mutation::Put(put) => {
                    let columns = table.rows.entry(put.row().to_vec()).or_default();
                    for cell in put.cells() {
                        let max_versions = table
                            .schema
                            .family(&cell.family)
                            .map_or(1, |f| f.max_versions) as usize;
                        let versions = columns
                            .entry((cell.family.clone(), cell.qualifier.clone()))
                            .or_default();
                        versions.insert(Reverse(cell.timestamp), cell.value.clone());
                        while versions.len() > max_versions {
                            versions.pop_last();
                        }
                    }
                }
                Mutation::Delete(delete) => {
                    let row = delete.row_key().to_vec();
                    match (delete.target_family(), delete.target_qualifier()) {
                        (None, _) => {
                            table.rows.remove(&row);
                        }
                        (Some(family), qualifier) => {
                            if let Some(columns) = table.rows.get_mut(&row) {
                                columns.retain(|(f, q), _| {
                                    f != family || qualifier.is_some_and(|target| q != target)
                                });
                                if columns.is_empty() {
                                    table.rows.remove(&row);
                                }
                            }
                        }
                    }
                }
            }
        }

        Ok(())
    }

    /// Materialize the rows a scan selects.
    fn snapshot(&self, name: &TableName, scan: &Scan) -> Result<Vec<Row>, StoreError> {
        let inner = self.lock();
        let table = match inner.tables.get(name) {
            None => return Err(StoreError::TableNotFound(name.clone())),
            Some(t) if !t.enabled => return Err(StoreError::TableDisabled(name.clone())),
            Some(t) => t,
        };

        let mut rows = Vec::new();
        let start = scan.start_row().map(<[u8]>::to_vec).unwrap_or_default();
        for (key, columns) in table.rows.range(start..) {
            if scan.past_stop(key) {
                break;
            }
            if scan.limit().is_some_and(|limit| rows.len() >= limit) {
                break;
            }
            if !scan.includes_row(key) {
                continue;
            }

            let mut cells = Vec::new();
            for ((family, qualifier), versions) in columns {
                if !scan.includes_column(family, qualifier) {
                    continue;
                }
                let family_max = table
                    .schema
                    .family(family)
                    .map_or(1, |f| f.max_versions);
                let keep = scan.max_versions().min(family_max) as usize;
                cells.extend(
                    versions
                        .iter()
                        .filter(|(Reverse(ts), _)| scan.includes_timestamp(*ts))
                        .take(keep)
                        .map(|(Reverse(ts), value)| Cell {
                            family: family.clone(),
                            qualifier: qualifier.clone(),
                            timestamp: *ts,
                            value: value.clone(),
                        }),
                );
            }

            if !cells.is_empty() {
                rows.push(Row::new(key.clone(), cells));
            }
        }

        Ok(rows)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Clone a StoreError (needed because `std::io::Error` isn't Clone).
fn clone_error(e: &StoreError) -> StoreError {
    match e {
        StoreError::Io(err) => StoreError::Io(io::Error::new(err.kind(), err.to_string())),
        StoreError::TableNotFound(n) => StoreError::TableNotFound(n.clone()),
        StoreError::TableExists(n) => StoreError::TableExists(n.clone()),
        StoreError::TableDisabled(n) => StoreError::TableDisabled(n.clone()),
        StoreError::TableNotDisabled(n) => StoreError::TableNotDisabled(n.clone()),
        StoreError::InvalidTableName { name, reason } => StoreError::InvalidTableName {
            name: name.clone(),
            reason: reason.clone(),
        },
        StoreError::InvalidSchema(s) => StoreError::InvalidSchema(s.clone()),
        StoreError::Closed(n) => StoreError::Closed(n.clone()),
    }
}

impl Connection for MemoryStore {
    fn buffered_mutator(&self, name: &TableName) -> Result<Box<dyn BufferedMutator>, StoreError> {
        self.record(StoreOperation::BufferedMutator { name: name.clone() });
        self.check_fail("buffered_mutator")?;
        self.check_online(name)?;

        Ok(Box::new(MemoryMutator {
            store: self.clone(),
            name: name.clone(),
            buffer: Vec::new(),
            closed: false,
        }))
    }

    fn table(&self, name: &TableName) -> Result<Box<dyn Table>, StoreError> {
        self.record(StoreOperation::Table { name: name.clone() });
        self.check_fail("table")?;
        self.check_online(name)?;

        Ok(Box::new(MemoryTable {
            store: self.clone(),
            name: name.clone(),
        }))
    }
}

impl Admin for MemoryStore {
    fn table_exists(&self, name: &TableName) -> Result<bool, StoreError> {
        self.record(StoreOperation::TableExists { name: name.clone() });
        self.check_fail("table_exists")?;
        name.validate()?;
        Ok(self.lock().tables.contains_key(name))
    }

    fn create_table(&self, schema: TableSchema) -> Result<(), StoreError> {
        self.record(StoreOperation::CreateTable {
            schema: schema.clone(),
        });
        self.check_fail("create_table")?;
        schema.name.validate()?;
        schema.validate()?;

        let mut inner = self.lock();
        if inner.tables.contains_key(&schema.name) {
            return Err(StoreError::TableExists(schema.name.clone()));
        }
        inner.tables.insert(
            schema.name.clone(),
            MemTable {
                schema,
                enabled: true,
                rows: BTreeMap::new(),
            },
        );
        Ok(())
    }

    fn disable_table(&self, name: &TableName) -> Result<(), StoreError> {
        self.record(StoreOperation::DisableTable { name: name.clone() });
        let mut inner = self.lock();
        match inner.tables.get_mut(name) {
            None => Err(StoreError::TableNotFound(name.clone())),
            Some(t) if !t.enabled => Err(StoreError::TableDisabled(name.clone())),
            Some(t) => {
                t.enabled = false;
                Ok(())
            }
        }
    }

    fn delete_table(&self, name: &TableName) -> Result<(), StoreError> {
        self.record(StoreOperation::DeleteTable { name: name.clone() });
        let mut inner = self.lock();
        match inner.tables.get(name) {
            None => Err(StoreError::TableNotFound(name.clone())),
            Some(t) if t.enabled => Err(StoreError::TableNotDisabled(name.clone())),
            Some(_) => {
                inner.tables.remove(name);
                Ok(())
            }
        }
    }

    fn list_tables(&self) -> Result<Vec<TableName>, StoreError> {
        self.record(StoreOperation::ListTables);
        Ok(self.lock().tables.keys().cloned().collect())
    }
}

/// Buffered mutator over a [`MemoryStore`].
struct MemoryMutator {
    store: MemoryStore,
    name: TableName,
    buffer: Vec<Mutation>,
    closed: bool,
}

impl MemoryMutator {
    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.closed {
            return Err(StoreError::Closed(self.name.clone()));
        }
        Ok(())
    }
}

impl BufferedMutator for MemoryMutator {
    fn name(&self) -> &TableName {
        &self.name
    }

    fn mutate(&mut self, mutation: Mutation) -> Result<(), StoreError> {
        self.ensure_open()?;
        if let Mutation::Put(put) = &mutation {
            if put.cells().is_empty() {
                return Err(StoreError::InvalidSchema("no columns to insert".to_string()));
            }
        }
        self.buffer.push(mutation);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        self.ensure_open()?;
        self.store.record(StoreOperation::Flush {
            name: self.name.clone(),
            mutations: self.buffer.len(),
        });
        self.store.check_fail("flush")?;

        // a rejected batch stays queued
        self.store.apply(&self.name, &self.buffer)?;
        self.buffer.clear();
        Ok(())
    }

    fn close(&mut self) -> Result<(), StoreError> {
        self.ensure_open()?;
        let result = self.flush();
        self.closed = true;
        result
    }

    fn write_buffer_size(&self) -> usize {
        self.buffer.iter().map(Mutation::heap_size).sum()
    }
}

impl Drop for MemoryMutator {
    fn drop(&mut self) {
        if !self.buffer.is_empty() {
            log::warn!(
                "discarding {} unflushed mutation(s) for table {}",
                self.buffer.len(),
                self.name
            );
        }
    }
}

/// Read handle over a [`MemoryStore`].
struct MemoryTable {
    store: MemoryStore,
    name: TableName,
}

impl Table for MemoryTable {
    fn name(&self) -> &TableName {
        &self.name
    }

    fn scanner(&self, scan: &Scan) -> Result<Box<dyn ResultScanner>, StoreError> {
        self.store.record(StoreOperation::Scanner {
            name: self.name.clone(),
            scan: scan.clone(),
        });
        self.store.check_fail("scanner")?;

        let rows = self.store.snapshot(&self.name, scan)?;
        Ok(Box::new(MemoryScanner {
            rows: rows.into_iter(),
        }))
    }
}

/// Snapshot cursor.
struct MemoryScanner {
    rows: std::vec::IntoIter<Row>,
}

impl Iterator for MemoryScanner {
    type Item = Result<Row, StoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.rows.next().map(Ok)
    }
}

impl ResultScanner for MemoryScanner {
    fn close(&mut self) {
        self.rows = Vec::new().into_iter();
    }
}
