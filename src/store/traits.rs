//! store::traits
//!
//! Narrow interfaces to the wide-column store.
//!
//! # Design
//!
//! Connection management, write batching, DDL, and scan execution belong to
//! the store. The table layer only needs to:
//! - Obtain a buffered mutator or a read handle for a physical name
//! - Open a scanner over a caller-built [`Scan`]
//! - Hand an [`Admin`] to schema creation
//!
//! All calls are synchronous and may block on I/O. Timeouts, retries, and
//! cancellation are whatever the implementation provides.
//!
//! # Ownership
//!
//! Mutators and scanners are returned boxed and owned by the caller. Dropping
//! them releases the underlying resource; [`BufferedMutator::close`] is the
//! way to release a mutator while observing flush errors.

use thiserror::Error;

use super::types::{Mutation, Row, Scan, TableName, TableSchema};

/// Errors from store operations.
///
/// I/O errors are transparent: their `Display` and `source` are those of the
/// original `std::io::Error`.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Transport or storage failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The named table does not exist.
    #[error("table not found: {0}")]
    TableNotFound(TableName),

    /// A table with this name already exists.
    #[error("table already exists: {0}")]
    TableExists(TableName),

    /// The table is disabled and cannot serve reads or writes.
    #[error("table is disabled: {0}")]
    TableDisabled(TableName),

    /// The table must be disabled first.
    #[error("table is not disabled: {0}")]
    TableNotDisabled(TableName),

    /// The name violates the store's naming rules.
    #[error("invalid table name '{name}': {reason}")]
    InvalidTableName {
        /// The rejected name
        name: String,
        /// Which rule it broke
        reason: String,
    },

    /// Schema options the store cannot accept.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    /// The handle was already closed.
    #[error("handle closed for table {0}")]
    Closed(TableName),
}

/// A live connection to the store.
///
/// Shared read-only across callers; acquiring handles never mutates it.
pub trait Connection: Send + Sync {
    /// Get a buffered write handle for `name`.
    fn buffered_mutator(&self, name: &TableName) -> Result<Box<dyn BufferedMutator>, StoreError>;

    /// Get a read handle for `name`.
    fn table(&self, name: &TableName) -> Result<Box<dyn Table>, StoreError>;
}

/// A write handle that batches mutations client-side.
///
/// Visibility of buffered mutations to readers is decided by the store;
/// callers who need a write to be visible call [`flush`](Self::flush).
pub trait BufferedMutator: Send {
    /// Table this mutator writes to.
    fn name(&self) -> &TableName;

    /// Queue one mutation.
    fn mutate(&mut self, mutation: Mutation) -> Result<(), StoreError>;

    /// Queue several mutations in order.
    ///
    /// Stops at the first failure; earlier mutations stay queued.
    fn mutate_all(&mut self, mutations: Vec<Mutation>) -> Result<(), StoreError> {
        for mutation in mutations {
            self.mutate(mutation)?;
        }
        Ok(())
    }

    /// Send all queued mutations to the store.
    fn flush(&mut self) -> Result<(), StoreError>;

    /// Flush and release the handle. Further calls fail with `Closed`.
    fn close(&mut self) -> Result<(), StoreError>;

    /// Approximate bytes currently queued.
    fn write_buffer_size(&self) -> usize;
}

/// A read handle on one table.
pub trait Table: Send {
    /// Table this handle reads.
    fn name(&self) -> &TableName;

    /// Open a cursor over `scan`.
    ///
    /// The returned scanner does not borrow this handle.
    fn scanner(&self, scan: &Scan) -> Result<Box<dyn ResultScanner>, StoreError>;
}

/// A read cursor yielding rows in store order.
pub trait ResultScanner: Iterator<Item = Result<Row, StoreError>> + Send {
    /// Release server-side resources. Iteration ends afterwards.
    fn close(&mut self);
}

/// Administrative (DDL) operations.
pub trait Admin: Send + Sync {
    /// Whether a table named `name` exists.
    fn table_exists(&self, name: &TableName) -> Result<bool, StoreError>;

    /// Provision a table. Fails with `TableExists` if it is already there.
    fn create_table(&self, schema: TableSchema) -> Result<(), StoreError>;

    /// Take a table offline.
    fn disable_table(&self, name: &TableName) -> Result<(), StoreError>;

    /// Drop a disabled table and its data.
    fn delete_table(&self, name: &TableName) -> Result<(), StoreError>;

    /// All table names, ascending.
    fn list_tables(&self) -> Result<Vec<TableName>, StoreError>;
}
