//! store
//!
//! Boundary to the wide-column store.
//!
//! # Architecture
//!
//! The table layer talks to the store only through the traits in this
//! module:
//!
//! - [`Connection`]: hands out buffered mutators and table read handles
//! - [`BufferedMutator`]: client-side write batching for one table
//! - [`Table`] / [`ResultScanner`]: reads over a caller-built [`Scan`]
//! - [`Admin`]: table provisioning and removal
//!
//! [`memory::MemoryStore`] implements all of them in process and is what the
//! tests and the `tlt plan` dry run use.

pub mod memory;
mod traits;
mod types;

pub use traits::{Admin, BufferedMutator, Connection, ResultScanner, StoreError, Table};
pub use types::{
    BloomType, Cell, ColumnFamily, Delete, Mutation, Put, Row, Scan, TableName, TableSchema,
};
