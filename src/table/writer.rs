//! table::writer
//!
//! Buffered mutator tagged with the table kind it writes to.
//!
//! # Design
//!
//! Every table hands out the same kind of store mutator. Wrapping it in
//! `TypedWriter<Owner>` makes the table kind part of the type, so a writer
//! for one table cannot be passed where another table's writer is expected:
//!
//! ```compile_fail
//! use timeline_tables::schema::{EntityTable, FlowRunTable};
//! use timeline_tables::table::TypedWriter;
//!
//! fn store_entities(_writer: &mut TypedWriter<EntityTable>) {}
//!
//! fn misuse(writer: &mut TypedWriter<FlowRunTable>) {
//!     store_entities(writer);
//! }
//! ```
//!
//! The wrapper adds no behavior: every call is forwarded to the delegate
//! unchanged, including its buffering and flush semantics.
//!
//! # Release
//!
//! The caller owns the writer. [`TypedWriter::close`] flushes and releases
//! the delegate, reporting flush failures; simply dropping the writer
//! releases it without flushing. The table layer never finalizes a writer on
//! the caller's behalf.

use std::fmt;
use std::marker::PhantomData;

use crate::store::{BufferedMutator, Mutation, StoreError, TableName};

/// A buffered mutator that can only have come from table kind `T`.
///
/// Instances are created by [`TableAccess::writer`](super::TableAccess::writer)
/// and nowhere else.
pub struct TypedWriter<T> {
    delegate: Box<dyn BufferedMutator>,
    // fn() -> T: the tag never affects Send/Sync
    _owner: PhantomData<fn() -> T>,
}

impl<T> TypedWriter<T> {
    pub(crate) fn new(delegate: Box<dyn BufferedMutator>) -> Self {
        Self {
            delegate,
            _owner: PhantomData,
        }
    }

    /// Physical table this writer is bound to.
    pub fn table_name(&self) -> &TableName {
        self.delegate.name()
    }

    /// Flush outstanding mutations and release the delegate.
    pub fn close(mut self) -> Result<(), StoreError> {
        self.delegate.close()
    }
}

impl<T> BufferedMutator for TypedWriter<T> {
    fn name(&self) -> &TableName {
        self.delegate.name()
    }

    fn mutate(&mut self, mutation: Mutation) -> Result<(), StoreError> {
        self.delegate.mutate(mutation)
    }

    fn mutate_all(&mut self, mutations: Vec<Mutation>) -> Result<(), StoreError> {
        self.delegate.mutate_all(mutations)
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        self.delegate.flush()
    }

    fn close(&mut self) -> Result<(), StoreError> {
        self.delegate.close()
    }

    fn write_buffer_size(&self) -> usize {
        self.delegate.write_buffer_size()
    }
}

impl<T> fmt::Debug for TypedWriter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedWriter")
            .field("owner", &std::any::type_name::<T>())
            .field("table", self.delegate.name())
            .finish()
    }
}
