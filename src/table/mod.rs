//! table
//!
//! Typed access to the logical tables of the timeline store.
//!
//! # Overview
//!
//! - [`TableDescriptor`]: configuration key plus default physical name
//! - [`TypedWriter`]: a store mutator tagged with the table kind it belongs to
//! - [`TableAccess`]: the contract each table kind implements; name
//!   resolution, writers, and scanners are shared, provisioning is per kind
//!
//! Concrete table kinds live in [`crate::schema`].

mod access;
mod descriptor;
mod writer;

pub use access::TableAccess;
pub use descriptor::TableDescriptor;
pub use writer::TypedWriter;
