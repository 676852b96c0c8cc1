//! Timeline Tables - typed access to timeline storage on a wide-column store
//!
//! Every table of the timeline store is described once: the configuration key
//! that may rename it, the name it has otherwise, and the schema it is
//! created with. Writers handed out for a table carry the table's type, so a
//! writer for one table cannot be passed to code that writes another.
//!
//! # Architecture
//!
//! - [`config`] - Configuration sources and layered config files
//! - [`store`] - Interfaces to the wide-column store, plus an in-memory store
//! - [`table`] - Name resolution, typed writers, and the table access trait
//! - [`schema`] - The concrete timeline tables and their provisioning
//! - [`cli`] - The `tlt` command-line interface
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use timeline_tables::schema::{create_all_tables, FLOW_RUN_TABLE};
//! use timeline_tables::store::memory::MemoryStore;
//! use timeline_tables::table::TableAccess;
//!
//! let store = MemoryStore::new();
//! let conf: HashMap<String, String> = HashMap::new();
//!
//! let created = create_all_tables(&store, &conf, false).unwrap();
//! assert_eq!(created.len(), 5);
//!
//! let writer = FLOW_RUN_TABLE.writer(&conf, &store).unwrap();
//! assert_eq!(writer.table_name().as_str(), "timelineservice.flowrun");
//! ```

pub mod cli;
pub mod config;
pub mod schema;
pub mod store;
pub mod table;
