//! store::types
//!
//! Value types exchanged with the wide-column store.
//!
//! # Types
//!
//! - [`TableName`] - Physical table identifier, validated by the store layer
//! - [`Cell`], [`Put`], [`Delete`], [`Mutation`] - Write payloads
//! - [`Scan`] - Caller-built read range and column selection
//! - [`Row`] - One row returned by a scanner
//! - [`TableSchema`], [`ColumnFamily`], [`BloomType`] - Physical schema
//!
//! Name resolution produces a [`TableName`] without checking it. Validation
//! happens when a store is asked to do something with the name, matching
//! the rule that resolution itself cannot fail.

use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;

use super::StoreError;

/// A physical table name.
///
/// Accepted syntax (checked by [`TableName::validate`]):
/// - Optional `namespace:` prefix using `[A-Za-z0-9_]`
/// - Qualifier using `[A-Za-z0-9_.-]`, non-empty
/// - Qualifier cannot start with `.` or `-`
///
/// # Example
///
/// ```
/// use timeline_tables::store::TableName;
///
/// let name = TableName::new("prod:timelineservice.entity");
/// assert_eq!(name.namespace(), Some("prod"));
/// assert_eq!(name.qualifier(), "timelineservice.entity");
/// assert!(name.validate().is_ok());
///
/// assert!(TableName::new("has space").validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableName(String);

impl TableName {
    /// Wrap a name without validating it.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The namespace part, if the name has one.
    pub fn namespace(&self) -> Option<&str> {
        self.0.split_once(':').map(|(ns, _)| ns)
    }

    /// The name without its namespace.
    pub fn qualifier(&self) -> &str {
        match self.0.split_once(':') {
            Some((_, qualifier)) => qualifier,
            None => &self.0,
        }
    }

    /// Check the name against the store's naming rules.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidTableName` describing the first violation.
    pub fn validate(&self) -> Result<(), StoreError> {
        let invalid = |reason: &str| StoreError::InvalidTableName {
            name: self.0.clone(),
            reason: reason.to_string(),
        };

        if let Some(ns) = self.namespace() {
            if ns.is_empty() {
                return Err(invalid("namespace cannot be empty"));
            }
            if !ns.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(invalid("namespace may only contain [A-Za-z0-9_]"));
            }
        }

        let qualifier = self.qualifier();
        if qualifier.is_empty() {
            return Err(invalid("qualifier cannot be empty"));
        }
        if qualifier.starts_with('.') || qualifier.starts_with('-') {
            return Err(invalid("qualifier cannot start with '.' or '-'"));
        }
        if !qualifier
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        {
            return Err(invalid("qualifier may only contain [A-Za-z0-9_.-]"));
        }

        Ok(())
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for TableName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TableName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for TableName {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// A single versioned value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// Column family name
    pub family: String,
    /// Column qualifier
    pub qualifier: Vec<u8>,
    /// Version timestamp in milliseconds since the epoch
    pub timestamp: i64,
    /// Cell value
    pub value: Vec<u8>,
}

impl Cell {
    fn heap_size(&self) -> usize {
        self.family.len() + self.qualifier.len() + self.value.len() + 8
    }
}

/// Insert or overwrite cells in one row.
///
/// # Example
///
/// ```
/// use timeline_tables::store::Put;
///
/// let put = Put::new("user!cluster!flow")
///     .add("i", "created", "1700000000000")
///     .add_at("m", "memory", 42, "1024");
/// assert_eq!(put.cells().len(), 2);
/// assert_eq!(put.cells()[1].timestamp, 42);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Put {
    row: Vec<u8>,
    cells: Vec<Cell>,
}

impl Put {
    /// Start a put for `row`.
    pub fn new(row: impl Into<Vec<u8>>) -> Self {
        Self {
            row: row.into(),
            cells: Vec::new(),
        }
    }

    /// Add a cell stamped with the current time.
    pub fn add(
        self,
        family: impl Into<String>,
        qualifier: impl Into<Vec<u8>>,
        value: impl Into<Vec<u8>>,
    ) -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        self.add_at(family, qualifier, now, value)
    }

    /// Add a cell with an explicit version timestamp.
    pub fn add_at(
        mut self,
        family: impl Into<String>,
        qualifier: impl Into<Vec<u8>>,
        timestamp: i64,
        value: impl Into<Vec<u8>>,
    ) -> Self {
        self.cells.push(Cell {
            family: family.into(),
            qualifier: qualifier.into(),
            timestamp,
            value: value.into(),
        });
        self
    }

    /// Row key.
    pub fn row(&self) -> &[u8] {
        &self.row
    }

    /// Cells in insertion order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

/// Remove a whole row, one family of it, or one column of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delete {
    row: Vec<u8>,
    family: Option<String>,
    qualifier: Option<Vec<u8>>,
}

impl Delete {
    /// Delete the entire row.
    pub fn row(row: impl Into<Vec<u8>>) -> Self {
        Self {
            row: row.into(),
            family: None,
            qualifier: None,
        }
    }

    /// Delete every column of `family` in the row.
    pub fn family(row: impl Into<Vec<u8>>, family: impl Into<String>) -> Self {
        Self {
            row: row.into(),
            family: Some(family.into()),
            qualifier: None,
        }
    }

    /// Delete all versions of one column.
    pub fn column(
        row: impl Into<Vec<u8>>,
        family: impl Into<String>,
        qualifier: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            row: row.into(),
            family: Some(family.into()),
            qualifier: Some(qualifier.into()),
        }
    }

    /// Row key.
    pub fn row_key(&self) -> &[u8] {
        &self.row
    }

    /// Target family, if narrower than the whole row.
    pub fn target_family(&self) -> Option<&str> {
        self.family.as_deref()
    }

    /// Target qualifier, if narrower than the whole family.
    pub fn target_qualifier(&self) -> Option<&[u8]> {
        self.qualifier.as_deref()
    }
}

/// A write sent through a buffered mutator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Put(Put),
    Delete(Delete),
}

impl Mutation {
    /// Row key this mutation applies to.
    pub fn row(&self) -> &[u8] {
        match self {
            Mutation::Put(put) => put.row(),
            Mutation::Delete(delete) => delete.row_key(),
        }
    }

    /// Approximate size in bytes, used for write-buffer accounting.
    pub fn heap_size(&self) -> usize {
        match self {
            Mutation::Put(put) => put.row.len() + put.cells.iter().map(Cell::heap_size).sum::<usize>(),
            Mutation::Delete(delete) => {
                delete.row.len()
                    + delete.family.as_ref().map_or(0, String::len)
                    + delete.qualifier.as_ref().map_or(0, Vec::len)
            }
        }
    }
}

impl From<Put> for Mutation {
    fn from(put: Put) -> Self {
        Mutation::Put(put)
    }
}

impl From<Delete> for Mutation {
    fn from(delete: Delete) -> Self {
        Mutation::Delete(delete)
    }
}

/// A read range over a table.
///
/// Built by the caller and passed through the table layer untouched.
/// Defaults: whole table, all families, newest version only, no limit.
///
/// # Example
///
/// ```
/// use timeline_tables::store::Scan;
///
/// let scan = Scan::new()
///     .with_row_prefix("alice!")
///     .add_family("i")
///     .with_max_versions(3)
///     .with_limit(100);
/// assert!(scan.includes_row(b"alice!cluster1"));
/// assert!(!scan.includes_row(b"bob!cluster1"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scan {
    start_row: Option<Vec<u8>>,
    stop_row: Option<Vec<u8>>,
    row_prefix: Option<Vec<u8>>,
    families: BTreeSet<String>,
    columns: BTreeSet<(String, Vec<u8>)>,
    max_versions: u32,
    time_range: Option<(i64, i64)>,
    limit: Option<usize>,
}

impl Default for Scan {
    fn default() -> Self {
        Self {
            start_row: None,
            stop_row: None,
            row_prefix: None,
            families: BTreeSet::new(),
            columns: BTreeSet::new(),
            max_versions: 1,
            time_range: None,
            limit: None,
        }
    }
}

impl Scan {
    /// Scan the whole table.
    pub fn new() -> Self {
        Self::default()
    }

    /// First row to return (inclusive).
    pub fn with_start_row(mut self, row: impl Into<Vec<u8>>) -> Self {
        self.start_row = Some(row.into());
        self
    }

    /// Row at which to stop (exclusive).
    pub fn with_stop_row(mut self, row: impl Into<Vec<u8>>) -> Self {
        self.stop_row = Some(row.into());
        self
    }

    /// Only return rows whose key starts with `prefix`.
    pub fn with_row_prefix(mut self, prefix: impl Into<Vec<u8>>) -> Self {
        self.row_prefix = Some(prefix.into());
        self
    }

    /// Return every column of `family`.
    pub fn add_family(mut self, family: impl Into<String>) -> Self {
        self.families.insert(family.into());
        self
    }

    /// Return one specific column.
    pub fn add_column(mut self, family: impl Into<String>, qualifier: impl Into<Vec<u8>>) -> Self {
        self.columns.insert((family.into(), qualifier.into()));
        self
    }

    /// Maximum versions per column. Zero is treated as one.
    pub fn with_max_versions(mut self, versions: u32) -> Self {
        self.max_versions = versions.max(1);
        self
    }

    /// Only return versions with `min <= timestamp < max`.
    pub fn with_time_range(mut self, min: i64, max: i64) -> Self {
        self.time_range = Some((min, max));
        self
    }

    /// Stop after `rows` rows.
    pub fn with_limit(mut self, rows: usize) -> Self {
        self.limit = Some(rows);
        self
    }

    /// Maximum versions per column.
    pub fn max_versions(&self) -> u32 {
        self.max_versions
    }

    /// Row limit, if any.
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// First row, if bounded.
    pub fn start_row(&self) -> Option<&[u8]> {
        self.start_row.as_deref()
    }

    /// Whether `row` falls inside the start/stop/prefix bounds.
    pub fn includes_row(&self, row: &[u8]) -> bool {
        if let Some(start) = &self.start_row {
            if row < start.as_slice() {
                return false;
            }
        }
        if let Some(stop) = &self.stop_row {
            if row >= stop.as_slice() {
                return false;
            }
        }
        if let Some(prefix) = &self.row_prefix {
            if !row.starts_with(prefix) {
                return false;
            }
        }
        true
    }

    /// Whether `row` is at or past the stop row, so iteration can end.
    pub fn past_stop(&self, row: &[u8]) -> bool {
        self.stop_row
            .as_deref()
            .is_some_and(|stop| row >= stop)
    }

    /// Whether the column selection includes `family:qualifier`.
    ///
    /// With no families or columns selected, everything is included.
    pub fn includes_column(&self, family: &str, qualifier: &[u8]) -> bool {
        if self.families.is_empty() && self.columns.is_empty() {
            return true;
        }
        self.families.contains(family)
            || self
                .columns
                .iter()
                .any(|(f, q)| f == family && q.as_slice() == qualifier)
    }

    /// Whether a version with `timestamp` falls inside the time range.
    pub fn includes_timestamp(&self, timestamp: i64) -> bool {
        match self.time_range {
            Some((min, max)) => timestamp >= min && timestamp < max,
            None => true,
        }
    }
}

/// One row returned by a scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    key: Vec<u8>,
    cells: Vec<Cell>,
}

impl Row {
    /// Build a row from its key and cells.
    ///
    /// Cells are expected grouped by column with the newest version first.
    pub fn new(key: Vec<u8>, cells: Vec<Cell>) -> Self {
        Self { key, cells }
    }

    /// Row key.
    pub fn key(&self) -> &[u8] {
        &self.key
    }

    /// All returned cells.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Newest value of `family:qualifier`, if returned.
    pub fn value(&self, family: &str, qualifier: &[u8]) -> Option<&[u8]> {
        self.cells
            .iter()
            .find(|c| c.family == family && c.qualifier == qualifier)
            .map(|c| c.value.as_slice())
    }

    /// All returned versions of one column, newest first.
    pub fn versions<'a>(
        &'a self,
        family: &'a str,
        qualifier: &'a [u8],
    ) -> impl Iterator<Item = &'a Cell> + 'a {
        self.cells
            .iter()
            .filter(move |c| c.family == family && c.qualifier == qualifier)
    }
}

/// Bloom filter granularity for a column family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BloomType {
    None,
    /// Keyed on row
    #[default]
    Row,
    /// Keyed on row and column
    RowCol,
}

impl fmt::Display for BloomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BloomType::None => write!(f, "none"),
            BloomType::Row => write!(f, "row"),
            BloomType::RowCol => write!(f, "rowcol"),
        }
    }
}

/// Physical options of one column family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnFamily {
    pub name: String,
    pub max_versions: u32,
    pub min_versions: u32,
    /// Time to live; `None` keeps data forever
    pub ttl_seconds: Option<u32>,
    pub bloom_filter: BloomType,
    pub block_cache: bool,
    pub in_memory: bool,
}

impl ColumnFamily {
    /// A family with store defaults: one version, no TTL, row bloom filter.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            max_versions: 1,
            min_versions: 0,
            ttl_seconds: None,
            bloom_filter: BloomType::Row,
            block_cache: true,
            in_memory: false,
        }
    }

    pub fn with_max_versions(mut self, versions: u32) -> Self {
        self.max_versions = versions;
        self
    }

    pub fn with_min_versions(mut self, versions: u32) -> Self {
        self.min_versions = versions;
        self
    }

    pub fn with_ttl(mut self, seconds: u32) -> Self {
        self.ttl_seconds = Some(seconds);
        self
    }

    pub fn with_bloom_filter(mut self, bloom: BloomType) -> Self {
        self.bloom_filter = bloom;
        self
    }

    pub fn with_block_cache(mut self, enabled: bool) -> Self {
        self.block_cache = enabled;
        self
    }

    /// Prefer keeping this family's blocks cached.
    pub fn with_in_memory(mut self, enabled: bool) -> Self {
        self.in_memory = enabled;
        self
    }
}

/// Everything a store needs to provision one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSchema {
    pub name: TableName,
    pub families: Vec<ColumnFamily>,
    /// Region boundaries for pre-splitting, ascending
    #[serde(serialize_with = "serialize_split_keys")]
    pub split_keys: Vec<Vec<u8>>,
}

impl TableSchema {
    /// An empty schema for `name`.
    pub fn new(name: TableName) -> Self {
        Self {
            name,
            families: Vec::new(),
            split_keys: Vec::new(),
        }
    }

    pub fn with_family(mut self, family: ColumnFamily) -> Self {
        self.families.push(family);
        self
    }

    pub fn with_split_keys<K: AsRef<[u8]>>(mut self, keys: &[K]) -> Self {
        self.split_keys = keys.iter().map(|k| k.as_ref().to_vec()).collect();
        self
    }

    /// Look up a family by name.
    pub fn family(&self, name: &str) -> Option<&ColumnFamily> {
        self.families.iter().find(|f| f.name == name)
    }

    /// Check structural consistency.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidSchema` if there are no families, a family
    /// name is empty or repeated, versions are inconsistent, or split keys are
    /// not strictly ascending and non-empty.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.families.is_empty() {
            return Err(StoreError::InvalidSchema(format!(
                "table {} has no column families",
                self.name
            )));
        }

        let mut seen = BTreeSet::new();
        for family in &self.families {
            if family.name.is_empty() {
                return Err(StoreError::InvalidSchema(format!(
                    "table {} has an unnamed column family",
                    self.name
                )));
            }
            if !seen.insert(family.name.as_str()) {
                return Err(StoreError::InvalidSchema(format!(
                    "column family '{}' declared twice in {}",
                    family.name, self.name
                )));
            }
            if family.max_versions == 0 || family.min_versions > family.max_versions {
                return Err(StoreError::InvalidSchema(format!(
                    "column family '{}' has min_versions {} and max_versions {}",
                    family.name, family.min_versions, family.max_versions
                )));
            }
        }

        if self.split_keys.iter().any(Vec::is_empty) {
            return Err(StoreError::InvalidSchema(format!(
                "table {} has an empty split key",
                self.name
            )));
        }
        if self.split_keys.windows(2).any(|w| w[0] >= w[1]) {
            return Err(StoreError::InvalidSchema(format!(
                "split keys for {} must be strictly ascending",
                self.name
            )));
        }

        Ok(())
    }
}

fn serialize_split_keys<S: Serializer>(keys: &[Vec<u8>], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(keys.iter().map(|k| String::from_utf8_lossy(k)))
}
