//! Architecture enforcement tests.
//!
//! Table kinds must create their physical table under the name resolved from
//! configuration. A hardcoded name silently ignores a rename, so these tests
//! scan the schema sources for the patterns that would cause it.
//!
//! # Test Categories
//!
//! 1. **Resolved Names** - `create_table` uses `self.table_name(conf)`
//! 2. **No Name Literals** - default names appear only in their constant
//! 3. **Layering** - the library never installs a logger

use std::fs;
use std::path::Path;

/// Files in `src/schema` that do not define a table kind.
const NON_TABLE_FILES: &[&str] = &["mod.rs"];

fn table_kind_sources() -> Vec<(String, String)> {
    let schema_dir = Path::new("src/schema");
    let mut sources = Vec::new();

    for entry in fs::read_dir(schema_dir).expect("Failed to read schema directory") {
        let entry = entry.expect("Failed to read entry");
        let path = entry.path();

        if path.extension().map(|e| e == "rs").unwrap_or(false) {
            let filename = path.file_name().unwrap().to_str().unwrap().to_string();
            if NON_TABLE_FILES.contains(&filename.as_str()) {
                continue;
            }
            let content = fs::read_to_string(&path)
                .unwrap_or_else(|_| panic!("Failed to read {}", filename));
            sources.push((filename, content));
        }
    }

    sources.sort();
    sources
}

/// Source text before the test module, if any.
fn non_test_part(content: &str) -> &str {
    match content.find("#[cfg(test)]") {
        Some(idx) => &content[..idx],
        None => content,
    }
}

// =============================================================================
// Resolved Names
// =============================================================================

#[test]
fn every_table_kind_is_checked() {
    assert_eq!(
        table_kind_sources().len(),
        5,
        "Expected one source file per table kind"
    );
}

#[test]
fn create_table_uses_resolved_name() {
    let mut violations = Vec::new();

    for (filename, content) in table_kind_sources() {
        let code = non_test_part(&content);
        if !code.contains("fn create_table") {
            violations.push(format!("{}: does not implement create_table", filename));
            continue;
        }
        if !code.contains("self.table_name(conf)") {
            violations.push(format!(
                "{}: create_table must build its schema from self.table_name(conf)",
                filename
            ));
        }
        if code.contains("TableName::new(") {
            violations.push(format!(
                "{}: constructs a TableName directly instead of resolving it",
                filename
            ));
        }
    }

    assert!(
        violations.is_empty(),
        "Architecture violations found:\n  {}",
        violations.join("\n  ")
    );
}

// =============================================================================
// No Name Literals
// =============================================================================

#[test]
fn default_names_appear_once() {
    let mut violations = Vec::new();

    for (filename, content) in table_kind_sources() {
        let code = non_test_part(&content);
        let occurrences = code.matches("\"timelineservice.").count();
        if occurrences != 1 {
            violations.push(format!(
                "{}: expected the default name literal exactly once, found {}",
                filename, occurrences
            ));
        }
    }

    assert!(
        violations.is_empty(),
        "Architecture violations found:\n  {}",
        violations.join("\n  ")
    );
}

// =============================================================================
// Layering
// =============================================================================

#[test]
fn only_cli_installs_logger() {
    let mut violations = Vec::new();

    for dir in ["src/config", "src/store", "src/table", "src/schema"] {
        for entry in fs::read_dir(dir).expect("Failed to read source directory") {
            let path = entry.expect("Failed to read entry").path();
            let content = fs::read_to_string(&path).unwrap_or_default();
            if content.contains("env_logger") {
                violations.push(format!("{}: references env_logger", path.display()));
            }
        }
    }

    assert!(
        violations.is_empty(),
        "Library modules must only use the log facade:\n  {}",
        violations.join("\n  ")
    );
}
