//! plan command - Provision all tables into an in-memory store
//!
//! Nothing touches a live store. The command shows exactly what schema
//! creation would ask the store for.

use crate::cli::Context;
use crate::schema::{all_tables, create_all_tables};
use crate::store::memory::MemoryStore;
use crate::store::TableSchema;
use anyhow::{Context as _, Result};

/// Run schema creation for every table and print the results.
pub fn plan(ctx: &Context, json: bool) -> Result<()> {
    let store = MemoryStore::new();
    let created =
        create_all_tables(&store, &ctx.config, false).context("Failed to provision tables")?;

    let schemas: Vec<TableSchema> = created
        .iter()
        .filter_map(|name| store.schema(name))
        .collect();

    if json {
        let rendered =
            serde_json::to_string_pretty(&schemas).context("Failed to serialize schemas")?;
        println!("{}", rendered);
        return Ok(());
    }

    let kinds = all_tables();
    for (schema, table) in schemas.iter().zip(kinds.iter()) {
        print_schema(schema, table.kind(), ctx.quiet);
    }
    Ok(())
}

fn print_schema(schema: &TableSchema, kind: &str, quiet: bool) {
    if quiet {
        println!("{}", schema.name);
        return;
    }

    println!("{} ({})", schema.name, kind);
    for family in &schema.families {
        let ttl = family
            .ttl_seconds
            .map_or_else(|| "forever".to_string(), |s| format!("{}s", s));
        println!(
            "  family {}: versions {}..={}, ttl {}, bloom {}, block cache {}, in memory {}",
            family.name,
            family.min_versions,
            family.max_versions,
            ttl,
            family.bloom_filter,
            on_off(family.block_cache),
            on_off(family.in_memory)
        );
    }
    if !schema.split_keys.is_empty() {
        println!("  {} split keys", schema.split_keys.len());
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}
