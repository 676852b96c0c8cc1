//! names command - Print the resolved physical name of every table

use crate::cli::Context;
use crate::schema::all_tables;
use anyhow::Result;

/// Print `<kind>\t<name>` for each table, in provisioning order.
pub fn names(ctx: &Context) -> Result<()> {
    for table in all_tables() {
        let name = table.table_name(&ctx.config);
        if ctx.quiet {
            println!("{}", name);
        } else {
            println!("{}\t{}", table.kind(), name);
        }
    }
    Ok(())
}
