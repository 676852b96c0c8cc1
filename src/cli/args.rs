//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--config <path>`: Extra config file, layered over the global one
//! - `--set key=value`: Override a config value (repeatable)
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Timeline Tables - inspect and provision timeline storage tables
#[derive(Parser, Debug)]
#[command(name = "tlt")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file layered over the global one
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override a config value
    #[arg(long = "set", global = true, value_name = "KEY=VALUE")]
    pub overrides: Vec<String>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the physical name of every table
    #[command(
        name = "names",
        long_about = "Show the physical name of every table.\n\n\
            Each table has a configuration key that may rename it. This prints \
            the name each table resolves to under the current configuration, \
            one `<kind>\\t<name>` line per table.",
        after_help = "\
EXAMPLES:
    # Default names
    tlt names

    # Names with an override
    tlt --set yarn.timeline-service.entity.table.name=staging.entity names"
    )]
    Names,

    /// Provision every table into an in-memory store and show the schemas
    #[command(
        name = "plan",
        long_about = "Provision every table into an in-memory store and show the schemas.\n\n\
            Runs the same schema creation used against a live store, so invalid \
            names or schema options fail here first."
    )]
    Plan {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
