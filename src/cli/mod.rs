//! cli
//!
//! Command-line interface layer for Timeline Tables.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Install the logger and load configuration
//! - Delegate to command handlers
//!
//! The library never installs a logger; this layer does, once, from
//! `--debug` or `RUST_LOG`.

pub mod args;
pub mod commands;

pub use args::Cli;

use crate::config::Config;
use anyhow::{Context as _, Result};

/// State shared by every command.
#[derive(Debug)]
pub struct Context {
    /// Merged configuration: global file, `--config`, then `--set`
    pub config: Config,
    pub quiet: bool,
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();
    init_logging(cli.debug);

    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    config
        .apply_overrides(&cli.overrides)
        .context("Invalid --set override")?;
    for (key, value) in config.iter() {
        log::debug!("config {} = {}", key, value);
    }

    let ctx = Context {
        config,
        quiet: cli.quiet,
    };

    commands::dispatch(cli.command, &ctx)
}

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    // RUST_LOG still wins when set
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .try_init();
}
