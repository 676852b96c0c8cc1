//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! Each handler reads the shared [`Context`], does its work against the
//! library, and formats output. Handlers return `anyhow` errors with context
//! attached; the binary prints the chain.

mod names;
mod plan;

pub use names::names;
pub use plan::plan;

use super::args::Command;
use super::Context;
use anyhow::Result;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Names => names(ctx),
        Command::Plan { json } => plan(ctx, json),
    }
}
