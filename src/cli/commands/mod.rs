//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler validates its arguments, builds the cluster handle
//! and the check batch, and formats output. Handlers are async at the core
//! (cluster access is network I/O) and bridge from the sync CLI with a
//! per-command tokio runtime.

mod doctor;

use anyhow::Result;

use super::args::Command;
use super::Context;

/// Dispatch a parsed command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Doctor {
            watch,
            interval,
            namespace,
        } => doctor::doctor(ctx, watch, interval, namespace),
    }
}
