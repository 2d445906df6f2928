//! cli
//!
//! Command-line interface layer for fluxdoctor.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Initialize logging
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap and dispatches to
//! command handlers; all cluster access flows through the explicit
//! [`crate::cluster::Cluster`] handle the handlers construct — there is no
//! process-wide client state.

pub mod args;
pub mod commands;

pub use args::Cli;

use std::path::PathBuf;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use crate::ui::Verbosity;

/// Context shared by all command handlers.
#[derive(Debug, Clone)]
pub struct Context {
    /// Explicit kubeconfig path, if given.
    pub kubeconfig: Option<PathBuf>,
    /// Explicit doctor config path, if given.
    pub config: Option<PathBuf>,
    /// Output verbosity.
    pub verbosity: Verbosity,
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();

    init_tracing(cli.debug);

    let ctx = Context {
        kubeconfig: cli.kubeconfig.clone(),
        config: cli.config.clone(),
        verbosity: Verbosity::from_flags(cli.quiet, cli.debug),
    };

    commands::dispatch(cli.command, &ctx)
}

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` drives the filter; `--debug` forces debug level. Events go to
/// stderr so the report on stdout stays clean.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
