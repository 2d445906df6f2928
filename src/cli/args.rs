//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--kubeconfig <path>`: Kubeconfig of the cluster to diagnose
//! - `--config <path>`: Doctor configuration file
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Fluxdoctor - diagnoses the health of Flux GitOps resources
#[derive(Parser, Debug)]
#[command(name = "fluxdoc")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Kubeconfig of the cluster to diagnose (default: standard resolution)
    #[arg(long, global = true)]
    pub kubeconfig: Option<PathBuf>,

    /// Doctor configuration file (default: platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

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
    /// Print a health report for the GitOps resources in the cluster
    #[command(
        name = "doctor",
        long_about = "Print a health report for the GitOps resources in the cluster.\n\n\
            Every HelmRelease and Kustomization in the GitOps namespace is checked \
            and reported as pending, healthy, or failing. Failing objects get a \
            diagnosis that goes beyond the raw status message: dependent chart \
            status and pod logs are correlated into the report.",
        after_help = "\
EXAMPLES:
    # One-shot health snapshot
    fluxdoc doctor

    # Continuously re-check every 5 seconds
    fluxdoc doctor --watch

    # Slower cadence against a busy API server
    fluxdoc doctor --watch --interval 30"
    )]
    Doctor {
        /// Re-run the whole batch continuously
        #[arg(long)]
        watch: bool,

        /// Seconds between watch iterations (overrides the config file)
        #[arg(long, requires = "watch")]
        interval: Option<u64>,

        /// GitOps namespace to scan (overrides the config file)
        #[arg(long)]
        namespace: Option<String>,
    },
}
