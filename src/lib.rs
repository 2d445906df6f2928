//! Fluxdoctor - a health-diagnosis engine for Flux GitOps resources
//!
//! Fluxdoctor inspects the Helm release, chart source, and kustomization
//! records an external reconciliation controller maintains in a cluster,
//! decides whether each is healthy, failing, or still converging, and - when
//! failing - produces a diagnosis that goes beyond the raw status message by
//! correlating it with deeper signals: dependent chart status and pod logs.
//!
//! # Architecture
//!
//! The codebase follows a layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates)
//! - [`runner`] - Executes check batches, sequentially or with jitter
//! - [`check`] - Result model, check variants, classifier, correlators
//! - [`cluster`] - Single seam for all reconciliation-API access
//! - [`config`] - Doctor configuration
//! - [`ui`] - Report rendering
//!
//! # Correctness Invariants
//!
//! 1. A check run always returns a result; no code path panics or errors out
//! 2. An outcome is exactly one of pending, healthy, or failing
//! 3. Classification rules form an ordered list; the first match wins
//! 4. Correlation is read-only and at most one level deep
//! 5. All cluster access is read-only

pub mod check;
pub mod cli;
pub mod cluster;
pub mod config;
pub mod runner;
pub mod ui;
