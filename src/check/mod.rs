//! check
//!
//! The health-check abstraction: one tri-state result per named GitOps
//! object, produced by a closed set of check variants.
//!
//! # Design
//!
//! A check is addressed by `(name, namespace)` and carries no other state;
//! every [`Check::run`] is a fresh, independent read against the cluster.
//! `run` is infallible by contract — every failure mode (unreachable API,
//! missing object, unrecognized status) is encoded in the returned
//! [`CheckResult`], never surfaced as an `Err` or a panic.
//!
//! The three variants are:
//! - [`HelmReleaseCheck`](release::HelmReleaseCheck) — release records, with
//!   the full classifier rule table and log/chart correlation
//! - [`HelmChartCheck`](chart::HelmChartCheck) — chart-source records, also
//!   queried recursively when a release fails on a dependent chart
//! - [`KustomizationCheck`](kustomization::KustomizationCheck)

pub mod chart;
pub mod classify;
pub mod correlate;
pub mod kustomization;
pub mod release;

pub use chart::HelmChartCheck;
pub use classify::{prettify, Classifier};
pub use kustomization::KustomizationCheck;
pub use release::HelmReleaseCheck;

use async_trait::async_trait;

use crate::cluster::Condition;

/// Tri-state outcome of a check.
///
/// Replaces a two-boolean encoding; at most one of healthy/failing can ever
/// be reported, and `Pending` means "still converging".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Outcome {
    /// The object is still converging, or in a state the classifier does not
    /// recognize yet.
    #[default]
    Pending,
    /// The object reports successful reconciliation.
    Healthy,
    /// The object reports an error, or could not be queried at all.
    Failing,
}

impl Outcome {
    /// Whether this outcome is failing.
    pub fn is_failing(&self) -> bool {
        matches!(self, Outcome::Failing)
    }

    /// Whether this outcome is healthy.
    pub fn is_healthy(&self) -> bool {
        matches!(self, Outcome::Healthy)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Pending => write!(f, "pending"),
            Outcome::Healthy => write!(f, "healthy"),
            Outcome::Failing => write!(f, "failing"),
        }
    }
}

/// The value produced by every check run.
///
/// Created fresh on every [`Check::run`] call and never mutated after
/// return; ownership passes to the caller.
#[derive(Debug, Clone, Default)]
pub struct CheckResult {
    /// Tri-state outcome.
    pub outcome: Outcome,
    /// Human-readable description, possibly multi-line with indented
    /// sub-sections for correlated detail.
    pub status: String,
    /// Optional actionable suggestion.
    pub hint: Option<String>,
    /// The unmodified condition list fetched from the object, retained for
    /// debugging and tests.
    pub conditions: Vec<Condition>,
}

impl CheckResult {
    /// The result shape for "couldn't even ask": the primary fetch failed.
    ///
    /// Distinct from a classified failure — the status stays empty and no
    /// classification is attempted.
    pub fn fetch_failure() -> Self {
        Self {
            outcome: Outcome::Failing,
            ..Self::default()
        }
    }

    /// Whether this is the fetch-failure shape.
    pub fn is_fetch_failure(&self) -> bool {
        self.outcome.is_failing() && self.status.is_empty()
    }
}

/// A runnable health check over one named GitOps object.
///
/// # Optional capabilities
///
/// `hint`, `fix`, and `on_error` are extension points with no-op defaults;
/// a variant overrides the ones it supports. The runner invokes `on_error`
/// once, synchronously, for every failing result before publishing it.
#[async_trait]
pub trait Check: Send + Sync {
    /// Name of the object under check.
    fn name(&self) -> &str;

    /// Run the check once. Infallible; see the module docs.
    async fn run(&self) -> CheckResult;

    /// An actionable suggestion for this check, if any.
    fn hint(&self) -> Option<String> {
        None
    }

    /// Remediation entry point. Not invoked by the runner.
    fn fix(&self) {}

    /// Invoked by the runner after a failing run, before the result is
    /// published.
    async fn on_error(&self, _result: &CheckResult) {}
}
