//! runner
//!
//! Executes a collection of checks, sequentially or concurrently, and
//! aggregates their results.
//!
//! # Design
//!
//! Checks are independent read-only tasks; nothing is shared between
//! concurrently running checks except the aggregation channel owned by the
//! runner for the duration of one call. Concurrent runs jitter each task's
//! start by a uniform random delay so a batch doesn't hit the API server as
//! a synchronized burst.
//!
//! Results arrive in completion order, tagged with the original index;
//! callers that need input order re-sort by [`IndexedResult::index`]. The
//! channel closes exactly when every task has reported — sender drop makes
//! that structural rather than a flag array.
//!
//! Every run is bounded by a per-check deadline so a hung fetch cannot
//! stall a task indefinitely; an overrun yields the same result shape as a
//! failed primary fetch.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio::sync::mpsc;
use tokio::time::{sleep, timeout};
use tracing::debug;

use crate::check::{Check, CheckResult};

/// Default per-check deadline.
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(30);

/// Default upper bound of the random start jitter.
pub const DEFAULT_JITTER: Duration = Duration::from_secs(5);

/// One check's result, tagged with its input position.
#[derive(Debug)]
pub struct IndexedResult {
    /// Position of the check in the runner's input order.
    pub index: usize,
    /// Name of the checked object.
    pub name: String,
    /// The produced result.
    pub result: CheckResult,
}

/// Executes checks and aggregates results.
pub struct Runner {
    checks: Vec<Arc<dyn Check>>,
    deadline: Duration,
    jitter: Duration,
}

impl Default for Runner {
    fn default() -> Self {
        Self::new()
    }
}

impl Runner {
    /// Create an empty runner with default deadline and jitter.
    pub fn new() -> Self {
        Self {
            checks: Vec::new(),
            deadline: DEFAULT_DEADLINE,
            jitter: DEFAULT_JITTER,
        }
    }

    /// Set the per-check deadline.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Set the start-jitter upper bound. Zero disables jitter.
    pub fn with_jitter(mut self, jitter: Duration) -> Self {
        self.jitter = jitter;
        self
    }

    /// Append checks to the batch.
    pub fn add_check(&mut self, check: Arc<dyn Check>) {
        self.checks.push(check);
    }

    /// Number of checks in the batch.
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    /// Whether the batch is empty.
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Run every check to completion, one after another, in input order.
    pub async fn run_all_once(&self) -> Vec<IndexedResult> {
        let mut results = Vec::with_capacity(self.checks.len());

        for (index, check) in self.checks.iter().enumerate() {
            let result = run_single(Arc::clone(check), self.deadline).await;
            results.push(IndexedResult {
                index,
                name: check.name().to_string(),
                result,
            });
        }

        results
    }

    /// Launch one task per check and return the aggregation channel.
    ///
    /// Each task sleeps a random delay in `[0, jitter)` before running.
    /// Exactly one result per check is published; the channel closes once
    /// every task has reported.
    pub fn run_all_once_async(&self) -> mpsc::Receiver<IndexedResult> {
        let (tx, rx) = mpsc::channel(self.checks.len().max(1));

        for (index, check) in self.checks.iter().enumerate() {
            let check = Arc::clone(check);
            let tx = tx.clone();
            let deadline = self.deadline;
            let jitter = self.jitter;

            tokio::spawn(async move {
                if !jitter.is_zero() {
                    let delay = rand::rng().random_range(Duration::ZERO..jitter);
                    sleep(delay).await;
                }

                let name = check.name().to_string();
                let result = run_single(check, deadline).await;

                // The receiver hanging up just means the consumer stopped
                // caring about this batch.
                let _ = tx
                    .send(IndexedResult {
                        index,
                        name,
                        result,
                    })
                    .await;
            });
        }

        // Dropping the original sender leaves one sender per task; the
        // channel closes when the last task finishes.
        rx
    }

    /// Collect a concurrent run into input order.
    pub async fn run_all_once_async_sorted(&self) -> Vec<IndexedResult> {
        let mut rx = self.run_all_once_async();
        let mut results = Vec::with_capacity(self.checks.len());
        while let Some(result) = rx.recv().await {
            results.push(result);
        }
        results.sort_by_key(|r| r.index);
        results
    }
}

/// Run one check under the deadline and dispatch its error hook.
async fn run_single(check: Arc<dyn Check>, deadline: Duration) -> CheckResult {
    let result = match timeout(deadline, check.run()).await {
        Ok(result) => result,
        Err(_) => {
            debug!(name = check.name(), ?deadline, "check deadline exceeded");
            CheckResult::fetch_failure()
        }
    };

    if result.outcome.is_failing() {
        check.on_error(&result).await;
    }

    result
}
