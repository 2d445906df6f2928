//! check::classify
//!
//! Ordered pattern classification of condition messages.
//!
//! # Design
//!
//! The rule table is an explicit ordered sequence, never a map: rules are
//! evaluated front-to-back and the first rule whose pattern matches any
//! condition message wins — remaining rules and conditions are not
//! considered. Earlier revisions of this logic lived in an unordered
//! association, which is non-deterministic under overlapping matches; the
//! ordered list is a correctness requirement here, and a test pins it.
//!
//! Actions form a closed set so the dispatch is exhaustive. Two of them
//! reach across object boundaries: test failures and install timeouts pull
//! pod logs, and a dependent-chart failure folds in the chart's own Ready
//! message — one level of correlation, no unbounded recursion.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::correlate;
use super::{CheckResult, HelmChartCheck, Outcome};
use crate::cluster::Cluster;
use crate::config::DoctorConfig;

/// What a matched rule does to the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleAction {
    /// Helm install timed out; deep-diagnose known objects via their pods.
    InstallTimeout,
    /// A Helm test pod failed; pull its logs.
    TestFailure,
    /// Terminal failure keywords; reformat the message.
    TerminalFailure,
    /// A dependent chart is not ready; fold in its own status.
    ChartNotReady,
    /// Reconciliation succeeded.
    Success,
}

/// One classification rule: a pattern and the action it dispatches to.
#[derive(Debug)]
pub struct Rule {
    pattern: Regex,
    action: RuleAction,
}

impl Rule {
    fn new(pattern: &str, action: RuleAction) -> Self {
        Self {
            // Tables are built from literals below; a bad pattern is a
            // programming error caught by the table tests.
            pattern: Regex::new(pattern).expect("invalid classifier pattern"),
            action,
        }
    }
}

/// Everything a handler may need beyond the condition message itself.
pub struct ClassifyContext<'a> {
    /// Shared cluster handle for correlated lookups.
    pub cluster: &'a Arc<dyn Cluster>,
    /// Doctor configuration (workload namespace, deep-diagnosis table).
    pub config: &'a Arc<DoctorConfig>,
    /// Name of the object under check.
    pub object_name: &'a str,
}

/// The ordered rule engine.
///
/// One immutable instance per check variant, shared by all checks of that
/// variant.
#[derive(Debug)]
pub struct Classifier {
    rules: Vec<Rule>,
}

impl Classifier {
    /// Rule table for Helm release records, in priority order.
    pub fn helm_release() -> Self {
        Self {
            rules: vec![
                Rule::new(
                    "Helm install failed: timed out waiting for the condition",
                    RuleAction::InstallTimeout,
                ),
                Rule::new(
                    "Helm test failed: pod (?P<podName>.*) failed",
                    RuleAction::TestFailure,
                ),
                Rule::new(
                    "(install retries exhausted|upgrade retries exhausted|Helm install failed|Helm upgrade failed).*",
                    RuleAction::TerminalFailure,
                ),
                Rule::new(
                    "HelmChart '(?P<namespace>[^/']*)/(?P<name>[^']*)' is not ready",
                    RuleAction::ChartNotReady,
                ),
                Rule::new("Release reconciliation succeeded", RuleAction::Success),
            ],
        }
    }

    /// Rule table for chart-source records.
    pub fn helm_chart() -> Self {
        Self {
            rules: vec![Rule::new("^Applied revision$", RuleAction::Success)],
        }
    }

    /// Rule table for kustomization records.
    pub fn kustomization() -> Self {
        Self {
            rules: vec![Rule::new("Applied revision", RuleAction::Success)],
        }
    }

    /// The shared release-record instance.
    pub fn shared_helm_release() -> &'static Classifier {
        static INSTANCE: Lazy<Classifier> = Lazy::new(Classifier::helm_release);
        &INSTANCE
    }

    /// The shared chart-record instance.
    pub fn shared_helm_chart() -> &'static Classifier {
        static INSTANCE: Lazy<Classifier> = Lazy::new(Classifier::helm_chart);
        &INSTANCE
    }

    /// The shared kustomization-record instance.
    pub fn shared_kustomization() -> &'static Classifier {
        static INSTANCE: Lazy<Classifier> = Lazy::new(Classifier::kustomization);
        &INSTANCE
    }

    /// Scan conditions against the rule table and, on the first match,
    /// populate the result.
    ///
    /// Returns `false` when no rule matched any condition, leaving the
    /// result untouched so the caller can surface the raw message.
    pub async fn classify(
        &self,
        ctx: &ClassifyContext<'_>,
        conditions: &[crate::cluster::Condition],
        result: &mut CheckResult,
    ) -> bool {
        for rule in &self.rules {
            for condition in conditions {
                if let Some(captures) = rule.pattern.captures(&condition.message) {
                    debug!(
                        object = ctx.object_name,
                        action = ?rule.action,
                        "condition matched"
                    );
                    apply(rule.action, ctx, &captures, &condition.message, result).await;
                    return true;
                }
            }
        }

        false
    }
}

/// Dispatch a matched rule's action.
async fn apply(
    action: RuleAction,
    ctx: &ClassifyContext<'_>,
    captures: &regex::Captures<'_>,
    message: &str,
    result: &mut CheckResult,
) {
    match action {
        RuleAction::InstallTimeout => {
            result.outcome = Outcome::Failing;
            result.status = prettify(message);

            // Only objects with a registered pod selector get the deep path;
            // everything else keeps the generic message.
            if let Some(selector) = ctx.config.deep_diagnosis_selector(ctx.object_name) {
                let excerpt = correlate::labeled_pods_excerpt(
                    ctx.cluster.as_ref(),
                    &ctx.config.workload_namespace,
                    selector,
                )
                .await;
                result.status.push_str(&excerpt);
            }
        }
        RuleAction::TestFailure => {
            let pod = captures
                .name("podName")
                .map(|m| m.as_str())
                .unwrap_or_default();
            let excerpt = correlate::pod_log_excerpt(
                ctx.cluster.as_ref(),
                &ctx.config.workload_namespace,
                pod,
            )
            .await;

            result.outcome = Outcome::Failing;
            result.status = format!("{}{}", &captures[0], excerpt);
        }
        RuleAction::TerminalFailure => {
            result.outcome = Outcome::Failing;
            result.status = prettify(&captures[0]);
        }
        RuleAction::ChartNotReady => {
            let namespace = captures
                .name("namespace")
                .map(|m| m.as_str())
                .unwrap_or_default();
            let name = captures.name("name").map(|m| m.as_str()).unwrap_or_default();

            // One level of correlation: the chart's own Ready message (or the
            // fetch error) explains the release-level failure.
            let chart = HelmChartCheck::new(
                name,
                namespace,
                Arc::clone(ctx.cluster),
                Arc::clone(ctx.config),
            );
            let chart_message = chart.ready_message().await;

            result.outcome = Outcome::Failing;
            result.status = prettify(&format!("{}: {}", message, chart_message));
        }
        RuleAction::Success => {
            result.outcome = Outcome::Healthy;
            result.status = prettify(message);
        }
    }
}

/// Turn colon-delimited nested causes into an indented block.
///
/// Every `": "` becomes a newline plus `"  > "`. Pure string transform,
/// applied wherever a message is surfaced to a status.
pub fn prettify(message: &str) -> String {
    message.replace(": ", "\n  > ")
}
