//! End-to-end diagnosis tests: a seeded mock cluster, the full check
//! batch, and the rendered report.

use std::sync::Arc;
use std::time::Duration;

use fluxdoctor::check::{HelmReleaseCheck, KustomizationCheck, Outcome};
use fluxdoctor::cluster::{Cluster, Condition, FluxKind, MockCluster};
use fluxdoctor::config::DoctorConfig;
use fluxdoctor::runner::Runner;
use fluxdoctor::ui::format_report;

/// A cluster with one object in every interesting state.
fn seeded_cluster() -> MockCluster {
    let cluster = MockCluster::new();

    cluster.put_object(
        FluxKind::HelmRelease,
        "cert-manager",
        "flux-system",
        vec![Condition::new("Ready", "Release reconciliation succeeded")],
    );
    cluster.put_object(
        FluxKind::HelmRelease,
        "dashboard",
        "flux-system",
        vec![Condition::new(
            "Ready",
            "HelmChart 'flux-system/dashboard' is not ready",
        )],
    );
    cluster.put_object(
        FluxKind::HelmChart,
        "dashboard",
        "flux-system",
        vec![Condition::new(
            "Ready",
            "chart pull error: context deadline exceeded",
        )],
    );
    cluster.put_object(
        FluxKind::HelmRelease,
        "identity",
        "flux-system",
        vec![Condition::new(
            "Ready",
            "Helm test failed: pod identity-test-abc failed",
        )],
    );
    cluster.put_pod_logs("garden", "identity-test-abc", "login assertion failed\n");
    cluster.put_object(FluxKind::HelmRelease, "fresh", "flux-system", vec![]);
    cluster.put_object(
        FluxKind::Kustomization,
        "base",
        "flux-system",
        vec![Condition::new("Ready", "Applied revision: main@sha1:abc")],
    );

    cluster
}

fn batch(cluster: &MockCluster) -> Runner {
    let shared: Arc<dyn Cluster> = Arc::new(cluster.clone());
    let config = Arc::new(DoctorConfig::default());

    let mut runner = Runner::new().with_jitter(Duration::from_millis(5));
    for name in ["cert-manager", "dashboard", "identity", "fresh", "ghost"] {
        runner.add_check(Arc::new(HelmReleaseCheck::new(
            name,
            "flux-system",
            Arc::clone(&shared),
            Arc::clone(&config),
        )));
    }
    runner.add_check(Arc::new(KustomizationCheck::new(
        "base",
        "flux-system",
        Arc::clone(&shared),
        Arc::clone(&config),
    )));
    runner
}

#[tokio::test]
async fn sequential_batch_diagnoses_every_state() {
    let cluster = seeded_cluster();
    let results = batch(&cluster).run_all_once().await;

    assert_eq!(results.len(), 6);

    let by_name = |name: &str| {
        results
            .iter()
            .find(|r| r.name == name)
            .unwrap_or_else(|| panic!("no result for {}", name))
    };

    assert_eq!(by_name("cert-manager").result.outcome, Outcome::Healthy);

    let dashboard = by_name("dashboard");
    assert_eq!(dashboard.result.outcome, Outcome::Failing);
    assert_eq!(
        dashboard.result.status,
        "HelmChart 'flux-system/dashboard' is not ready\n  > chart pull error\n  > context deadline exceeded"
    );

    let identity = by_name("identity");
    assert_eq!(identity.result.outcome, Outcome::Failing);
    assert!(identity.result.status.contains("login assertion failed"));

    assert_eq!(by_name("fresh").result.outcome, Outcome::Pending);
    assert_eq!(by_name("fresh").result.status, "");

    // Not in the cluster at all: failing, but with the empty status that
    // marks "couldn't even ask".
    assert!(by_name("ghost").result.is_fetch_failure());

    assert_eq!(by_name("base").result.outcome, Outcome::Healthy);
}

#[tokio::test]
async fn concurrent_batch_matches_sequential_diagnosis() {
    let cluster = seeded_cluster();
    let runner = batch(&cluster);

    let sequential = runner.run_all_once().await;
    let concurrent = runner.run_all_once_async_sorted().await;

    assert_eq!(sequential.len(), concurrent.len());
    for (s, c) in sequential.iter().zip(concurrent.iter()) {
        assert_eq!(s.index, c.index);
        assert_eq!(s.name, c.name);
        assert_eq!(s.result.outcome, c.result.outcome);
        assert_eq!(s.result.status, c.result.status);
    }
}

#[tokio::test]
async fn report_renders_one_line_per_check_in_input_order() {
    let cluster = seeded_cluster();
    let results = batch(&cluster).run_all_once().await;

    let report = format_report(&results);
    let lines: Vec<&str> = report.lines().collect();

    assert!(lines[0].starts_with("✔️ cert-manager status: "));
    assert!(lines[1].starts_with("❌ dashboard status: "));
    // Multi-line statuses keep their indented continuation lines.
    assert!(report.contains("\n  > "));
    assert!(report.contains("⌛ fresh status: "));
}

#[tokio::test]
async fn large_concurrent_batch_loses_nothing() {
    let cluster = MockCluster::new();
    for i in 0..50 {
        cluster.put_object(
            FluxKind::HelmRelease,
            format!("release-{}", i),
            "flux-system",
            vec![Condition::new("Ready", "Release reconciliation succeeded")],
        );
    }

    let shared: Arc<dyn Cluster> = Arc::new(cluster);
    let config = Arc::new(DoctorConfig::default());
    let mut runner = Runner::new().with_jitter(Duration::from_millis(20));
    for i in 0..50 {
        runner.add_check(Arc::new(HelmReleaseCheck::new(
            format!("release-{}", i),
            "flux-system",
            Arc::clone(&shared),
            Arc::clone(&config),
        )));
    }

    let results = runner.run_all_once_async_sorted().await;

    assert_eq!(results.len(), 50);
    assert!(results.iter().all(|r| r.result.outcome == Outcome::Healthy));
}
