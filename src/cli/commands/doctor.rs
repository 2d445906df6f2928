//! cli::commands::doctor
//!
//! The doctor command: discover the GitOps objects in the cluster, run all
//! checks, and render the emoji report.
//!
//! One-shot mode runs the batch sequentially for a stable snapshot. Watch
//! mode re-runs the batch concurrently with jittered starts on a fixed
//! cadence, clearing the screen between iterations.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result};
use tracing::debug;

use crate::check::{HelmReleaseCheck, KustomizationCheck};
use crate::cli::Context;
use crate::cluster::{Cluster, FluxKind, KubeCluster};
use crate::config::DoctorConfig;
use crate::runner::Runner;
use crate::ui::output;

/// Run the doctor command.
pub fn doctor(
    ctx: &Context,
    watch: bool,
    interval: Option<u64>,
    namespace: Option<String>,
) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(doctor_async(ctx, watch, interval, namespace))
}

async fn doctor_async(
    ctx: &Context,
    watch: bool,
    interval: Option<u64>,
    namespace: Option<String>,
) -> Result<()> {
    let mut config = DoctorConfig::load(ctx.config.as_deref())?;
    if let Some(namespace) = namespace {
        config.gitops_namespace = namespace;
    }
    if let Some(secs) = interval {
        config.interval_secs = secs;
    }
    let config = Arc::new(config);

    let cluster: Arc<dyn Cluster> = Arc::new(
        KubeCluster::connect(ctx.kubeconfig.clone())
            .await
            .context("failed to connect to the cluster")?,
    );

    let runner = build_runner(&cluster, &config).await?;
    debug!(checks = runner.len(), "check batch assembled");

    if watch {
        watch_loop(&runner, config.interval()).await
    } else {
        let results = runner.run_all_once().await;
        output::print(output::format_report(&results), ctx.verbosity);
        Ok(())
    }
}

/// Discover check targets and assemble the batch.
///
/// Every HelmRelease and every Kustomization in the GitOps namespace gets a
/// check, releases first, each in discovery order.
async fn build_runner(cluster: &Arc<dyn Cluster>, config: &Arc<DoctorConfig>) -> Result<Runner> {
    let mut runner = Runner::new()
        .with_deadline(config.deadline())
        .with_jitter(config.jitter());

    let releases = cluster
        .list(FluxKind::HelmRelease, &config.gitops_namespace)
        .await
        .context("failed to list HelmReleases")?;
    for object in releases {
        runner.add_check(Arc::new(HelmReleaseCheck::new(
            object.name,
            object.namespace,
            Arc::clone(cluster),
            Arc::clone(config),
        )));
    }

    let kustomizations = cluster
        .list(FluxKind::Kustomization, &config.gitops_namespace)
        .await
        .context("failed to list Kustomizations")?;
    for object in kustomizations {
        runner.add_check(Arc::new(KustomizationCheck::new(
            object.name,
            object.namespace,
            Arc::clone(cluster),
            Arc::clone(config),
        )));
    }

    Ok(runner)
}

/// Re-run the batch forever on a fixed cadence.
///
/// Results are re-sorted into input order so the report lines stay put
/// between iterations.
async fn watch_loop(runner: &Runner, interval: Duration) -> Result<()> {
    loop {
        let results = runner.run_all_once_async_sorted().await;

        print!("{}", output::CLEAR_SCREEN);
        println!("{}", output::format_report(&results));

        tokio::time::sleep(interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::MockCluster;

    #[tokio::test]
    async fn builds_one_check_per_discovered_object() {
        let mock = MockCluster::new();
        mock.put_object(FluxKind::HelmRelease, "cert-manager", "flux-system", vec![]);
        mock.put_object(FluxKind::HelmRelease, "etcd", "flux-system", vec![]);
        mock.put_object(FluxKind::Kustomization, "base", "flux-system", vec![]);
        // Outside the GitOps namespace; must not be picked up.
        mock.put_object(FluxKind::HelmRelease, "stray", "default", vec![]);

        let cluster: Arc<dyn Cluster> = Arc::new(mock);
        let config = Arc::new(DoctorConfig::default());

        let runner = build_runner(&cluster, &config).await.unwrap();

        assert_eq!(runner.len(), 3);
    }

    #[tokio::test]
    async fn empty_cluster_builds_empty_batch() {
        let cluster: Arc<dyn Cluster> = Arc::new(MockCluster::new());
        let config = Arc::new(DoctorConfig::default());

        let runner = build_runner(&cluster, &config).await.unwrap();

        assert!(runner.is_empty());
    }
}
