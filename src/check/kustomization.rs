//! check::kustomization
//!
//! Health check over one kustomization record. The rule table is minimal: a
//! kustomization is healthy once its Ready message reports an applied
//! revision; everything else stays visible as pending.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::classify::{ClassifyContext, Classifier};
use super::{Check, CheckResult};
use crate::cluster::{condition_message, Cluster, FluxKind};
use crate::config::DoctorConfig;

/// Check over a kustomization record.
pub struct KustomizationCheck {
    /// Name of the kustomization object.
    pub name: String,
    /// Namespace of the kustomization object.
    pub namespace: String,
    cluster: Arc<dyn Cluster>,
    config: Arc<DoctorConfig>,
}

impl KustomizationCheck {
    /// Create a check for one kustomization.
    pub fn new(
        name: impl Into<String>,
        namespace: impl Into<String>,
        cluster: Arc<dyn Cluster>,
        config: Arc<DoctorConfig>,
    ) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            cluster,
            config,
        }
    }
}

impl std::fmt::Debug for KustomizationCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KustomizationCheck")
            .field("name", &self.name)
            .field("namespace", &self.namespace)
            .finish()
    }
}

#[async_trait]
impl Check for KustomizationCheck {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self) -> CheckResult {
        let conditions = match self
            .cluster
            .conditions(FluxKind::Kustomization, &self.name, &self.namespace)
            .await
        {
            Ok(conditions) => conditions,
            Err(err) => {
                debug!(name = %self.name, %err, "kustomization fetch failed");
                return CheckResult::fetch_failure();
            }
        };

        let mut result = CheckResult {
            conditions: conditions.clone(),
            ..CheckResult::default()
        };

        let ctx = ClassifyContext {
            cluster: &self.cluster,
            config: &self.config,
            object_name: &self.name,
        };

        let matched = Classifier::shared_kustomization()
            .classify(&ctx, &conditions, &mut result)
            .await;

        if !matched {
            result.status = condition_message(&conditions, "Ready").unwrap_or_default();
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::Outcome;
    use crate::cluster::{Condition, MockCluster};

    fn check_for(mock: &MockCluster, name: &str) -> KustomizationCheck {
        KustomizationCheck::new(
            name,
            "flux-system",
            Arc::new(mock.clone()),
            Arc::new(DoctorConfig::default()),
        )
    }

    #[tokio::test]
    async fn missing_object_is_fetch_failure() {
        let mock = MockCluster::new();
        let result = check_for(&mock, "ghost").run().await;
        assert!(result.is_fetch_failure());
    }

    #[tokio::test]
    async fn applied_revision_is_healthy() {
        let mock = MockCluster::new();
        mock.put_object(
            FluxKind::Kustomization,
            "base",
            "flux-system",
            vec![Condition::new("Ready", "Applied revision: main@sha1:abc123")],
        );

        let result = check_for(&mock, "base").run().await;

        assert_eq!(result.outcome, Outcome::Healthy);
        assert_eq!(result.status, "Applied revision\n  > main@sha1:abc123");
    }

    #[tokio::test]
    async fn reconciling_message_is_pending_and_verbatim() {
        let mock = MockCluster::new();
        mock.put_object(
            FluxKind::Kustomization,
            "base",
            "flux-system",
            vec![Condition::new("Ready", "Reconciliation in progress")],
        );

        let result = check_for(&mock, "base").run().await;

        assert_eq!(result.outcome, Outcome::Pending);
        assert_eq!(result.status, "Reconciliation in progress");
    }
}
