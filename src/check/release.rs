//! check::release
//!
//! Health check over one Helm release record. This is the variant with the
//! full rule table: terminal failures, test failures with log correlation,
//! install timeouts with the deep pod-log path, and dependent-chart
//! correlation.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::classify::{ClassifyContext, Classifier};
use super::{Check, CheckResult};
use crate::cluster::{condition_message, Cluster, FluxKind};
use crate::config::DoctorConfig;

/// Check over a Helm release record.
pub struct HelmReleaseCheck {
    /// Name of the release object.
    pub name: String,
    /// Namespace of the release object.
    pub namespace: String,
    cluster: Arc<dyn Cluster>,
    config: Arc<DoctorConfig>,
}

impl HelmReleaseCheck {
    /// Create a check for one release.
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

impl std::fmt::Debug for HelmReleaseCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HelmReleaseCheck")
            .field("name", &self.name)
            .field("namespace", &self.namespace)
            .finish()
    }
}

#[async_trait]
impl Check for HelmReleaseCheck {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self) -> CheckResult {
        let conditions = match self
            .cluster
            .conditions(FluxKind::HelmRelease, &self.name, &self.namespace)
            .await
        {
            Ok(conditions) => conditions,
            Err(err) => {
                debug!(name = %self.name, %err, "release fetch failed");
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

        let matched = Classifier::shared_helm_release()
            .classify(&ctx, &conditions, &mut result)
            .await;

        if !matched {
            // Unclassified states stay pending but must remain visible.
            result.status = condition_message(&conditions, "Ready").unwrap_or_default();
        }

        result
    }
}
