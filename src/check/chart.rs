//! check::chart
//!
//! Health check over one chart-source record.
//!
//! Besides the normal [`Check`] surface, this variant exposes
//! [`ready_message`](HelmChartCheck::ready_message): the narrow read used by
//! the release check when it explains a "dependent chart not ready" failure.
//! That path needs just the chart's Ready text, not a full classification.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::classify::{ClassifyContext, Classifier};
use super::{Check, CheckResult};
use crate::cluster::{condition_message, Cluster, FluxKind};
use crate::config::DoctorConfig;

/// Check over a chart-source record.
pub struct HelmChartCheck {
    /// Name of the chart object.
    pub name: String,
    /// Namespace of the chart object.
    pub namespace: String,
    cluster: Arc<dyn Cluster>,
    config: Arc<DoctorConfig>,
}

impl HelmChartCheck {
    /// Create a check for one chart.
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

    /// The chart's Ready message, or an inline error string if the chart
    /// cannot be fetched.
    ///
    /// This never fails; it is the one-level correlation read and must
    /// degrade gracefully inside a larger diagnosis.
    pub async fn ready_message(&self) -> String {
        match self
            .cluster
            .conditions(FluxKind::HelmChart, &self.name, &self.namespace)
            .await
        {
            Ok(conditions) => condition_message(&conditions, "Ready").unwrap_or_default(),
            Err(err) => err.to_string(),
        }
    }
}

impl std::fmt::Debug for HelmChartCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HelmChartCheck")
            .field("name", &self.name)
            .field("namespace", &self.namespace)
            .finish()
    }
}

#[async_trait]
impl Check for HelmChartCheck {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self) -> CheckResult {
        let conditions = match self
            .cluster
            .conditions(FluxKind::HelmChart, &self.name, &self.namespace)
            .await
        {
            Ok(conditions) => conditions,
            Err(err) => {
                debug!(name = %self.name, %err, "chart fetch failed");
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

        let matched = Classifier::shared_helm_chart()
            .classify(&ctx, &conditions, &mut result)
            .await;

        if !matched {
            result.status = condition_message(&conditions, "Ready").unwrap_or_default();
        }

        result
    }
}
