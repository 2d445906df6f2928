//! cluster::mock
//!
//! Mock cluster implementation for deterministic testing.
//!
//! # Design
//!
//! The mock cluster stores objects, logs, and pods in memory and allows
//! configuring failure scenarios per operation. It is the seam double used
//! by unit tests and the integration suite.
//!
//! # Example
//!
//! ```
//! use fluxdoctor::cluster::{Cluster, Condition, FluxKind, MockCluster};
//!
//! # tokio_test::block_on(async {
//! let cluster = MockCluster::new();
//! cluster.put_object(
//!     FluxKind::HelmRelease,
//!     "cert-manager",
//!     "flux-system",
//!     vec![Condition::new("Ready", "Release reconciliation succeeded")],
//! );
//!
//! let conditions = cluster
//!     .conditions(FluxKind::HelmRelease, "cert-manager", "flux-system")
//!     .await
//!     .unwrap();
//! assert_eq!(conditions[0].message, "Release reconciliation succeeded");
//! # });
//! ```

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::{Cluster, ClusterError, Condition, FluxKind, ObjectRef};

/// Mock cluster for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockCluster {
    inner: Arc<Mutex<MockClusterInner>>,
}

/// Internal mutable state.
#[derive(Debug, Default)]
struct MockClusterInner {
    /// Stored objects keyed by (kind, namespace, name).
    objects: HashMap<(FluxKind, String, String), Vec<Condition>>,
    /// Pod logs keyed by (namespace, pod).
    logs: HashMap<(String, String), String>,
    /// Pods keyed by (namespace, label selector).
    pods: HashMap<(String, String), Vec<String>>,
    /// Operation to fail (for testing error paths).
    fail_on: Option<FailOn>,
    /// Recorded operations for verification.
    operations: Vec<MockOperation>,
}

/// Configuration for which operation should fail.
#[derive(Debug, Clone)]
pub enum FailOn {
    /// Fail conditions() with the given error.
    Conditions(ClusterError),
    /// Fail list() with the given error.
    List(ClusterError),
    /// Fail pod_logs() with the given error.
    PodLogs(ClusterError),
    /// Fail pods_by_label() with the given error.
    PodsByLabel(ClusterError),
}

/// Recorded operation for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOperation {
    Conditions {
        kind: FluxKind,
        name: String,
        namespace: String,
    },
    List {
        kind: FluxKind,
        namespace: String,
    },
    PodLogs {
        namespace: String,
        pod: String,
    },
    PodsByLabel {
        namespace: String,
        selector: String,
    },
}

impl MockCluster {
    /// Create an empty mock cluster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an object with its status conditions.
    pub fn put_object(
        &self,
        kind: FluxKind,
        name: impl Into<String>,
        namespace: impl Into<String>,
        conditions: Vec<Condition>,
    ) {
        let mut inner = self.inner.lock().unwrap();
        inner
            .objects
            .insert((kind, namespace.into(), name.into()), conditions);
    }

    /// Store logs for a pod.
    pub fn put_pod_logs(
        &self,
        namespace: impl Into<String>,
        pod: impl Into<String>,
        logs: impl Into<String>,
    ) {
        let mut inner = self.inner.lock().unwrap();
        inner.logs.insert((namespace.into(), pod.into()), logs.into());
    }

    /// Store the pod names a label selector resolves to.
    pub fn put_pods(
        &self,
        namespace: impl Into<String>,
        selector: impl Into<String>,
        pods: Vec<String>,
    ) {
        let mut inner = self.inner.lock().unwrap();
        inner.pods.insert((namespace.into(), selector.into()), pods);
    }

    /// Configure one operation to fail.
    pub fn fail_on(&self, fail: FailOn) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_on = Some(fail);
    }

    /// Recorded operations, in call order.
    pub fn operations(&self) -> Vec<MockOperation> {
        self.inner.lock().unwrap().operations.clone()
    }
}

#[async_trait]
impl Cluster for MockCluster {
    async fn conditions(
        &self,
        kind: FluxKind,
        name: &str,
        namespace: &str,
    ) -> Result<Vec<Condition>, ClusterError> {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(MockOperation::Conditions {
            kind,
            name: name.to_string(),
            namespace: namespace.to_string(),
        });

        if let Some(FailOn::Conditions(err)) = &inner.fail_on {
            return Err(err.clone());
        }

        inner
            .objects
            .get(&(kind, namespace.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| ClusterError::NotFound(format!("{}/{}/{}", kind, namespace, name)))
    }

    async fn list(&self, kind: FluxKind, namespace: &str) -> Result<Vec<ObjectRef>, ClusterError> {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(MockOperation::List {
            kind,
            namespace: namespace.to_string(),
        });

        if let Some(FailOn::List(err)) = &inner.fail_on {
            return Err(err.clone());
        }

        let mut refs: Vec<ObjectRef> = inner
            .objects
            .keys()
            .filter(|(k, ns, _)| *k == kind && ns == namespace)
            .map(|(_, ns, name)| ObjectRef::new(name.clone(), ns.clone()))
            .collect();
        refs.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(refs)
    }

    async fn pod_logs(&self, namespace: &str, pod: &str) -> Result<String, ClusterError> {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(MockOperation::PodLogs {
            namespace: namespace.to_string(),
            pod: pod.to_string(),
        });

        if let Some(FailOn::PodLogs(err)) = &inner.fail_on {
            return Err(err.clone());
        }

        inner
            .logs
            .get(&(namespace.to_string(), pod.to_string()))
            .cloned()
            .ok_or_else(|| ClusterError::NotFound(format!("pods/{}/{}", namespace, pod)))
    }

    async fn pods_by_label(
        &self,
        namespace: &str,
        selector: &str,
    ) -> Result<Vec<String>, ClusterError> {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(MockOperation::PodsByLabel {
            namespace: namespace.to_string(),
            selector: selector.to_string(),
        });

        if let Some(FailOn::PodsByLabel(err)) = &inner.fail_on {
            return Err(err.clone());
        }

        Ok(inner
            .pods
            .get(&(namespace.to_string(), selector.to_string()))
            .cloned()
            .unwrap_or_default())
    }
}
