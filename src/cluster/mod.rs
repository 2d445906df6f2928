//! cluster
//!
//! The seam to the external reconciliation API.
//!
//! # Design
//!
//! The `Cluster` trait is async because every operation involves network I/O
//! against the Kubernetes API server. All methods return `Result` so callers
//! can distinguish "couldn't even ask" from "asked, and it's broken".
//!
//! Everything above this module is read-only: checks fetch status conditions,
//! pod logs, and pod listings, and never write anything back.
//!
//! # Example
//!
//! ```ignore
//! use fluxdoctor::cluster::{condition_message, Cluster, ClusterError, FluxKind};
//!
//! async fn ready_message(cluster: &dyn Cluster) -> Result<String, ClusterError> {
//!     let conditions = cluster
//!         .conditions(FluxKind::HelmRelease, "cert-manager", "flux-system")
//!         .await?;
//!     Ok(condition_message(&conditions, "Ready").unwrap_or_default())
//! }
//! ```

pub mod kube;
pub mod mock;

pub use self::kube::KubeCluster;
pub use mock::MockCluster;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

/// Errors from cluster operations.
#[derive(Debug, Clone, Error)]
pub enum ClusterError {
    /// The requested object was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// The API server rejected the request.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message from the API server
        message: String,
    },

    /// Network or connection error.
    #[error("network error: {0}")]
    Network(String),

    /// The operation is not supported by this cluster implementation.
    #[error("unsupported: {0}")]
    Unsupported(String),
}

/// A typed status entry attached to a reconciliation object.
///
/// The `"Ready"` type is canonical for overall health; the classifier reads
/// only its message, but the full list is retained on every result for
/// debugging.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Condition {
    /// Condition type, e.g. `"Ready"` or `"Released"`.
    #[serde(rename = "type")]
    pub type_: String,
    /// Condition status, `"True"` / `"False"` / `"Unknown"`.
    #[serde(default)]
    pub status: String,
    /// Free-text description from the controller.
    #[serde(default)]
    pub message: String,
}

impl Condition {
    /// Create a condition of the given type with a message.
    pub fn new(type_: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            type_: type_.into(),
            status: String::new(),
            message: message.into(),
        }
    }
}

/// Find the message of the first condition of the given type.
///
/// Returns `None` when no such condition exists yet, which callers treat as
/// "the controller has not observed this object".
pub fn condition_message(conditions: &[Condition], type_: &str) -> Option<String> {
    conditions
        .iter()
        .find(|c| c.type_ == type_)
        .map(|c| c.message.clone())
}

/// Identifies one reconciliation object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRef {
    /// Object name
    pub name: String,
    /// Object namespace
    pub namespace: String,
}

impl ObjectRef {
    /// Create a reference from name and namespace.
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
        }
    }
}

/// The closed set of reconciliation object kinds this tool understands.
///
/// The runner and classifier reason exhaustively about these; adding a kind
/// means adding a check variant and a rule table, so this is deliberately an
/// enum rather than an open string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FluxKind {
    /// A Helm release record (helm-controller).
    HelmRelease,
    /// A chart source record (source-controller).
    HelmChart,
    /// A kustomization record (kustomize-controller).
    Kustomization,
}

impl FluxKind {
    /// API group of the kind's CRD.
    pub fn group(&self) -> &'static str {
        match self {
            FluxKind::HelmRelease => "helm.toolkit.fluxcd.io",
            FluxKind::HelmChart => "source.toolkit.fluxcd.io",
            FluxKind::Kustomization => "kustomize.toolkit.fluxcd.io",
        }
    }

    /// API version the tool targets.
    pub fn version(&self) -> &'static str {
        match self {
            FluxKind::HelmRelease => "v2",
            FluxKind::HelmChart => "v1",
            FluxKind::Kustomization => "v1",
        }
    }

    /// CRD kind name.
    pub fn kind(&self) -> &'static str {
        match self {
            FluxKind::HelmRelease => "HelmRelease",
            FluxKind::HelmChart => "HelmChart",
            FluxKind::Kustomization => "Kustomization",
        }
    }

    /// Plural resource name, as used in API paths.
    pub fn plural(&self) -> &'static str {
        match self {
            FluxKind::HelmRelease => "helmreleases",
            FluxKind::HelmChart => "helmcharts",
            FluxKind::Kustomization => "kustomizations",
        }
    }
}

impl std::fmt::Display for FluxKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.kind())
    }
}

/// Read-only access to the reconciliation API.
///
/// One instance is constructed per process and shared by all checks via
/// `Arc<dyn Cluster>`; implementations must be `Send + Sync`.
///
/// # Error Handling
///
/// - `NotFound`: the object/pod does not exist
/// - `Api`: the server answered with an error status
/// - `Network`: the server could not be reached
#[async_trait]
pub trait Cluster: Send + Sync {
    /// Fetch the status conditions of one object.
    ///
    /// An object that exists but carries no status yet yields an empty list.
    async fn conditions(
        &self,
        kind: FluxKind,
        name: &str,
        namespace: &str,
    ) -> Result<Vec<Condition>, ClusterError>;

    /// List all objects of a kind in a namespace.
    async fn list(&self, kind: FluxKind, namespace: &str) -> Result<Vec<ObjectRef>, ClusterError>;

    /// Fetch the current container logs of a pod, read fully.
    ///
    /// This is the live stream, not previous-container logs.
    async fn pod_logs(&self, namespace: &str, pod: &str) -> Result<String, ClusterError>;

    /// List pod names in a namespace matching a label selector.
    async fn pods_by_label(
        &self,
        namespace: &str,
        selector: &str,
    ) -> Result<Vec<String>, ClusterError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flux_kind_display() {
        assert_eq!(format!("{}", FluxKind::HelmRelease), "HelmRelease");
        assert_eq!(format!("{}", FluxKind::HelmChart), "HelmChart");
        assert_eq!(format!("{}", FluxKind::Kustomization), "Kustomization");
    }

    #[test]
    fn flux_kind_coordinates() {
        assert_eq!(FluxKind::HelmRelease.group(), "helm.toolkit.fluxcd.io");
        assert_eq!(FluxKind::HelmRelease.version(), "v2");
        assert_eq!(FluxKind::HelmChart.plural(), "helmcharts");
        assert_eq!(FluxKind::Kustomization.group(), "kustomize.toolkit.fluxcd.io");
    }

    #[test]
    fn condition_message_finds_ready() {
        let conditions = vec![
            Condition::new("Released", "Helm install succeeded"),
            Condition::new("Ready", "Release reconciliation succeeded"),
        ];

        assert_eq!(
            condition_message(&conditions, "Ready").as_deref(),
            Some("Release reconciliation succeeded")
        );
    }

    #[test]
    fn condition_message_missing_type() {
        let conditions = vec![Condition::new("Released", "whatever")];
        assert_eq!(condition_message(&conditions, "Ready"), None);
    }

    #[test]
    fn condition_deserializes_from_status_payload() {
        let raw = r#"{"type":"Ready","status":"False","message":"Helm install failed"}"#;
        let condition: Condition = serde_json::from_str(raw).unwrap();
        assert_eq!(condition.type_, "Ready");
        assert_eq!(condition.status, "False");
        assert_eq!(condition.message, "Helm install failed");
    }

    #[test]
    fn cluster_error_display() {
        assert_eq!(
            format!("{}", ClusterError::NotFound("helmreleases/foo".into())),
            "not found: helmreleases/foo"
        );
        assert_eq!(
            format!(
                "{}",
                ClusterError::Api {
                    status: 503,
                    message: "etcdserver: leader changed".into()
                }
            ),
            "API error: 503 - etcdserver: leader changed"
        );
        assert_eq!(
            format!("{}", ClusterError::Network("connection refused".into())),
            "network error: connection refused"
        );
    }
}
