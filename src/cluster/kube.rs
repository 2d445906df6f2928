//! cluster::kube
//!
//! Production `Cluster` implementation over the Kubernetes API.
//!
//! # Design
//!
//! The three Flux kinds are custom resources, so they are fetched through
//! `DynamicObject` APIs built from each kind's group/version/plural
//! coordinates; pods use the typed core-v1 API for logs and label-selector
//! listing.
//!
//! The client is constructed explicitly and handed to checks as
//! `Arc<dyn Cluster>` — there is deliberately no process-wide singleton, so
//! tests and embedders can substitute [`MockCluster`](super::MockCluster).
//!
//! [`connect`](KubeCluster::connect) resolves the kubeconfig the standard way
//! (in-cluster, then `KUBECONFIG`, then `~/.kube/config`) unless an explicit
//! path is given.

use std::path::PathBuf;

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Pod;
use kube::api::{Api, ApiResource, DynamicObject, ListParams, LogParams};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::core::GroupVersionKind;
use kube::{Client, Config};
use tracing::debug;

use super::{Cluster, ClusterError, Condition, FluxKind, ObjectRef};

/// `Cluster` backed by a live Kubernetes API connection.
#[derive(Clone)]
pub struct KubeCluster {
    client: Client,
}

impl std::fmt::Debug for KubeCluster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeCluster")
            .field("default_namespace", &self.client.default_namespace())
            .finish()
    }
}

impl KubeCluster {
    /// Create a cluster from an already-built kube client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Connect using standard kubeconfig resolution, or an explicit path.
    pub async fn connect(kubeconfig: Option<PathBuf>) -> Result<Self, ClusterError> {
        let config = match kubeconfig {
            Some(path) => {
                let kc = Kubeconfig::read_from(&path)
                    .map_err(|e| ClusterError::Network(e.to_string()))?;
                Config::from_custom_kubeconfig(kc, &KubeConfigOptions::default())
                    .await
                    .map_err(|e| ClusterError::Network(e.to_string()))?
            }
            None => Config::infer()
                .await
                .map_err(|e| ClusterError::Network(e.to_string()))?,
        };

        let client = Client::try_from(config).map_err(map_kube_error)?;
        Ok(Self::new(client))
    }

    fn dynamic_api(&self, kind: FluxKind, namespace: &str) -> Api<DynamicObject> {
        let gvk = GroupVersionKind::gvk(kind.group(), kind.version(), kind.kind());
        let resource = ApiResource::from_gvk_with_plural(&gvk, kind.plural());
        Api::namespaced_with(self.client.clone(), namespace, &resource)
    }
}

/// Map a kube client error into the module taxonomy.
fn map_kube_error(err: kube::Error) -> ClusterError {
    match err {
        kube::Error::Api(response) if response.code == 404 => {
            ClusterError::NotFound(response.message)
        }
        kube::Error::Api(response) => ClusterError::Api {
            status: response.code,
            message: response.message,
        },
        other => ClusterError::Network(other.to_string()),
    }
}

/// Pull `.status.conditions` out of a dynamic object.
fn extract_conditions(object: &DynamicObject) -> Vec<Condition> {
    object
        .data
        .get("status")
        .and_then(|status| status.get("conditions"))
        .and_then(|conditions| serde_json::from_value(conditions.clone()).ok())
        .unwrap_or_default()
}

#[async_trait]
impl Cluster for KubeCluster {
    async fn conditions(
        &self,
        kind: FluxKind,
        name: &str,
        namespace: &str,
    ) -> Result<Vec<Condition>, ClusterError> {
        debug!(%kind, name, namespace, "fetching conditions");

        let api = self.dynamic_api(kind, namespace);
        let object = api.get(name).await.map_err(map_kube_error)?;
        Ok(extract_conditions(&object))
    }

    async fn list(&self, kind: FluxKind, namespace: &str) -> Result<Vec<ObjectRef>, ClusterError> {
        debug!(%kind, namespace, "listing objects");

        let api = self.dynamic_api(kind, namespace);
        let objects = api
            .list(&ListParams::default())
            .await
            .map_err(map_kube_error)?;

        Ok(objects
            .items
            .iter()
            .filter_map(|object| {
                let name = object.metadata.name.clone()?;
                let namespace = object
                    .metadata
                    .namespace
                    .clone()
                    .unwrap_or_else(|| namespace.to_string());
                Some(ObjectRef::new(name, namespace))
            })
            .collect())
    }

    async fn pod_logs(&self, namespace: &str, pod: &str) -> Result<String, ClusterError> {
        debug!(namespace, pod, "fetching pod logs");

        let pods: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        pods.logs(pod, &LogParams::default())
            .await
            .map_err(map_kube_error)
    }

    async fn pods_by_label(
        &self,
        namespace: &str,
        selector: &str,
    ) -> Result<Vec<String>, ClusterError> {
        debug!(namespace, selector, "listing pods by label");

        let pods: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        let list = pods
            .list(&ListParams::default().labels(selector))
            .await
            .map_err(map_kube_error)?;

        Ok(list
            .items
            .into_iter()
            .filter_map(|pod| pod.metadata.name)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kube::core::ErrorResponse;

    fn api_error(code: u16, message: &str) -> kube::Error {
        kube::Error::Api(ErrorResponse {
            status: "Failure".to_string(),
            message: message.to_string(),
            reason: String::new(),
            code,
        })
    }

    #[test]
    fn maps_404_to_not_found() {
        let mapped = map_kube_error(api_error(404, "helmreleases \"foo\" not found"));
        assert!(matches!(mapped, ClusterError::NotFound(_)));
    }

    #[test]
    fn maps_other_api_errors() {
        let mapped = map_kube_error(api_error(503, "leader changed"));
        assert!(matches!(mapped, ClusterError::Api { status: 503, .. }));
    }

    #[test]
    fn extracts_conditions_from_status() {
        let raw = serde_json::json!({
            "apiVersion": "helm.toolkit.fluxcd.io/v2",
            "kind": "HelmRelease",
            "metadata": { "name": "cert-manager", "namespace": "flux-system" },
            "status": {
                "conditions": [
                    { "type": "Ready", "status": "True", "message": "Release reconciliation succeeded" }
                ]
            }
        });
        let object: DynamicObject = serde_json::from_value(raw).unwrap();

        let conditions = extract_conditions(&object);
        assert_eq!(conditions.len(), 1);
        assert_eq!(conditions[0].type_, "Ready");
    }

    #[test]
    fn extracts_empty_when_no_status() {
        let raw = serde_json::json!({
            "apiVersion": "helm.toolkit.fluxcd.io/v2",
            "kind": "HelmRelease",
            "metadata": { "name": "cert-manager", "namespace": "flux-system" }
        });
        let object: DynamicObject = serde_json::from_value(raw).unwrap();

        assert!(extract_conditions(&object).is_empty());
    }
}
