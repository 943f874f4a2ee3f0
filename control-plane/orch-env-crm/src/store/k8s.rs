use async_trait::async_trait;
use kube::api::{Api, Patch, PatchParams};
use kube::{Client, ResourceExt};
use orch_env_api::EnvironmentResource;
use serde_json::{Value, json};
use tracing::{debug, trace};

use super::{EnvironmentStore, StoreError};

/// Status writes against the Kubernetes API server.
#[derive(Clone)]
pub struct KubeStore<K> {
    api: Api<K>,
}

impl<K: EnvironmentResource> KubeStore<K> {
    pub fn new(client: Client) -> Self {
        Self {
            api: Api::all(client),
        }
    }
}

/// Merge patch for the status subresource.
///
/// `metadata.resourceVersion` turns the patch into a version-checked write.
/// `atProvider.instances` is always present (null when empty) so a merge
/// patch replaces the previous list instead of leaving it behind.
pub fn status_patch<K: EnvironmentResource>(obj: &K) -> Result<Value, StoreError> {
    let name = obj.name_any();
    let resource_version = obj
        .resource_version()
        .ok_or_else(|| StoreError::MissingResourceVersion(name.clone()))?;
    let (status, observation) = obj.status_parts();
    let mut at_provider =
        serde_json::to_value(&observation).map_err(|e| StoreError::Backend(e.to_string()))?;
    if let Value::Object(map) = &mut at_provider {
        map.entry("instances").or_insert(Value::Null);
    }
    let conditions = if status.conditions.is_empty() {
        Value::Null
    } else {
        serde_json::to_value(&status.conditions).map_err(|e| StoreError::Backend(e.to_string()))?
    };
    Ok(json!({
        "metadata": {"resourceVersion": resource_version},
        "status": {
            "conditions": conditions,
            "atProvider": at_provider,
        }
    }))
}

pub(crate) fn map_kube_err(name: &str, e: kube::Error) -> StoreError {
    match e {
        kube::Error::Api(ae) if ae.code == 409 => StoreError::Conflict(name.to_string()),
        kube::Error::Api(ae) if ae.code == 404 => StoreError::NotFound(name.to_string()),
        other => StoreError::Backend(other.to_string()),
    }
}

#[async_trait]
impl<K: EnvironmentResource> EnvironmentStore for KubeStore<K> {
    type Resource = K;

    async fn get(&self, name: &str) -> Result<K, StoreError> {
        trace!(%name, "kube store: get");
        self.api.get(name).await.map_err(|e| map_kube_err(name, e))
    }

    async fn replace_status(&self, obj: &K) -> Result<K, StoreError> {
        let name = obj.name_any();
        let patch = status_patch(obj)?;
        debug!(%name, rv = ?obj.resource_version(), "kube store: patch status");
        self.api
            .patch_status(&name, &PatchParams::default(), &Patch::Merge(&patch))
            .await
            .map_err(|e| map_kube_err(&name, e))
    }
}
