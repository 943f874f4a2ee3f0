use envconfig::Envconfig;
use kube::Client;
use orch_env_api::{
    ContractError, EnvironmentResource, Migrated, Scheme, SchemaVersion,
    VersionedEnvironment,
};
use serde_json::Value;
use tracing::info;

use crate::admission;
use crate::config::CrmConfig;
use crate::controller::StatusWriter;
use crate::store::{EnvironmentStore, KubeStore};

/// Process-wide state assembled once at startup and passed explicitly.
#[derive(Clone)]
pub struct EnvironmentRuntime {
    pub scheme: Scheme,
    pub cfg: CrmConfig,
}

impl EnvironmentRuntime {
    pub fn new(cfg: CrmConfig) -> Self {
        Self {
            scheme: Scheme::environments(),
            cfg,
        }
    }

    pub fn from_env() -> anyhow::Result<Self> {
        let cfg = CrmConfig::init_from_env()?.apply_profile_defaults();
        info!(?cfg, "environment runtime configured");
        Ok(Self::new(cfg))
    }

    pub fn admit(&self, value: Value) -> Result<VersionedEnvironment, ContractError> {
        admission::admit(&self.scheme, value)
    }

    /// Convert using the configured missing-field policy.
    pub fn convert(
        &self,
        value: Value,
        target: SchemaVersion,
    ) -> Result<Migrated<VersionedEnvironment>, ContractError> {
        admission::convert(&self.scheme, value, target, self.cfg.migration.policy())
    }

    pub fn status_writer<S: EnvironmentStore>(&self, store: S) -> StatusWriter<S> {
        StatusWriter::new(store, self.cfg.retry_policy())
    }

    pub fn kube_status_writer<K: EnvironmentResource>(
        &self,
        client: Client,
    ) -> StatusWriter<KubeStore<K>> {
        self.status_writer(KubeStore::new(client))
    }
}
