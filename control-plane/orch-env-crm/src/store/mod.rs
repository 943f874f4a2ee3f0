//! Backends holding environment objects.
//!
//! Writers never lock: every status write carries the `resourceVersion` it
//! was computed from and the backend refuses it if the object moved on.

mod k8s;
mod memory;

use async_trait::async_trait;
use orch_env_api::{ContractError, EnvironmentResource};

pub use k8s::{KubeStore, status_patch};
pub use memory::MemoryStore;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("environment {0} not found")]
    NotFound(String),
    #[error("resource version conflict on {0}")]
    Conflict(String),
    #[error("refusing unversioned status write for {0}")]
    MissingResourceVersion(String),
    #[error("backend error: {0}")]
    Backend(String),
}

/// `StatusWriter` retries conflicts itself; a conflict converted here comes
/// from a direct store call and counts as a single lost attempt.
impl From<StoreError> for ContractError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound(name) => ContractError::NotFound(name),
            StoreError::Conflict(name) => ContractError::Conflict { name, attempts: 1 },
            other => ContractError::Store(other.to_string()),
        }
    }
}

#[async_trait]
pub trait EnvironmentStore: Send + Sync {
    type Resource: EnvironmentResource;

    async fn get(&self, name: &str) -> Result<Self::Resource, StoreError>;

    /// Write `obj`'s status if its `resourceVersion` is still current.
    async fn replace_status(&self, obj: &Self::Resource) -> Result<Self::Resource, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_keep_their_kind() {
        assert!(matches!(
            ContractError::from(StoreError::NotFound("a".into())),
            ContractError::NotFound(name) if name == "a"
        ));
        let conflict = ContractError::from(StoreError::Conflict("a".into()));
        assert!(conflict.is_conflict());
        assert!(matches!(conflict, ContractError::Conflict { attempts: 1, .. }));
        assert!(matches!(
            ContractError::from(StoreError::MissingResourceVersion("a".into())),
            ContractError::Store(_)
        ));
    }
}
