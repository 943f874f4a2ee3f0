use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use async_trait::async_trait;
use kube::ResourceExt;
use orch_env_api::EnvironmentResource;
use tokio::sync::RwLock;
use tracing::trace;

use super::{EnvironmentStore, StoreError};

/// In-process store with the same version-check semantics as the API server.
#[derive(Clone)]
pub struct MemoryStore<K> {
    objects: Arc<RwLock<HashMap<String, K>>>,
    version: Arc<AtomicU64>,
    writes: Arc<AtomicU64>,
    injected_conflicts: Arc<AtomicU32>,
}

impl<K: EnvironmentResource> Default for MemoryStore<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: EnvironmentResource> MemoryStore<K> {
    pub fn new() -> Self {
        Self {
            objects: Arc::new(RwLock::new(HashMap::new())),
            version: Arc::new(AtomicU64::new(0)),
            writes: Arc::new(AtomicU64::new(0)),
            injected_conflicts: Arc::new(AtomicU32::new(0)),
        }
    }

    fn next_version(&self) -> String {
        (self.version.fetch_add(1, Ordering::SeqCst) + 1).to_string()
    }

    /// Create or overwrite an object, assigning a fresh resource version.
    pub async fn insert(&self, mut obj: K) -> K {
        obj.meta_mut().resource_version = Some(self.next_version());
        let mut w = self.objects.write().await;
        w.insert(obj.name_any(), obj.clone());
        obj
    }

    /// The next `n` status writes lose the race to a simulated concurrent writer.
    pub fn inject_conflicts(&self, n: u32) {
        self.injected_conflicts.store(n, Ordering::SeqCst);
    }

    /// Successful status writes so far.
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    /// Bump the version as if another writer had updated the object.
    pub async fn touch(&self, name: &str) -> Result<(), StoreError> {
        let version = self.next_version();
        let mut w = self.objects.write().await;
        let obj = w
            .get_mut(name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))?;
        obj.meta_mut().resource_version = Some(version);
        Ok(())
    }
}

#[async_trait]
impl<K: EnvironmentResource> EnvironmentStore for MemoryStore<K> {
    type Resource = K;

    async fn get(&self, name: &str) -> Result<K, StoreError> {
        let r = self.objects.read().await;
        r.get(name)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    async fn replace_status(&self, obj: &K) -> Result<K, StoreError> {
        let name = obj.name_any();
        let expected = obj
            .resource_version()
            .ok_or_else(|| StoreError::MissingResourceVersion(name.clone()))?;

        let mut w = self.objects.write().await;
        let current = w
            .get_mut(&name)
            .ok_or_else(|| StoreError::NotFound(name.clone()))?;
        if current.resource_version().as_deref() != Some(expected.as_str()) {
            trace!(%name, %expected, "memory store: stale write");
            return Err(StoreError::Conflict(name));
        }
        let injected = self
            .injected_conflicts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if injected {
            current.meta_mut().resource_version = Some(self.next_version());
            trace!(%name, "memory store: injected conflict");
            return Err(StoreError::Conflict(name));
        }

        // Only the status subresource is written; spec and metadata stay as stored.
        let (status, observation) = obj.status_parts();
        current.set_status_parts(status, observation);
        current.meta_mut().resource_version = Some(self.next_version());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(current.clone())
    }
}
