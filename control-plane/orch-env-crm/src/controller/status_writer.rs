use kube::ResourceExt;
use orch_env_api::common::{Condition, ResourceStatus};
use orch_env_api::{ContractError, EnvironmentResource};
use tracing::{debug, info, instrument, warn};

use crate::config::RetryPolicy;
use crate::store::{EnvironmentStore, StoreError};

use super::status::{error_conditions, observed_conditions};

type Observation<S> = <<S as EnvironmentStore>::Resource as EnvironmentResource>::Observation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The stored status already matched; nothing was written.
    Unchanged,
    Written {
        resource_version: Option<String>,
        attempts: u32,
    },
}

/// Sole writer of the observed state.
///
/// Each attempt re-reads the object, overwrites `atProvider` wholesale,
/// upserts conditions and writes with the version it read. Lost races are
/// retried from a fresh read; only an exhausted budget reaches the caller.
pub struct StatusWriter<S> {
    store: S,
    retry: RetryPolicy,
}

impl<S: EnvironmentStore> StatusWriter<S> {
    pub fn new(store: S, retry: RetryPolicy) -> Self {
        Self { store, retry }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Record an observation with `Ready` derived from child health and
    /// `Synced=True`.
    pub async fn observe(
        &self,
        name: &str,
        observation: Observation<S>,
    ) -> Result<WriteOutcome, ContractError> {
        let conditions = observed_conditions(&observation);
        self.write_observation(name, observation, conditions).await
    }

    #[instrument(skip_all, fields(name = %name))]
    pub async fn write_observation(
        &self,
        name: &str,
        observation: Observation<S>,
        conditions: Vec<Condition>,
    ) -> Result<WriteOutcome, ContractError> {
        self.update(name, |status, _| {
            status.set_conditions(conditions.clone());
            observation.clone()
        })
        .await
    }

    /// Mark the resource out of sync; the last observation is kept.
    #[instrument(skip_all, fields(name = %name))]
    pub async fn record_error(
        &self,
        name: &str,
        err: &(dyn std::fmt::Display + Sync),
    ) -> Result<WriteOutcome, ContractError> {
        let conditions = error_conditions(err);
        self.update(name, |status, current| {
            status.set_conditions(conditions.clone());
            current.clone()
        })
        .await
    }

    async fn update<F>(&self, name: &str, mutate: F) -> Result<WriteOutcome, ContractError>
    where
        F: Fn(&mut ResourceStatus, &Observation<S>) -> Observation<S> + Send + Sync,
    {
        let max_attempts = self.retry.max_attempts.max(1);
        for attempt in 1..=max_attempts {
            let current = self.store.get(name).await?;
            let (status, observation) = current.status_parts();

            let mut next_status = status.clone();
            let next_observation = mutate(&mut next_status, &observation);
            if next_status == status && next_observation == observation {
                debug!(attempt, "status unchanged; skipping write");
                return Ok(WriteOutcome::Unchanged);
            }

            let mut next = current;
            next.set_status_parts(next_status, next_observation);
            match self.store.replace_status(&next).await {
                Ok(stored) => {
                    info!(attempt, rv = ?stored.resource_version(), "status written");
                    return Ok(WriteOutcome::Written {
                        resource_version: stored.resource_version(),
                        attempts: attempt,
                    });
                }
                Err(StoreError::Conflict(_)) => {
                    warn!(attempt, max_attempts, "status write conflict; refetching");
                    if attempt < max_attempts {
                        tokio::time::sleep(self.retry.delay(attempt)).await;
                    }
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(ContractError::Conflict {
            name: name.to_string(),
            attempts: max_attempts,
        })
    }
}
