use std::fmt;
use std::fmt::Debug;

use kube::{Resource, ResourceExt};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::common::ResourceStatus;
use crate::observed::{Observation, ready_condition};
use crate::validate::{ValidationError, validate_v1, validate_v2};
use crate::{common::Condition, v1, v2};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SchemaVersion {
    V1,
    V2,
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaVersion::V1 => write!(f, "{}/{}", v1::GROUP, v1::VERSION),
            SchemaVersion::V2 => write!(f, "{}/{}", v2::GROUP, v2::VERSION),
        }
    }
}

/// Envelope operations shared by both schema generations.
pub trait EnvironmentResource:
    Resource<DynamicType = ()>
    + Clone
    + Debug
    + PartialEq
    + Serialize
    + DeserializeOwned
    + Send
    + Sync
    + 'static
{
    type Observation: Observation;

    const SCHEMA: SchemaVersion;

    /// Admission check of the desired state.
    fn validate(&self) -> Result<(), ValidationError>;

    /// Conditions and observation, normalized: a missing status reads as empty.
    fn status_parts(&self) -> (ResourceStatus, Self::Observation);

    /// Replace the whole status subresource.
    fn set_status_parts(&mut self, status: ResourceStatus, observation: Self::Observation);

    fn into_versioned(self) -> VersionedEnvironment;

    fn observation(&self) -> Self::Observation {
        self.status_parts().1
    }

    fn ready_condition(&self) -> Condition {
        ready_condition(self.observation().instances())
    }
}

impl EnvironmentResource for v1::Environment {
    type Observation = v1::EnvironmentObservation;

    const SCHEMA: SchemaVersion = SchemaVersion::V1;

    fn validate(&self) -> Result<(), ValidationError> {
        validate_v1(&self.spec.for_provider).map_err(|e| e.with_resource(self.meta().name.clone()))
    }

    fn status_parts(&self) -> (ResourceStatus, Self::Observation) {
        self.status
            .clone()
            .map(|s| (s.resource_status, s.at_provider))
            .unwrap_or_default()
    }

    fn set_status_parts(&mut self, status: ResourceStatus, observation: Self::Observation) {
        self.status = Some(v1::EnvironmentStatus {
            resource_status: status,
            at_provider: observation,
        });
    }

    fn into_versioned(self) -> VersionedEnvironment {
        VersionedEnvironment::V1(self)
    }
}

impl EnvironmentResource for v2::Environment {
    type Observation = v2::EnvironmentObservation;

    const SCHEMA: SchemaVersion = SchemaVersion::V2;

    fn validate(&self) -> Result<(), ValidationError> {
        validate_v2(&self.spec.for_provider).map_err(|e| e.with_resource(self.meta().name.clone()))
    }

    fn status_parts(&self) -> (ResourceStatus, Self::Observation) {
        self.status
            .clone()
            .map(|s| (s.resource_status, s.at_provider))
            .unwrap_or_default()
    }

    fn set_status_parts(&mut self, status: ResourceStatus, observation: Self::Observation) {
        self.status = Some(v2::EnvironmentStatus {
            resource_status: status,
            at_provider: observation,
        });
    }

    fn into_versioned(self) -> VersionedEnvironment {
        VersionedEnvironment::V2(self)
    }
}

/// An environment in either schema generation.
#[derive(Clone, Debug, PartialEq)]
pub enum VersionedEnvironment {
    V1(v1::Environment),
    V2(v2::Environment),
}

impl VersionedEnvironment {
    pub fn schema_version(&self) -> SchemaVersion {
        match self {
            VersionedEnvironment::V1(_) => SchemaVersion::V1,
            VersionedEnvironment::V2(_) => SchemaVersion::V2,
        }
    }

    pub fn name_any(&self) -> String {
        match self {
            VersionedEnvironment::V1(e) => e.name_any(),
            VersionedEnvironment::V2(e) => e.name_any(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            VersionedEnvironment::V1(e) => e.validate(),
            VersionedEnvironment::V2(e) => e.validate(),
        }
    }

    pub fn as_v1(&self) -> Option<&v1::Environment> {
        match self {
            VersionedEnvironment::V1(e) => Some(e),
            VersionedEnvironment::V2(_) => None,
        }
    }

    pub fn as_v2(&self) -> Option<&v2::Environment> {
        match self {
            VersionedEnvironment::V2(e) => Some(e),
            VersionedEnvironment::V1(_) => None,
        }
    }
}

impl From<v1::Environment> for VersionedEnvironment {
    fn from(value: v1::Environment) -> Self {
        VersionedEnvironment::V1(value)
    }
}

impl From<v2::Environment> for VersionedEnvironment {
    fn from(value: v2::Environment) -> Self {
        VersionedEnvironment::V2(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::ResourceSpec;

    #[test]
    fn missing_status_reads_as_empty() {
        let env = v2::Environment::new(
            "demo",
            v2::EnvironmentSpec {
                resource_spec: ResourceSpec::default(),
                for_provider: v2::EnvironmentParameters::default(),
            },
        );
        let (status, obs) = env.status_parts();
        assert!(status.conditions.is_empty());
        assert!(obs.instances.is_empty());
    }

    #[test]
    fn validation_names_the_resource() {
        let env = v1::Environment::new(
            "demo",
            v1::EnvironmentSpec {
                resource_spec: ResourceSpec::default(),
                for_provider: v1::EnvironmentParameters {
                    environment_type: "dev".into(),
                    ..Default::default()
                },
            },
        );
        let err = env.validate().unwrap_err();
        assert_eq!(err.resource.as_deref(), Some("demo"));
    }

    #[test]
    fn version_display_is_group_version() {
        assert_eq!(
            SchemaVersion::V1.to_string(),
            "environment.orchestrator.io/v1alpha1"
        );
    }
}
