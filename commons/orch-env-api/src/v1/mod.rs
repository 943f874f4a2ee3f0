//! First schema generation: tenant-scoped environments whose child
//! instances carry full API-version identity and an optional UID.

use chrono::{DateTime, Utc};
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::common::{MetaTime, ResourceSpec, ResourceStatus};
use crate::observed::ChildIdentity;

pub const GROUP: &str = "environment.orchestrator.io";
pub const VERSION: &str = "v1alpha1";

#[derive(CustomResource, Deserialize, Serialize, Clone, Debug, JsonSchema, PartialEq)]
#[kube(
    group = "environment.orchestrator.io",
    version = "v1alpha1",
    kind = "Environment",
    plural = "environments",
    status = "EnvironmentStatus",
    derive = "PartialEq",
    category = "crossplane",
    category = "managed",
    category = "orchestrator",
    printcolumn = r#"{"name":"READY","type":"string","jsonPath":".status.conditions[?(@.type=='Ready')].status"}"#,
    printcolumn = r#"{"name":"SYNCED","type":"string","jsonPath":".status.conditions[?(@.type=='Synced')].status"}"#,
    printcolumn = r#"{"name":"EXTERNAL-NAME","type":"string","jsonPath":".metadata.annotations.crossplane\\.io/external-name"}"#,
    printcolumn = r#"{"name":"AGE","type":"date","jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentSpec {
    #[serde(flatten)]
    pub resource_spec: ResourceSpec,
    pub for_provider: EnvironmentParameters,
}

/// Configurable fields of an environment.
#[derive(Deserialize, Serialize, Clone, Debug, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentParameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_name: Option<String>,
    /// Free-form classification such as "dev" or "staging"
    #[serde(default)]
    pub environment_type: String,
    /// After this instant the environment may be reclaimed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_time: Option<MetaTime>,
    #[serde(default)]
    pub owner: String,
}

impl EnvironmentParameters {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiration_time.is_some_and(|t| now >= t.0)
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentStatus {
    #[serde(flatten)]
    pub resource_status: ResourceStatus,
    #[serde(default)]
    pub at_provider: EnvironmentObservation,
}

/// Observed child resources, in discovery order.
#[derive(Deserialize, Serialize, Clone, Debug, JsonSchema, PartialEq, Eq, Default)]
pub struct EnvironmentObservation {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub instances: Vec<EnvironmentXrc>,
}

/// A composite resource claim created on behalf of the environment.
#[derive(Deserialize, Serialize, Clone, Debug, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentXrc {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub api_version: String,
    /// Identifies one generation of the child even if its name is reused
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(default)]
    pub status: bool,
}

impl ChildIdentity for EnvironmentXrc {
    type Key = (String, String);

    fn key(&self) -> Self::Key {
        (self.name.clone(), self.kind.clone())
    }

    fn display_name(&self) -> String {
        format!("{}/{}", self.kind, self.name)
    }

    fn healthy(&self) -> bool {
        self.status
    }
}
