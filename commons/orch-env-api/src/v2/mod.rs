//! Second schema generation: application-scoped environments whose child
//! instances are identified by name, group and kind.

use chrono::{DateTime, Utc};
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::common::{ResourceSpec, ResourceStatus};
use crate::observed::ChildIdentity;

pub const GROUP: &str = "application.orchestrator.io";
pub const VERSION: &str = "v1alpha1";

#[derive(CustomResource, Deserialize, Serialize, Clone, Debug, JsonSchema, PartialEq)]
#[kube(
    group = "application.orchestrator.io",
    version = "v1alpha1",
    kind = "Environment",
    plural = "environments",
    status = "EnvironmentStatus",
    derive = "PartialEq",
    category = "crossplane",
    category = "managed",
    category = "template",
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

#[derive(Deserialize, Serialize, Clone, Debug, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentParameters {
    #[serde(default)]
    pub application_name: String,
    #[serde(default)]
    pub environment_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub owner: String,
}

impl EnvironmentParameters {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiration_time.is_some_and(|t| now >= t)
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

#[derive(Deserialize, Serialize, Clone, Debug, JsonSchema, PartialEq, Eq, Default)]
pub struct EnvironmentObservation {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub instances: Vec<EnvironmentInstance>,
}

#[derive(Deserialize, Serialize, Clone, Debug, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentInstance {
    #[serde(default)]
    pub instance_name: String,
    #[serde(default)]
    pub instance_group: String,
    #[serde(default)]
    pub instance_kind: String,
    #[serde(default)]
    pub status: bool,
}

impl ChildIdentity for EnvironmentInstance {
    type Key = (String, String);

    fn key(&self) -> Self::Key {
        (self.instance_name.clone(), self.instance_group.clone())
    }

    fn display_name(&self) -> String {
        if self.instance_group.is_empty() {
            format!("{}/{}", self.instance_kind, self.instance_name)
        } else {
            format!(
                "{}.{}/{}",
                self.instance_kind, self.instance_group, self.instance_name
            )
        }
    }

    fn healthy(&self) -> bool {
        self.status
    }
}
