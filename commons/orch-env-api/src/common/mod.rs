//! Parts shared by every managed resource: the inlined `ResourceSpec` and
//! `ResourceStatus`, conditions, and the external-name annotation.

pub mod conditions;
pub mod time;

use kube::Resource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub use conditions::{Condition, ConditionStatus, ConditionType, find_condition, set_conditions};
pub use time::MetaTime;

/// Annotation holding the name of the resource in the external system.
pub const EXTERNAL_NAME_ANNOTATION: &str = "crossplane.io/external-name";

#[derive(Deserialize, Serialize, Clone, Debug, JsonSchema, PartialEq, Eq, Default)]
pub enum DeletionPolicy {
    #[default]
    Delete,
    Orphan,
}

#[derive(Deserialize, Serialize, Clone, Debug, JsonSchema, PartialEq, Eq)]
pub enum ManagementAction {
    #[serde(rename = "*")]
    All,
    Observe,
    Create,
    Update,
    Delete,
    LateInitialize,
}

fn default_management_policies() -> Vec<ManagementAction> {
    vec![ManagementAction::All]
}

#[derive(Deserialize, Serialize, Clone, Debug, JsonSchema, PartialEq, Eq, Default)]
pub struct Reference {
    pub name: String,
}

#[derive(Deserialize, Serialize, Clone, Debug, JsonSchema, PartialEq, Eq, Default)]
pub struct SecretReference {
    pub name: String,
    pub namespace: String,
}

/// Fields every managed resource spec carries next to `forProvider`.
#[derive(Deserialize, Serialize, Clone, Debug, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub write_connection_secret_to_ref: Option<SecretReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_config_ref: Option<Reference>,
    #[serde(default)]
    pub deletion_policy: DeletionPolicy,
    #[serde(default = "default_management_policies")]
    pub management_policies: Vec<ManagementAction>,
}

impl Default for ResourceSpec {
    fn default() -> Self {
        ResourceSpec {
            write_connection_secret_to_ref: None,
            provider_config_ref: None,
            deletion_policy: DeletionPolicy::Delete,
            management_policies: default_management_policies(),
        }
    }
}

/// Observed status fields every managed resource carries next to `atProvider`.
#[derive(Deserialize, Serialize, Clone, Debug, JsonSchema, PartialEq, Eq, Default)]
pub struct ResourceStatus {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
}

impl ResourceStatus {
    pub fn condition(&self, type_: &ConditionType) -> Option<&Condition> {
        find_condition(&self.conditions, type_)
    }

    pub fn set_conditions(&mut self, incoming: Vec<Condition>) {
        self.conditions = set_conditions(&self.conditions, incoming);
    }
}

pub fn external_name<K: Resource>(obj: &K) -> Option<&str> {
    obj.meta()
        .annotations
        .as_ref()
        .and_then(|a| a.get(EXTERNAL_NAME_ANNOTATION))
        .map(String::as_str)
}

pub fn set_external_name<K: Resource>(obj: &mut K, name: impl Into<String>) {
    obj.meta_mut()
        .annotations
        .get_or_insert_with(Default::default)
        .insert(EXTERNAL_NAME_ANNOTATION.to_string(), name.into());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_spec_defaults_when_absent() {
        let spec: ResourceSpec = serde_json::from_str("{}").unwrap();
        assert_eq!(spec, ResourceSpec::default());
        assert_eq!(spec.management_policies, vec![ManagementAction::All]);
    }

    #[test]
    fn management_wildcard_on_wire() {
        let json = serde_json::to_value(ResourceSpec::default()).unwrap();
        assert_eq!(json["managementPolicies"], serde_json::json!(["*"]));
        assert_eq!(json["deletionPolicy"], "Delete");
    }
}
