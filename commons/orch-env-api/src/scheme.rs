//! Explicit type registry.
//!
//! Built once at startup and handed to whatever needs to decode persisted
//! objects; nothing is registered as a side effect of loading a module.

use std::collections::HashMap;

use serde_json::Value;
use tracing::trace;

use crate::error::ContractError;
use crate::identity::{TypeIdentity, split_api_version};
use crate::resource::{EnvironmentResource, SchemaVersion, VersionedEnvironment};

type Decoder = fn(Value) -> Result<VersionedEnvironment, serde_json::Error>;

fn decode_as<K: EnvironmentResource>(value: Value) -> Result<VersionedEnvironment, serde_json::Error> {
    serde_json::from_value::<K>(value).map(K::into_versioned)
}

#[derive(Clone)]
struct Entry {
    identity: TypeIdentity,
    schema: SchemaVersion,
    decode: Decoder,
}

#[derive(Default)]
pub struct SchemeBuilder {
    entries: Vec<Entry>,
}

impl SchemeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource type together with its `<Kind>List`.
    pub fn register<K: EnvironmentResource>(mut self) -> Self {
        self.entries.push(Entry {
            identity: TypeIdentity::of::<K>(),
            schema: K::SCHEMA,
            decode: decode_as::<K>,
        });
        self
    }

    pub fn build(self) -> Scheme {
        let mut kinds = HashMap::new();
        let mut lists = HashMap::new();
        for entry in self.entries {
            let api_version = entry.identity.api_version();
            trace!(%api_version, kind = %entry.identity.kind, "scheme: registered");
            lists.insert(
                (api_version.clone(), entry.identity.list_kind.clone()),
                (api_version.clone(), entry.identity.kind.clone()),
            );
            kinds.insert((api_version, entry.identity.kind.clone()), entry);
        }
        Scheme { kinds, lists }
    }
}

/// Immutable registry of known `(apiVersion, kind)` pairs.
#[derive(Clone)]
pub struct Scheme {
    kinds: HashMap<(String, String), Entry>,
    lists: HashMap<(String, String), (String, String)>,
}

impl Scheme {
    /// Both environment generations.
    pub fn environments() -> Self {
        SchemeBuilder::new()
            .register::<crate::v1::Environment>()
            .register::<crate::v2::Environment>()
            .build()
    }

    pub fn recognizes(&self, api_version: &str, kind: &str) -> bool {
        let key = (api_version.to_string(), kind.to_string());
        self.kinds.contains_key(&key) || self.lists.contains_key(&key)
    }

    pub fn identity(&self, version: SchemaVersion) -> Option<&TypeIdentity> {
        self.kinds
            .values()
            .find(|e| e.schema == version)
            .map(|e| &e.identity)
    }

    pub fn decode(&self, value: Value) -> Result<VersionedEnvironment, ContractError> {
        let (api_version, kind) = type_meta(&value)?;
        let entry = self
            .kinds
            .get(&(api_version.clone(), kind.clone()))
            .ok_or(ContractError::UnknownType { api_version, kind })?;
        Ok((entry.decode)(value)?)
    }

    /// Decode a `<Kind>List`; items without their own type meta inherit the list's.
    pub fn decode_list(&self, value: Value) -> Result<Vec<VersionedEnvironment>, ContractError> {
        let (api_version, kind) = type_meta(&value)?;
        let (item_api_version, item_kind) = self
            .lists
            .get(&(api_version.clone(), kind.clone()))
            .cloned()
            .ok_or(ContractError::UnknownType { api_version, kind })?;
        let items = match value {
            Value::Object(mut map) => map.remove("items").unwrap_or(Value::Array(vec![])),
            _ => Value::Array(vec![]),
        };
        let Value::Array(items) = items else {
            return Err(ContractError::Serialization(serde::de::Error::custom(
                "list items must be an array",
            )));
        };
        items
            .into_iter()
            .map(|mut item| {
                if let Value::Object(map) = &mut item {
                    map.entry("apiVersion")
                        .or_insert_with(|| Value::String(item_api_version.clone()));
                    map.entry("kind")
                        .or_insert_with(|| Value::String(item_kind.clone()));
                }
                self.decode(item)
            })
            .collect()
    }

    pub fn decode_yaml(&self, text: &str) -> Result<VersionedEnvironment, ContractError> {
        let value: Value = serde_yaml::from_str(text)?;
        self.decode(value)
    }

    pub fn encode(&self, env: &VersionedEnvironment) -> Result<Value, ContractError> {
        let value = match env {
            VersionedEnvironment::V1(e) => serde_json::to_value(e)?,
            VersionedEnvironment::V2(e) => serde_json::to_value(e)?,
        };
        Ok(value)
    }

    pub fn encode_yaml(&self, env: &VersionedEnvironment) -> Result<String, ContractError> {
        Ok(serde_yaml::to_string(&self.encode(env)?)?)
    }
}

fn type_meta(value: &Value) -> Result<(String, String), ContractError> {
    let api_version = value
        .get("apiVersion")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let kind = value
        .get("kind")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let (_, version) = split_api_version(&api_version);
    if version.is_empty() {
        return Err(ContractError::InvalidApiVersion(api_version));
    }
    Ok((api_version, kind))
}
