use crate::resource::SchemaVersion;
use crate::validate::ValidationError;

#[derive(thiserror::Error, Debug)]
pub enum ContractError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("cannot populate required field {field} converting {from} to {to}")]
    IncompatibleSchema {
        field: &'static str,
        from: SchemaVersion,
        to: SchemaVersion,
    },
    #[error("status write for {name} lost the update race {attempts} times")]
    Conflict { name: String, attempts: u32 },
    #[error("no type registered for apiVersion {api_version:?} kind {kind:?}")]
    UnknownType { api_version: String, kind: String },
    #[error("invalid apiVersion: {0:?}")]
    InvalidApiVersion(String),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("environment {0} not found")]
    NotFound(String),
    #[error("store error: {0}")]
    Store(String),
}

impl ContractError {
    /// Whether the caller should refetch and try again.
    pub fn is_conflict(&self) -> bool {
        matches!(self, ContractError::Conflict { .. })
    }
}
