//! Conversion between the two schema generations.
//!
//! Conversions are total over [`VersionedEnvironment`] but not lossless:
//! everything the target cannot hold is listed in a [`MigrationReport`]
//! instead of being silently dropped, and nothing the source never had is
//! invented for the target.
//!
//! A source missing a field required by every generation is rejected before
//! any conversion. Version-specific requirements are left to admission; an
//! unset V1 `applicationName` is governed by [`MissingRequiredPolicy`].

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::common::MetaTime;
use crate::error::ContractError;
use crate::identity::split_api_version;
use crate::resource::{SchemaVersion, VersionedEnvironment};
use crate::validate::validate_common;
use crate::{v1, v2};

/// What to do when the target requires a field the source left unset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MissingRequiredPolicy {
    /// Fill with the empty value and report it as lossy.
    #[default]
    DefaultEmpty,
    /// Refuse with `IncompatibleSchema`.
    Fail,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown missing-field policy {0:?}, expected \"default-empty\" or \"fail\"")]
pub struct UnknownPolicy(pub String);

impl FromStr for MissingRequiredPolicy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default-empty" => Ok(MissingRequiredPolicy::DefaultEmpty),
            "fail" => Ok(MissingRequiredPolicy::Fail),
            _ => Err(UnknownPolicy(s.to_string())),
        }
    }
}

impl fmt::Display for MissingRequiredPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingRequiredPolicy::DefaultEmpty => write!(f, "default-empty"),
            MissingRequiredPolicy::Fail => write!(f, "fail"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LossyField {
    TenantName { value: String },
    ApplicationNameDefaulted,
    InstanceUid { index: usize, name: String, uid: String },
    InstanceApiVersion { index: usize, name: String, api_version: String },
    InstanceGroup { index: usize, name: String, group: String },
}

impl LossyField {
    pub fn path(&self) -> String {
        match self {
            LossyField::TenantName { .. } => "spec.forProvider.tenantName".into(),
            LossyField::ApplicationNameDefaulted => "spec.forProvider.applicationName".into(),
            LossyField::InstanceUid { index, .. } => {
                format!("status.atProvider.instances[{index}].uid")
            }
            LossyField::InstanceApiVersion { index, .. } => {
                format!("status.atProvider.instances[{index}].apiVersion")
            }
            LossyField::InstanceGroup { index, .. } => {
                format!("status.atProvider.instances[{index}].instanceGroup")
            }
        }
    }
}

impl fmt::Display for LossyField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LossyField::TenantName { value } => write!(f, "{}: dropped {value:?}", self.path()),
            LossyField::ApplicationNameDefaulted => {
                write!(f, "{}: unset in source, left empty", self.path())
            }
            LossyField::InstanceUid { name, uid, .. } => {
                write!(f, "{} ({name}): dropped {uid:?}", self.path())
            }
            LossyField::InstanceApiVersion {
                name, api_version, ..
            } => write!(f, "{} ({name}): dropped {api_version:?}", self.path()),
            LossyField::InstanceGroup { name, group, .. } => {
                write!(f, "{} ({name}): dropped {group:?}", self.path())
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct MigrationReport {
    pub lossy: Vec<LossyField>,
}

impl MigrationReport {
    pub fn is_lossless(&self) -> bool {
        self.lossy.is_empty()
    }

    fn push(&mut self, field: LossyField) {
        self.lossy.push(field);
    }

    fn extend(&mut self, other: MigrationReport) {
        self.lossy.extend(other.lossy);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Migrated<T> {
    pub value: T,
    pub report: MigrationReport,
}

fn non_empty(s: &Option<String>) -> Option<&str> {
    s.as_deref().filter(|v| !v.is_empty())
}

pub fn parameters_v1_to_v2(
    params: &v1::EnvironmentParameters,
    policy: MissingRequiredPolicy,
) -> Result<Migrated<v2::EnvironmentParameters>, ContractError> {
    validate_common(&params.environment_type, &params.owner)?;
    let mut report = MigrationReport::default();

    let application_name = match non_empty(&params.application_name) {
        Some(name) => name.to_string(),
        None if policy == MissingRequiredPolicy::Fail => {
            return Err(ContractError::IncompatibleSchema {
                field: "applicationName",
                from: SchemaVersion::V1,
                to: SchemaVersion::V2,
            });
        }
        None => {
            report.push(LossyField::ApplicationNameDefaulted);
            String::new()
        }
    };
    if let Some(tenant) = non_empty(&params.tenant_name) {
        report.push(LossyField::TenantName {
            value: tenant.to_string(),
        });
    }

    Ok(Migrated {
        value: v2::EnvironmentParameters {
            application_name,
            environment_type: params.environment_type.clone(),
            expiration_time: params.expiration_time.map(|t| t.0),
            owner: params.owner.clone(),
        },
        report,
    })
}

/// Every V2 field has a V1 home; `tenantName` stays unset. An empty
/// `applicationName` maps to an absent one.
pub fn parameters_v2_to_v1(
    params: &v2::EnvironmentParameters,
) -> Result<Migrated<v1::EnvironmentParameters>, ContractError> {
    validate_common(&params.environment_type, &params.owner)?;
    Ok(Migrated {
        value: v1::EnvironmentParameters {
            application_name: Some(params.application_name.clone()).filter(|a| !a.is_empty()),
            tenant_name: None,
            environment_type: params.environment_type.clone(),
            expiration_time: params.expiration_time.map(MetaTime),
            owner: params.owner.clone(),
        },
        report: MigrationReport::default(),
    })
}

/// The API group of a child becomes its `instanceGroup`; the version and UID
/// have nowhere to go.
pub fn observation_v1_to_v2(obs: &v1::EnvironmentObservation) -> Migrated<v2::EnvironmentObservation> {
    let mut report = MigrationReport::default();
    let instances = obs
        .instances
        .iter()
        .enumerate()
        .map(|(index, xrc)| {
            if let Some(uid) = non_empty(&xrc.uid) {
                report.push(LossyField::InstanceUid {
                    index,
                    name: xrc.name.clone(),
                    uid: uid.to_string(),
                });
            }
            if !xrc.api_version.is_empty() {
                report.push(LossyField::InstanceApiVersion {
                    index,
                    name: xrc.name.clone(),
                    api_version: xrc.api_version.clone(),
                });
            }
            let (group, _) = split_api_version(&xrc.api_version);
            v2::EnvironmentInstance {
                instance_name: xrc.name.clone(),
                instance_group: group.to_string(),
                instance_kind: xrc.kind.clone(),
                status: xrc.status,
            }
        })
        .collect();
    Migrated {
        value: v2::EnvironmentObservation { instances },
        report,
    }
}

/// `apiVersion` and `uid` are left empty rather than guessed.
pub fn observation_v2_to_v1(obs: &v2::EnvironmentObservation) -> Migrated<v1::EnvironmentObservation> {
    let mut report = MigrationReport::default();
    let instances = obs
        .instances
        .iter()
        .enumerate()
        .map(|(index, inst)| {
            if !inst.instance_group.is_empty() {
                report.push(LossyField::InstanceGroup {
                    index,
                    name: inst.instance_name.clone(),
                    group: inst.instance_group.clone(),
                });
            }
            v1::EnvironmentXrc {
                name: inst.instance_name.clone(),
                kind: inst.instance_kind.clone(),
                api_version: String::new(),
                uid: None,
                status: inst.status,
            }
        })
        .collect();
    Migrated {
        value: v1::EnvironmentObservation { instances },
        report,
    }
}

pub fn environment_v1_to_v2(
    env: &v1::Environment,
    policy: MissingRequiredPolicy,
) -> Result<Migrated<v2::Environment>, ContractError> {
    let params = parameters_v1_to_v2(&env.spec.for_provider, policy)
        .map_err(|e| with_resource(e, env.metadata.name.clone()))?;
    let mut report = params.report;
    let status = env.status.as_ref().map(|s| {
        let obs = observation_v1_to_v2(&s.at_provider);
        report.extend(obs.report);
        v2::EnvironmentStatus {
            resource_status: s.resource_status.clone(),
            at_provider: obs.value,
        }
    });
    let mut out = v2::Environment::new(
        "",
        v2::EnvironmentSpec {
            resource_spec: env.spec.resource_spec.clone(),
            for_provider: params.value,
        },
    );
    out.metadata = env.metadata.clone();
    out.status = status;
    debug!(name = ?env.metadata.name, lossy = report.lossy.len(), "migrated v1 -> v2");
    Ok(Migrated { value: out, report })
}

pub fn environment_v2_to_v1(env: &v2::Environment) -> Result<Migrated<v1::Environment>, ContractError> {
    let params = parameters_v2_to_v1(&env.spec.for_provider)
        .map_err(|e| with_resource(e, env.metadata.name.clone()))?;
    let mut report = params.report;
    let status = env.status.as_ref().map(|s| {
        let obs = observation_v2_to_v1(&s.at_provider);
        report.extend(obs.report);
        v1::EnvironmentStatus {
            resource_status: s.resource_status.clone(),
            at_provider: obs.value,
        }
    });
    let mut out = v1::Environment::new(
        "",
        v1::EnvironmentSpec {
            resource_spec: env.spec.resource_spec.clone(),
            for_provider: params.value,
        },
    );
    out.metadata = env.metadata.clone();
    out.status = status;
    debug!(name = ?env.metadata.name, lossy = report.lossy.len(), "migrated v2 -> v1");
    Ok(Migrated { value: out, report })
}

fn with_resource(err: ContractError, name: Option<String>) -> ContractError {
    match err {
        ContractError::Validation(v) => ContractError::Validation(v.with_resource(name)),
        other => other,
    }
}

impl VersionedEnvironment {
    /// Convert into `target`; converting to the current version is the identity.
    pub fn convert_to(
        &self,
        target: SchemaVersion,
        policy: MissingRequiredPolicy,
    ) -> Result<Migrated<VersionedEnvironment>, ContractError> {
        match (self, target) {
            (VersionedEnvironment::V1(e), SchemaVersion::V2) => {
                let m = environment_v1_to_v2(e, policy)?;
                Ok(Migrated {
                    value: VersionedEnvironment::V2(m.value),
                    report: m.report,
                })
            }
            (VersionedEnvironment::V2(e), SchemaVersion::V1) => {
                let m = environment_v2_to_v1(e)?;
                Ok(Migrated {
                    value: VersionedEnvironment::V1(m.value),
                    report: m.report,
                })
            }
            (VersionedEnvironment::V1(e), SchemaVersion::V1) => {
                let p = &e.spec.for_provider;
                validate_common(&p.environment_type, &p.owner)?;
                Ok(Migrated {
                    value: self.clone(),
                    report: MigrationReport::default(),
                })
            }
            (VersionedEnvironment::V2(e), SchemaVersion::V2) => {
                let p = &e.spec.for_provider;
                validate_common(&p.environment_type, &p.owner)?;
                Ok(Migrated {
                    value: self.clone(),
                    report: MigrationReport::default(),
                })
            }
        }
    }
}
