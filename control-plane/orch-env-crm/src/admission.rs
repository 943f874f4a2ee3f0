use orch_env_api::{
    ContractError, Migrated, MissingRequiredPolicy, Scheme, SchemaVersion,
    VersionedEnvironment,
};
use serde_json::Value;
use tracing::{debug, warn};

/// Decode and validate a submitted object. Invalid objects are rejected as
/// they are; nothing is filled in on the caller's behalf.
pub fn admit(
    scheme: &Scheme,
    value: Value,
) -> Result<VersionedEnvironment, ContractError> {
    let env = scheme.decode(value).inspect_err(|e| {
        warn!(error = %e, "admission: cannot decode object");
    })?;
    if let Err(e) = env.validate() {
        warn!(name = %env.name_any(), error = %e, "admission: rejected");
        return Err(e.into());
    }
    debug!(name = %env.name_any(), version = %env.schema_version(), "admission: accepted");
    Ok(env)
}

/// Admit `value`, then convert it to `target`, logging every lossy field.
pub fn convert(
    scheme: &Scheme,
    value: Value,
    target: SchemaVersion,
    policy: MissingRequiredPolicy,
) -> Result<Migrated<VersionedEnvironment>, ContractError> {
    let env = admit(scheme, value)?;
    let name = env.name_any();
    let migrated = env.convert_to(target, policy).inspect_err(|e| {
        warn!(%name, %target, %policy, error = %e, "conversion: failed");
    })?;
    for field in &migrated.report.lossy {
        warn!(%name, path = %field.path(), "conversion: lossy field: {field}");
    }
    Ok(migrated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use orch_env_api::LossyField;
    use serde_json::json;

    fn v1_value(owner: Option<&str>) -> Value {
        let mut params = json!({"environmentType": "dev", "tenantName": "acme"});
        if let Some(o) = owner {
            params["owner"] = json!(o);
        }
        json!({
            "apiVersion": "environment.orchestrator.io/v1alpha1",
            "kind": "Environment",
            "metadata": {"name": "acme-dev"},
            "spec": {"forProvider": params}
        })
    }

    #[test_log::test]
    fn missing_owner_rejected_at_admission() {
        let err = admit(&Scheme::environments(), v1_value(None)).unwrap_err();
        match err {
            ContractError::Validation(v) => {
                assert!(v.has_path("spec.forProvider.owner"))
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test_log::test]
    fn v2_without_application_rejected() {
        let value = json!({
            "apiVersion": "application.orchestrator.io/v1alpha1",
            "kind": "Environment",
            "metadata": {"name": "shop-dev"},
            "spec": {"forProvider": {"environmentType": "dev", "owner": "bob"}}
        });
        assert!(matches!(
            admit(&Scheme::environments(), value),
            Err(ContractError::Validation(_))
        ));
    }

    #[test_log::test]
    fn conversion_flags_tenant_and_default() {
        let m = convert(
            &Scheme::environments(),
            v1_value(Some("alice")),
            SchemaVersion::V2,
            MissingRequiredPolicy::DefaultEmpty,
        )
        .unwrap();
        let env = m.value.as_v2().unwrap();
        assert_eq!(env.spec.for_provider.owner, "alice");
        assert_eq!(env.spec.for_provider.application_name, "");
        assert_eq!(m.report.lossy.len(), 2);
        assert!(m.report.lossy.contains(&LossyField::ApplicationNameDefaulted));
    }

    #[test_log::test]
    fn conversion_fail_policy() {
        let err = convert(
            &Scheme::environments(),
            v1_value(Some("alice")),
            SchemaVersion::V2,
            MissingRequiredPolicy::Fail,
        )
        .unwrap_err();
        assert!(matches!(err, ContractError::IncompatibleSchema { .. }));
    }
}
