use kube::CustomResourceExt;
use orch_env_api::common::{ConditionStatus, ConditionType, DeletionPolicy, external_name};
use orch_env_api::observed::Observation;
use orch_env_api::{ContractError, EnvironmentResource, Scheme, SchemaVersion, VersionedEnvironment, v1, v2};

const V1_YAML: &str = include_str!("fixtures/environment-v1.yaml");
const V2_YAML: &str = include_str!("fixtures/environment-v2.yaml");
const V1_NO_OWNER_YAML: &str = include_str!("fixtures/environment-v1-no-owner.yaml");

#[test_log::test]
fn v1_manifest_decodes_under_expected_paths() {
    let scheme = Scheme::environments();
    let env = scheme.decode_yaml(V1_YAML).unwrap();
    let env = env.as_v1().expect("v1 envelope");

    assert_eq!(env.spec.resource_spec.deletion_policy, DeletionPolicy::Orphan);
    assert_eq!(env.spec.for_provider.tenant_name.as_deref(), Some("acme"));
    assert_eq!(external_name(env), Some("env-7f3a"));
    assert!(env.metadata.creation_timestamp.is_some());

    let (status, obs) = env.status_parts();
    let ready = status.condition(&ConditionType::Ready).unwrap();
    assert_eq!(ready.status, ConditionStatus::False);
    assert_eq!(obs.instances().len(), 2);
    assert_eq!(obs.instances[0].uid.as_deref(), Some("0d6d2d1c-4c1b-4f0e-9a57-1f8e7b2c9a10"));
    assert!(obs.instances[1].uid.is_none());
}

#[test_log::test]
fn persisted_form_round_trips_per_version() {
    let scheme = Scheme::environments();
    for text in [V1_YAML, V2_YAML] {
        let decoded = scheme.decode_yaml(text).unwrap();
        let encoded = scheme.encode_yaml(&decoded).unwrap();
        let again = scheme.decode_yaml(&encoded).unwrap();
        assert_eq!(decoded, again);
    }
}

#[test_log::test]
fn framework_condition_types_survive_decode_and_encode() {
    let scheme = Scheme::environments();
    let decoded = scheme.decode_yaml(V1_YAML).unwrap();
    let (status, _) = decoded.as_v1().unwrap().status_parts();
    let other = ConditionType::from("LastAsyncOperation");
    assert_eq!(status.condition(&other).unwrap().reason.as_deref(), Some("Success"));

    let value = scheme.encode(&decoded).unwrap();
    let types: Vec<&str> = value["status"]["conditions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["type"].as_str().unwrap())
        .collect();
    assert_eq!(types, ["Ready", "Synced", "LastAsyncOperation"]);
}

#[test]
fn encoded_envelope_nests_under_for_provider_and_at_provider() {
    let scheme = Scheme::environments();
    let env = scheme.decode_yaml(V2_YAML).unwrap();
    let value = scheme.encode(&env).unwrap();
    assert_eq!(value["apiVersion"], "application.orchestrator.io/v1alpha1");
    assert_eq!(value["kind"], "Environment");
    assert_eq!(value["spec"]["forProvider"]["owner"], "bob");
    assert_eq!(value["spec"]["forProvider"]["expirationTime"], "2025-03-01T08:30:00.250Z");
    assert_eq!(
        value["status"]["atProvider"]["instances"][0]["instanceGroup"],
        "redis.example.org"
    );
}

#[test]
fn missing_owner_decodes_but_fails_validation() {
    let env = Scheme::environments().decode_yaml(V1_NO_OWNER_YAML).unwrap();
    let err = env.validate().unwrap_err();
    assert_eq!(err.resource.as_deref(), Some("orphaned"));
    assert!(err.has_path("spec.forProvider.owner"));

    let err = env
        .convert_to(SchemaVersion::V2, Default::default())
        .unwrap_err();
    assert!(matches!(err, ContractError::Validation(_)));
}

#[test]
fn status_without_instances_matches_empty_list() {
    let scheme = Scheme::environments();
    let absent = scheme
        .decode_yaml(
            "apiVersion: application.orchestrator.io/v1alpha1\nkind: Environment\nmetadata: {name: a}\nspec: {forProvider: {applicationName: x, environmentType: dev, owner: o}}\nstatus: {atProvider: {}}\n",
        )
        .unwrap();
    let empty = scheme
        .decode_yaml(
            "apiVersion: application.orchestrator.io/v1alpha1\nkind: Environment\nmetadata: {name: a}\nspec: {forProvider: {applicationName: x, environmentType: dev, owner: o}}\nstatus: {atProvider: {instances: []}}\n",
        )
        .unwrap();
    assert_eq!(absent, empty);
    let VersionedEnvironment::V2(env) = absent else {
        panic!("expected v2");
    };
    assert!(env.observation().instances().is_empty());
}

fn printer_columns(crd: &k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition) -> Vec<String> {
    crd.spec.versions[0]
        .additional_printer_columns
        .as_ref()
        .map(|cols| cols.iter().map(|c| c.name.clone()).collect())
        .unwrap_or_default()
}

#[test]
fn crds_carry_printer_columns_and_categories() {
    let v1_crd = v1::Environment::crd();
    let v2_crd = v2::Environment::crd();
    for crd in [&v1_crd, &v2_crd] {
        assert_eq!(crd.spec.scope, "Cluster");
        assert_eq!(printer_columns(crd), vec!["READY", "SYNCED", "EXTERNAL-NAME", "AGE"]);
        assert!(crd.spec.versions[0].subresources.as_ref().and_then(|s| s.status.as_ref()).is_some());
    }
    assert_eq!(
        v1_crd.spec.names.categories.clone().unwrap_or_default(),
        vec!["crossplane", "managed", "orchestrator"]
    );
    assert_eq!(
        v2_crd.spec.names.categories.clone().unwrap_or_default(),
        vec!["crossplane", "managed", "template"]
    );
    assert_eq!(v1_crd.metadata.name.as_deref(), Some("environments.environment.orchestrator.io"));
}
