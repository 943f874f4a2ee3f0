// End-to-end flow against the in-memory store: admission, conversion and
// concurrent status writers. No cluster required.

use std::collections::HashMap;
use std::time::Duration;

use envconfig::Envconfig;

use futures_util::future::join_all;
use orch_env_api::common::{ConditionStatus, ConditionType};
use orch_env_api::{EnvironmentResource, MissingRequiredPolicy, SchemaVersion, v2};
use orch_env_crm::config::{CrmConfig, RetryPolicy};
use orch_env_crm::controller::{StatusWriter, WriteOutcome, is_ready};
use orch_env_crm::runtime::EnvironmentRuntime;
use orch_env_crm::store::{EnvironmentStore, MemoryStore};

mod common;
use common::{instance, set_env, v2_env};

const V1_MANIFEST: &str = r#"
apiVersion: environment.orchestrator.io/v1alpha1
kind: Environment
metadata:
  name: acme-dev
spec:
  forProvider:
    tenantName: acme
    environmentType: dev
    owner: alice
"#;

#[test_log::test(tokio::test)]
async fn runtime_reads_policy_from_env() {
    let _g1 = set_env("ORCH_ENV_PROFILE", "edge");
    let _g2 = set_env("ORCH_ENV_MIGRATION_MISSING_REQUIRED", "fail");
    let rt = EnvironmentRuntime::from_env().expect("config");
    assert_eq!(rt.cfg.migration.policy(), MissingRequiredPolicy::Fail);
    assert_eq!(rt.cfg.retry_policy().max_attempts, 5);

    let value: serde_json::Value = serde_yaml::from_str(V1_MANIFEST).unwrap();
    let err = rt.convert(value, SchemaVersion::V2).unwrap_err();
    assert!(matches!(
        err,
        orch_env_api::ContractError::IncompatibleSchema { .. }
    ));
}

#[test_log::test(tokio::test)]
async fn admitted_v1_converts_and_is_observed_as_v2() {
    let value: serde_json::Value = serde_yaml::from_str(V1_MANIFEST).unwrap();
    let cfg = CrmConfig::init_from_hashmap(&HashMap::new())
        .unwrap()
        .apply_profile_defaults();
    let rt = EnvironmentRuntime::new(cfg);
    let admitted = rt.admit(value.clone()).unwrap();
    assert_eq!(admitted.schema_version(), SchemaVersion::V1);

    let migrated = rt.convert(value, SchemaVersion::V2).unwrap();
    assert!(!migrated.report.is_lossless());
    let env: v2::Environment = migrated.value.as_v2().cloned().unwrap();

    let store = MemoryStore::new();
    store.insert(env).await;
    let writer = rt.status_writer(store);
    let outcome = writer
        .observe(
            "acme-dev",
            v2::EnvironmentObservation {
                instances: vec![instance("api", true), instance("worker", false)],
            },
        )
        .await
        .unwrap();
    assert!(matches!(outcome, WriteOutcome::Written { .. }));

    let stored = writer.store().get("acme-dev").await.unwrap();
    let (status, _) = stored.status_parts();
    assert!(!is_ready(&status));
    let ready = status.condition(&ConditionType::Ready).unwrap();
    assert_eq!(
        ready.message.as_deref(),
        Some("1 of 2 instances unhealthy: XService.apps.example.org/worker")
    );
}

#[test_log::test(tokio::test(flavor = "multi_thread", worker_threads = 4))]
async fn concurrent_passes_serialize_through_versions() {
    let store = MemoryStore::new();
    store.insert(v2_env("shop-staging")).await;
    store.inject_conflicts(3);

    let passes = (0..4).map(|i| {
        let writer = StatusWriter::new(
            store.clone(),
            RetryPolicy {
                max_attempts: 10,
                backoff: Duration::from_millis(2),
            },
        );
        tokio::spawn(async move {
            writer
                .observe(
                    "shop-staging",
                    v2::EnvironmentObservation {
                        instances: vec![instance(&format!("svc-{i}"), true)],
                    },
                )
                .await
        })
    });
    for res in join_all(passes).await {
        res.expect("join").expect("status write");
    }

    let stored = store.get("shop-staging").await.unwrap();
    let obs = stored.observation();
    assert_eq!(obs.instances.len(), 1);
    assert!(obs.instances[0].instance_name.starts_with("svc-"));
    assert_eq!(
        stored
            .status_parts()
            .0
            .condition(&ConditionType::Synced)
            .unwrap()
            .status,
        ConditionStatus::True
    );
}
