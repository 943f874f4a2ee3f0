#![allow(dead_code)]

use orch_env_api::common::ResourceSpec;
use orch_env_api::v2;

// Env guard utilities
pub struct EnvGuard {
    key: &'static str,
    old: Option<String>,
}
impl Drop for EnvGuard {
    fn drop(&mut self) {
        unsafe {
            if let Some(ref v) = self.old {
                std::env::set_var(self.key, v);
            } else {
                std::env::remove_var(self.key);
            }
        }
    }
}
pub fn set_env(key: &'static str, val: &str) -> EnvGuard {
    let old = std::env::var(key).ok();
    unsafe {
        std::env::set_var(key, val);
    }
    EnvGuard { key, old }
}

pub fn v2_env(name: &str) -> v2::Environment {
    v2::Environment::new(
        name,
        v2::EnvironmentSpec {
            resource_spec: ResourceSpec::default(),
            for_provider: v2::EnvironmentParameters {
                application_name: "shop".into(),
                environment_type: "staging".into(),
                expiration_time: None,
                owner: "bob".into(),
            },
        },
    )
}

pub fn instance(name: &str, healthy: bool) -> v2::EnvironmentInstance {
    v2::EnvironmentInstance {
        instance_name: name.into(),
        instance_group: "apps.example.org".into(),
        instance_kind: "XService".into(),
        status: healthy,
    }
}
