use std::time::Duration;

use envconfig::Envconfig;
use orch_env_api::MissingRequiredPolicy;

#[derive(Envconfig, Clone, Debug)]
pub struct CrmConfig {
    #[envconfig(from = "ORCH_ENV_PROFILE", default = "dev")]
    pub profile: String,

    /// Environments are cluster-scoped; only used as diagnostic context.
    #[envconfig(from = "ORCH_ENV_K8S_NAMESPACE", default = "default")]
    pub k8s_namespace: String,

    #[envconfig(nested)]
    pub status: StatusWriteConfig,

    #[envconfig(nested)]
    pub migration: MigrationConfig,
}

#[derive(Envconfig, Clone, Debug, Default)]
pub struct StatusWriteConfig {
    /// If Some, env explicitly set; otherwise, profile defaults apply
    #[envconfig(from = "ORCH_ENV_STATUS_MAX_ATTEMPTS")]
    pub max_attempts: Option<u32>,
    #[envconfig(from = "ORCH_ENV_STATUS_BACKOFF_MS")]
    pub backoff_ms: Option<u64>,
}

#[derive(Envconfig, Clone, Debug)]
pub struct MigrationConfig {
    /// default-empty | fail
    #[envconfig(
        from = "ORCH_ENV_MIGRATION_MISSING_REQUIRED",
        default = "default-empty"
    )]
    pub missing_required: MissingRequiredPolicy,
}

impl MigrationConfig {
    pub fn policy(&self) -> MissingRequiredPolicy {
        self.missing_required
    }
}

/// Bounded retry for version-checked status writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    /// Linear backoff before attempt `attempt + 1`.
    pub fn delay(&self, attempt: u32) -> Duration {
        self.backoff * attempt
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: 3,
            backoff: Duration::from_millis(50),
        }
    }
}

impl CrmConfig {
    /// Apply profile → defaults mapping, while respecting explicit env overrides.
    ///
    /// Rules:
    /// - dev: 3 attempts, 50ms backoff
    /// - edge: 5 attempts, 100ms backoff
    /// - full: 8 attempts, 200ms backoff
    pub fn apply_profile_defaults(mut self) -> Self {
        let (def_attempts, def_backoff_ms) = match self.profile.as_str() {
            "edge" => (5, 100),
            "full" | "prod" | "production" => (8, 200),
            _ /* dev */ => (3, 50),
        };

        if self.status.max_attempts.is_none() {
            self.status.max_attempts = Some(def_attempts);
        }
        if self.status.backoff_ms.is_none() {
            self.status.backoff_ms = Some(def_backoff_ms);
        }

        self
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        let fallback = RetryPolicy::default();
        RetryPolicy {
            max_attempts: self.status.max_attempts.unwrap_or(fallback.max_attempts).max(1),
            backoff: self
                .status
                .backoff_ms
                .map(Duration::from_millis)
                .unwrap_or(fallback.backoff),
        }
    }
}
