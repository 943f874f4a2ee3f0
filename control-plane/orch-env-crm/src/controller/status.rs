use orch_env_api::common::{Condition, ConditionStatus, ResourceStatus};
use orch_env_api::observed::{Observation, ready_condition};

/// Canonical conditions after a successful observation pass.
pub fn observed_conditions<O: Observation>(observation: &O) -> Vec<Condition> {
    vec![ready_condition(observation.instances()), Condition::reconcile_success()]
}

/// Conditions after a failed pass; `Ready` is left to the last observation.
pub fn error_conditions(err: &dyn std::fmt::Display) -> Vec<Condition> {
    vec![Condition::reconcile_error(err)]
}

pub fn is_ready(status: &ResourceStatus) -> bool {
    status
        .condition(&orch_env_api::common::ConditionType::Ready)
        .is_some_and(|c| c.status == ConditionStatus::True)
}
