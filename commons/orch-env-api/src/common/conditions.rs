use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::time::MetaTime;

pub const REASON_AVAILABLE: &str = "Available";
pub const REASON_UNAVAILABLE: &str = "Unavailable";
pub const REASON_CREATING: &str = "Creating";
pub const REASON_DELETING: &str = "Deleting";
pub const REASON_RECONCILE_SUCCESS: &str = "ReconcileSuccess";
pub const REASON_RECONCILE_ERROR: &str = "ReconcileError";
pub const REASON_RECONCILE_PAUSED: &str = "ReconcilePaused";

#[derive(Deserialize, Serialize, Clone, Debug, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(rename = "type")]
    #[schemars(with = "String")]
    pub type_: ConditionType,
    pub status: ConditionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<MetaTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Condition types this crate manages, plus any other type written by the
/// framework or another controller. Other types keep their wire name.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum ConditionType {
    Ready,
    Synced,
    Other(String),
}

impl ConditionType {
    pub fn as_str(&self) -> &str {
        match self {
            ConditionType::Ready => "Ready",
            ConditionType::Synced => "Synced",
            ConditionType::Other(s) => s,
        }
    }
}

impl From<String> for ConditionType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Ready" => ConditionType::Ready,
            "Synced" => ConditionType::Synced,
            _ => ConditionType::Other(s),
        }
    }
}

impl From<&str> for ConditionType {
    fn from(s: &str) -> Self {
        ConditionType::from(s.to_string())
    }
}

impl From<ConditionType> for String {
    fn from(t: ConditionType) -> Self {
        match t {
            ConditionType::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for ConditionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Deserialize, Serialize, Clone, Copy, Debug, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub enum ConditionStatus {
    True,
    False,
    Unknown,
}

impl Condition {
    fn new(
        type_: ConditionType,
        status: ConditionStatus,
        reason: &str,
        message: Option<String>,
    ) -> Self {
        Condition {
            type_,
            status,
            last_transition_time: Some(MetaTime::now()),
            reason: Some(reason.to_string()),
            message,
        }
    }

    /// The resource is ready for use.
    pub fn available() -> Self {
        Self::new(ConditionType::Ready, ConditionStatus::True, REASON_AVAILABLE, None)
    }

    /// The resource exists but is not usable; `message` says why.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(
            ConditionType::Ready,
            ConditionStatus::False,
            REASON_UNAVAILABLE,
            Some(message.into()),
        )
    }

    pub fn creating() -> Self {
        Self::new(ConditionType::Ready, ConditionStatus::False, REASON_CREATING, None)
    }

    pub fn deleting() -> Self {
        Self::new(ConditionType::Ready, ConditionStatus::False, REASON_DELETING, None)
    }

    pub fn reconcile_success() -> Self {
        Self::new(
            ConditionType::Synced,
            ConditionStatus::True,
            REASON_RECONCILE_SUCCESS,
            None,
        )
    }

    pub fn reconcile_error(err: impl std::fmt::Display) -> Self {
        Self::new(
            ConditionType::Synced,
            ConditionStatus::False,
            REASON_RECONCILE_ERROR,
            Some(err.to_string()),
        )
    }

    pub fn reconcile_paused() -> Self {
        Self::new(
            ConditionType::Synced,
            ConditionStatus::False,
            REASON_RECONCILE_PAUSED,
            None,
        )
    }

    /// Same type, status, reason and message. Transition time is ignored.
    pub fn equal(&self, other: &Condition) -> bool {
        self.type_ == other.type_
            && self.status == other.status
            && self.reason == other.reason
            && self.message == other.message
    }
}

/// Upsert `incoming` into `existing` by condition type.
///
/// Types not present in `incoming` are kept, including types this crate does
/// not manage. Those sort after `Ready` and `Synced` in their stored order. When an incoming condition is
/// `equal` to the stored one the stored transition time wins, so re-applying
/// the same set is a no-op.
pub fn set_conditions(existing: &[Condition], incoming: Vec<Condition>) -> Vec<Condition> {
    let mut out: Vec<Condition> = existing.to_vec();
    for inc in incoming {
        match out.iter().position(|c| c.type_ == inc.type_) {
            Some(idx) if out[idx].equal(&inc) => {}
            Some(idx) => out[idx] = inc,
            None => out.push(inc),
        }
    }
    out.sort_by_key(|c| cond_rank(&c.type_));
    out
}

pub fn find_condition<'a>(
    conditions: &'a [Condition],
    type_: &ConditionType,
) -> Option<&'a Condition> {
    conditions.iter().find(|c| &c.type_ == type_)
}

fn cond_rank(t: &ConditionType) -> u8 {
    match t {
        ConditionType::Ready => 0,
        ConditionType::Synced => 1,
        ConditionType::Other(_) => 250,
    }
}
