use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::common::Condition;
use crate::{v1, v2};

/// The `atProvider` aggregate of one schema version.
pub trait Observation:
    Clone + Debug + PartialEq + Default + Serialize + DeserializeOwned + Send + Sync + 'static
{
    type Child: ChildIdentity + Clone;

    fn instances(&self) -> &[Self::Child];
}

impl Observation for v1::EnvironmentObservation {
    type Child = v1::EnvironmentXrc;

    fn instances(&self) -> &[Self::Child] {
        &self.instances
    }
}

impl Observation for v2::EnvironmentObservation {
    type Child = v2::EnvironmentInstance;

    fn instances(&self) -> &[Self::Child] {
        &self.instances
    }
}

/// Identity and health of one observed child instance.
pub trait ChildIdentity {
    type Key: Eq + Hash;

    /// Deduplication key; the schema itself does not enforce uniqueness.
    fn key(&self) -> Self::Key;
    fn display_name(&self) -> String;
    fn healthy(&self) -> bool;
}

/// Drop later duplicates, keeping discovery order of first occurrences.
pub fn dedup_children<T: ChildIdentity + Clone>(items: &[T]) -> Vec<T> {
    let mut seen = HashSet::new();
    items
        .iter()
        .filter(|c| seen.insert(c.key()))
        .cloned()
        .collect()
}

pub fn unhealthy<T: ChildIdentity>(items: &[T]) -> Vec<&T> {
    items.iter().filter(|c| !c.healthy()).collect()
}

/// Finalization is blocked while any child is still listed, healthy or not.
pub fn can_finalize<T>(items: &[T]) -> bool {
    items.is_empty()
}

/// `Ready` condition reflecting child health.
pub fn ready_condition<T: ChildIdentity>(items: &[T]) -> Condition {
    let bad = unhealthy(items);
    if bad.is_empty() {
        return Condition::available();
    }
    let names = bad
        .iter()
        .map(|c| c.display_name())
        .collect::<Vec<_>>()
        .join(", ");
    Condition::unavailable(format!(
        "{} of {} instances unhealthy: {}",
        bad.len(),
        items.len(),
        names
    ))
}
