use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use schemars::JsonSchema;
use schemars::r#gen::SchemaGenerator;
use schemars::schema::{InstanceType, Schema, SchemaObject};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Metadata-style timestamp.
///
/// Whole-second values serialize exactly like Kubernetes `metav1.Time`
/// (`2024-05-01T10:00:00Z`). Sub-second precision is never truncated; when
/// present it is written as a fractional part so the value survives a
/// round trip through the persisted form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MetaTime(pub DateTime<Utc>);

impl MetaTime {
    pub fn now() -> Self {
        MetaTime(Utc::now())
    }

    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }
}

impl From<DateTime<Utc>> for MetaTime {
    fn from(value: DateTime<Utc>) -> Self {
        MetaTime(value)
    }
}

impl From<MetaTime> for DateTime<Utc> {
    fn from(value: MetaTime) -> Self {
        value.0
    }
}

impl fmt::Display for MetaTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }
}

impl Serialize for MetaTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MetaTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|t| MetaTime(t.with_timezone(&Utc)))
            .map_err(serde::de::Error::custom)
    }
}

impl JsonSchema for MetaTime {
    fn schema_name() -> String {
        "MetaTime".to_string()
    }

    fn is_referenceable() -> bool {
        false
    }

    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        SchemaObject {
            instance_type: Some(InstanceType::String.into()),
            format: Some("date-time".to_string()),
            ..Default::default()
        }
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn whole_seconds_match_metav1_layout() {
        let t = MetaTime(Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap());
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, "\"2024-05-01T10:00:00Z\"");
    }

    #[test]
    fn keeps_nanoseconds() {
        let base = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        let t = MetaTime(base + chrono::Duration::nanoseconds(123_456_789));
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, "\"2024-05-01T10:00:00.123456789Z\"");
        let back: MetaTime = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn accepts_offsets() {
        let t: MetaTime =
            serde_json::from_str("\"2024-05-01T12:00:00+02:00\"").unwrap();
        assert_eq!(t.0, Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap());
    }
}
