//! Structured observation records
//!
//! An [`Observation`] is the one record an action emits per successful
//! execution: an immutable, ordered map from field name to scalar value.

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Scalar value of an observation field
#[derive(Debug, Clone, PartialEq)]
pub enum ObservationValue {
    Str(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
}

impl Serialize for ObservationValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ObservationValue::Str(v) => serializer.serialize_str(v),
            ObservationValue::Int(v) => serializer.serialize_i64(*v),
            ObservationValue::UInt(v) => serializer.serialize_u64(*v),
            ObservationValue::Float(v) => serializer.serialize_f64(*v),
            ObservationValue::Bool(v) => serializer.serialize_bool(*v),
        }
    }
}

impl fmt::Display for ObservationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObservationValue::Str(v) => f.write_str(v),
            ObservationValue::Int(v) => write!(f, "{v}"),
            ObservationValue::UInt(v) => write!(f, "{v}"),
            ObservationValue::Float(v) => write!(f, "{v}"),
            ObservationValue::Bool(v) => write!(f, "{v}"),
        }
    }
}

impl From<String> for ObservationValue {
    fn from(v: String) -> Self {
        ObservationValue::Str(v)
    }
}

impl From<&str> for ObservationValue {
    fn from(v: &str) -> Self {
        ObservationValue::Str(v.to_string())
    }
}

impl From<i64> for ObservationValue {
    fn from(v: i64) -> Self {
        ObservationValue::Int(v)
    }
}

impl From<u64> for ObservationValue {
    fn from(v: u64) -> Self {
        ObservationValue::UInt(v)
    }
}

impl From<usize> for ObservationValue {
    fn from(v: usize) -> Self {
        ObservationValue::UInt(v as u64)
    }
}

impl From<f64> for ObservationValue {
    fn from(v: f64) -> Self {
        ObservationValue::Float(v)
    }
}

impl From<bool> for ObservationValue {
    fn from(v: bool) -> Self {
        ObservationValue::Bool(v)
    }
}

/// Durations are recorded in whole milliseconds
impl From<Duration> for ObservationValue {
    fn from(v: Duration) -> Self {
        ObservationValue::UInt(u64::try_from(v.as_millis()).unwrap_or(u64::MAX))
    }
}

/// Immutable key/value measurement record
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Observation {
    fields: BTreeMap<String, ObservationValue>,
}

impl Observation {
    pub fn builder() -> ObservationBuilder {
        ObservationBuilder::default()
    }

    pub fn get(&self, field: &str) -> Option<&ObservationValue> {
        self.fields.get(field)
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        match self.fields.get(field) {
            Some(ObservationValue::Str(v)) => Some(v),
            _ => None,
        }
    }

    pub fn get_u64(&self, field: &str) -> Option<u64> {
        match self.fields.get(field) {
            Some(ObservationValue::UInt(v)) => Some(*v),
            Some(ObservationValue::Int(v)) => u64::try_from(*v).ok(),
            _ => None,
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &ObservationValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Builder for [`Observation`]; later values for the same field win
#[derive(Debug, Default)]
pub struct ObservationBuilder {
    fields: BTreeMap<String, ObservationValue>,
}

impl ObservationBuilder {
    pub fn add(mut self, field: impl Into<String>, value: impl Into<ObservationValue>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    pub fn build(self) -> Observation {
        Observation {
            fields: self.fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_collects_typed_fields() {
        let observation = Observation::builder()
            .add("issueKey", "ABC-1")
            .add("issueId", 10042u64)
            .add("navigationDuration", Duration::from_millis(1500))
            .add("editable", true)
            .build();

        assert_eq!(observation.get_str("issueKey"), Some("ABC-1"));
        assert_eq!(observation.get_u64("issueId"), Some(10042));
        assert_eq!(observation.get_u64("navigationDuration"), Some(1500));
        assert_eq!(
            observation.get("editable"),
            Some(&ObservationValue::Bool(true))
        );
        assert_eq!(observation.len(), 4);
    }

    #[test]
    fn serializes_as_flat_json_object() {
        let observation = Observation::builder()
            .add("jql", "project = ABC")
            .add("issues", 3usize)
            .build();
        let json = serde_json::to_value(&observation).unwrap();
        let expected = serde_json::json!({"issues": 3, "jql": "project = ABC"});
        assert_eq!(json, expected);
    }

    #[test]
    fn negative_integers_are_not_unsigned() {
        let observation = Observation::builder().add("delta", -5i64).build();
        assert_eq!(observation.get_u64("delta"), None);
        assert_eq!(observation.get("delta").unwrap().to_string(), "-5");
    }
}
