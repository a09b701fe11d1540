//! Response payloads of the Mixpanel data export API

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// JavaScript-style truthiness of a JSON value
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Render a JSON scalar as display text. `None` for null and empty strings.
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn error_message(error: Option<&Value>) -> Option<String> {
    let error = error.filter(|e| is_truthy(e))?;
    Some(match error {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

/// One user profile returned by `engage`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonRecord {
    #[serde(rename = "$distinct_id", default)]
    pub distinct_id: Value,

    #[serde(rename = "$properties", default)]
    pub properties: Map<String, Value>,
}

impl PersonRecord {
    /// Build a record from a properties object, mostly for tests and fixtures
    pub fn with_properties(properties: Value) -> Self {
        Self {
            distinct_id: Value::Null,
            properties: match properties {
                Value::Object(map) => map,
                _ => Map::new(),
            },
        }
    }

    /// Property value as display text, `None` when absent or empty
    pub fn property(&self, key: &str) -> Option<String> {
        self.properties.get(key).and_then(value_text)
    }
}

/// Response of `GET engage/`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngageResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,

    #[serde(default)]
    pub results: Vec<PersonRecord>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl EngageResponse {
    /// The error message when the payload carries a truthy `error` field
    pub fn error_message(&self) -> Option<String> {
        error_message(self.error.as_ref())
    }
}

/// Date-keyed counts for one series; `None` where the API sent null
pub type DateSeries = BTreeMap<String, Option<f64>>;

/// The `data` block of a segmentation response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesData {
    #[serde(default)]
    pub series: Vec<String>,

    /// Series key (event name or property value) to per-date counts, in
    /// the order the API sent them
    #[serde(default, with = "keyed_series")]
    pub values: Vec<(String, DateSeries)>,
}

impl SeriesData {
    /// Counts for one series key
    pub fn get(&self, key: &str) -> Option<&DateSeries> {
        self.values
            .iter()
            .find_map(|(name, series)| (name == key).then_some(series))
    }
}

/// `values` travels as a JSON object; its key order is kept.
mod keyed_series {
    use super::DateSeries;
    use serde::de::Error as _;
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::{Map, Value};

    pub fn serialize<S: Serializer>(
        values: &[(String, DateSeries)],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(values.len()))?;
        for (key, series) in values {
            map.serialize_entry(key, series)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<(String, DateSeries)>, D::Error> {
        Map::<String, Value>::deserialize(deserializer)?
            .into_iter()
            .map(|(key, value)| {
                DateSeries::deserialize(value)
                    .map(|series| (key, series))
                    .map_err(D::Error::custom)
            })
            .collect()
    }
}

/// Response of `GET events/` and `GET events/properties/`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SegmentationResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,

    #[serde(default)]
    pub data: SeriesData,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legend_size: Option<u64>,
}

impl SegmentationResponse {
    /// The error message when the payload carries a truthy `error` field
    pub fn error_message(&self) -> Option<String> {
        error_message(self.error.as_ref())
    }
}
