use std::collections::{BTreeMap, BTreeSet};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// How a resolved location answer was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum LocationSource {
    Typed,
    Suggestion,
    CurrentLocation,
    MapDrawn,
}

impl LocationSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationSource::Typed => "typed",
            LocationSource::Suggestion => "suggestion",
            LocationSource::CurrentLocation => "currentLocation",
            LocationSource::MapDrawn => "mapDrawn",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "typed" => Some(LocationSource::Typed),
            "suggestion" => Some(LocationSource::Suggestion),
            "currentLocation" | "current" => Some(LocationSource::CurrentLocation),
            "mapDrawn" | "map" => Some(LocationSource::MapDrawn),
            _ => None,
        }
    }
}

/// A location answer resolved to coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LocationSelection {
    pub lat: f64,
    pub lng: f64,
    pub address: String,
    pub source: LocationSource,
}

/// Numeric range answer. Either bound may be missing while the user is editing.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct RangeValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl RangeValue {
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.min.is_some() && self.max.is_some()
    }

    /// True when both bounds are present and `min <= max`.
    pub fn is_ordered(&self) -> bool {
        match (self.min, self.max) {
            (Some(min), Some(max)) => min <= max,
            _ => false,
        }
    }
}

/// A single answer, tagged by the shape its field kind produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AnswerValue {
    Text(String),
    Location(LocationSelection),
    Choices(Vec<String>),
    Choice(String),
    Range(RangeValue),
}

impl AnswerValue {
    /// Builds a multiselect answer, dropping repeated values but keeping first-seen order.
    pub fn choices<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AnswerValue::Choices(dedup(values.into_iter().map(Into::into).collect()))
    }

    /// Free text, or the address of a resolved location.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AnswerValue::Text(text) => Some(text),
            AnswerValue::Location(location) => Some(&location.address),
            _ => None,
        }
    }

    pub fn as_location(&self) -> Option<&LocationSelection> {
        match self {
            AnswerValue::Location(location) => Some(location),
            _ => None,
        }
    }

    pub fn as_choices(&self) -> Option<&[String]> {
        match self {
            AnswerValue::Choices(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_choice(&self) -> Option<&str> {
        match self {
            AnswerValue::Choice(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_range(&self) -> Option<&RangeValue> {
        match self {
            AnswerValue::Range(range) => Some(range),
            _ => None,
        }
    }

    /// Option values this answer selects; empty for non-choice answers.
    pub fn selected(&self) -> Vec<&str> {
        match self {
            AnswerValue::Choices(values) => values.iter().map(String::as_str).collect(),
            AnswerValue::Choice(value) => vec![value.as_str()],
            _ => Vec::new(),
        }
    }

    /// Plain JSON shape handed to hosts on submit.
    pub fn to_plain_json(&self) -> Value {
        match self {
            AnswerValue::Text(text) => Value::String(text.clone()),
            AnswerValue::Location(location) => json!({
                "lat": location.lat,
                "lng": location.lng,
                "address": location.address,
                "type": location.source.as_str(),
            }),
            AnswerValue::Choices(values) => json!(values),
            AnswerValue::Choice(value) => Value::String(value.clone()),
            AnswerValue::Range(range) => {
                let mut map = Map::new();
                if let Some(min) = range.min {
                    map.insert("min".into(), json!(min));
                }
                if let Some(max) = range.max {
                    map.insert("max".into(), json!(max));
                }
                Value::Object(map)
            }
        }
    }

    pub(crate) fn loose_text(value: &Value) -> Option<AnswerValue> {
        if let Some(text) = value.as_str() {
            return Some(AnswerValue::Text(text.to_string()));
        }
        let object = value.as_object()?;
        let lat = object.get("lat").and_then(Value::as_f64)?;
        let lng = object.get("lng").and_then(Value::as_f64)?;
        let address = object.get("address").and_then(Value::as_str)?.to_string();
        let source = object
            .get("type")
            .or_else(|| object.get("source"))
            .and_then(Value::as_str)
            .and_then(LocationSource::parse)
            .unwrap_or(LocationSource::Typed);
        Some(AnswerValue::Location(LocationSelection {
            lat,
            lng,
            address,
            source,
        }))
    }

    pub(crate) fn loose_choices(value: &Value) -> Option<AnswerValue> {
        let items = value.as_array()?;
        let values = items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()?;
        Some(AnswerValue::choices(values))
    }

    pub(crate) fn loose_choice(value: &Value) -> Option<AnswerValue> {
        value.as_str().map(|text| AnswerValue::Choice(text.to_string()))
    }

    pub(crate) fn loose_range(value: &Value) -> Option<AnswerValue> {
        let object = value.as_object()?;
        let bound = |key: &str| match object.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(raw) => raw.as_f64().map(Some).ok_or(()),
        };
        let min = bound("min").ok()?;
        let max = bound("max").ok()?;
        Some(AnswerValue::Range(RangeValue { min, max }))
    }

    fn normalized(self) -> Self {
        match self {
            AnswerValue::Choices(values) => AnswerValue::Choices(dedup(values)),
            other => other,
        }
    }
}

fn dedup(values: Vec<String>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    values
        .into_iter()
        .filter(|value| seen.insert(value.clone()))
        .collect()
}

/// Answers keyed by field name. Updates are functional: every write yields a new bag.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct AnswerBag {
    values: BTreeMap<String, AnswerValue>,
}

impl AnswerBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&AnswerValue> {
        self.values.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }

    /// Returns a copy of the bag with `field` set to `value`.
    pub fn with(&self, field: impl Into<String>, value: AnswerValue) -> AnswerBag {
        let mut values = self.values.clone();
        values.insert(field.into(), value.normalized());
        AnswerBag { values }
    }

    /// Returns a copy of the bag without `field`.
    pub fn without(&self, field: &str) -> AnswerBag {
        let mut values = self.values.clone();
        values.remove(field);
        AnswerBag { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AnswerValue)> {
        self.values.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Plain JSON object of every answer, as delivered on submit.
    pub fn to_plain_json(&self) -> Value {
        Value::Object(
            self.values
                .iter()
                .map(|(key, value)| (key.clone(), value.to_plain_json()))
                .collect(),
        )
    }
}

impl FromIterator<(String, AnswerValue)> for AnswerBag {
    fn from_iter<T: IntoIterator<Item = (String, AnswerValue)>>(iter: T) -> Self {
        iter.into_iter()
            .fold(AnswerBag::new(), |bag, (field, value)| bag.with(field, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_leaves_the_original_untouched() {
        let empty = AnswerBag::new();
        let filled = empty.with("propertyType", AnswerValue::choices(["plot"]));
        assert!(empty.is_empty());
        assert_eq!(filled.len(), 1);
    }

    #[test]
    fn repeated_choices_are_collapsed() {
        let bag = AnswerBag::new().with(
            "developer",
            AnswerValue::Choices(vec!["sobha".into(), "godrej".into(), "sobha".into()]),
        );
        assert_eq!(
            bag.get("developer").and_then(AnswerValue::as_choices),
            Some(&["sobha".to_string(), "godrej".to_string()][..])
        );
    }

    #[test]
    fn loose_range_rejects_non_numeric_bounds() {
        assert!(AnswerValue::loose_range(&json!({ "min": "cheap" })).is_none());
        assert_eq!(
            AnswerValue::loose_range(&json!({ "min": 2500000 })),
            Some(AnswerValue::Range(RangeValue {
                min: Some(2500000.0),
                max: None
            }))
        );
    }

    #[test]
    fn plain_json_keeps_location_type_label() {
        let value = AnswerValue::Location(LocationSelection {
            lat: 12.9,
            lng: 77.6,
            address: "Koramangala, Bengaluru".into(),
            source: LocationSource::CurrentLocation,
        });
        assert_eq!(value.to_plain_json()["type"], "currentLocation");
    }
}
