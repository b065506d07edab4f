use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::answers::{AnswerBag, AnswerValue, RangeValue};
use crate::condition::Condition;

/// One selectable option of a choice field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ChoiceOption {
    pub value: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden_if: Option<Condition>,
}

impl ChoiceOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            icon: None,
            hidden_if: None,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn hidden_if(mut self, condition: Condition) -> Self {
        self.hidden_if = Some(condition);
        self
    }

    pub fn is_offered(&self, answers: &AnswerBag) -> bool {
        !self
            .hidden_if
            .as_ref()
            .is_some_and(|condition| condition.evaluate(answers))
    }
}

/// Display formatting for range bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ValueFormat {
    #[default]
    Plain,
    /// Rupees shown in crore above 1,00,00,000 and in lakh below.
    IndianCurrency,
}

const CRORE: f64 = 10_000_000.0;
const LAKH: f64 = 100_000.0;

impl ValueFormat {
    pub fn format(&self, value: f64, unit: Option<&str>) -> String {
        match self {
            ValueFormat::IndianCurrency if value >= CRORE => {
                format!("₹{:.2} Cr", value / CRORE)
            }
            ValueFormat::IndianCurrency => format!("₹{:.2} Lac", value / LAKH),
            ValueFormat::Plain => match unit {
                Some(unit) => format!("{} {}", plain_number(value), unit),
                None => plain_number(value),
            },
        }
    }
}

fn plain_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// Bounds and presentation of a numeric range field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RangeSpec {
    pub min_value: f64,
    pub max_value: f64,
    pub step: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default)]
    pub format: ValueFormat,
}

impl RangeSpec {
    /// Range shown before the user touches the slider.
    pub fn full_span(&self) -> RangeValue {
        RangeValue::new(self.min_value, self.max_value)
    }

    /// New lower bound. A missing or zero input falls back to the field minimum.
    pub fn with_min(&self, current: Option<&RangeValue>, min: Option<f64>) -> RangeValue {
        let base = current.copied().unwrap_or_else(|| self.full_span());
        let min = min
            .filter(|value| *value != 0.0)
            .unwrap_or(self.min_value)
            .clamp(self.min_value, self.max_value);
        RangeValue {
            min: Some(min),
            max: base.max,
        }
    }

    /// New upper bound, never below the current lower bound.
    pub fn with_max(&self, current: Option<&RangeValue>, max: Option<f64>) -> RangeValue {
        let base = current.copied().unwrap_or_else(|| self.full_span());
        let floor = base.min.unwrap_or(self.min_value);
        let max = max
            .filter(|value| *value != 0.0)
            .unwrap_or(floor)
            .clamp(floor.min(self.max_value), self.max_value);
        RangeValue {
            min: base.min,
            max: Some(max),
        }
    }

    pub fn describe(&self, range: &RangeValue) -> String {
        let unit = self.unit.as_deref();
        let bound = |value: Option<f64>| {
            value
                .map(|value| self.format.format(value, unit))
                .unwrap_or_else(|| "-".to_string())
        };
        format!("{} - {}", bound(range.min), bound(range.max))
    }
}

/// The closed set of field kinds. Each kind knows its answer shape and emptiness rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    Autocomplete {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        placeholder: Option<String>,
    },
    MultiSelect {
        options: Vec<ChoiceOption>,
        #[serde(default)]
        searchable: bool,
    },
    SingleSelect {
        options: Vec<ChoiceOption>,
    },
    Range(RangeSpec),
}

impl FieldKind {
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Autocomplete { .. } => "autocomplete",
            FieldKind::MultiSelect { .. } => "multiselect",
            FieldKind::SingleSelect { .. } => "singleselect",
            FieldKind::Range(_) => "range",
        }
    }

    pub fn options(&self) -> &[ChoiceOption] {
        match self {
            FieldKind::MultiSelect { options, .. } | FieldKind::SingleSelect { options } => options,
            FieldKind::Autocomplete { .. } | FieldKind::Range(_) => &[],
        }
    }

    /// Whether `value` has the shape this kind produces.
    pub fn accepts(&self, value: &AnswerValue) -> bool {
        matches!(
            (self, value),
            (
                FieldKind::Autocomplete { .. },
                AnswerValue::Text(_) | AnswerValue::Location(_)
            ) | (FieldKind::MultiSelect { .. }, AnswerValue::Choices(_))
                | (FieldKind::SingleSelect { .. }, AnswerValue::Choice(_))
                | (FieldKind::Range(_), AnswerValue::Range(_))
        )
    }

    /// Emptiness rule of the kind. Mis-shaped answers count as absent.
    pub fn is_answered(&self, value: Option<&AnswerValue>) -> bool {
        let Some(value) = value.filter(|value| self.accepts(value)) else {
            return false;
        };
        match value {
            AnswerValue::Text(text) => !text.trim().is_empty(),
            AnswerValue::Location(location) => !location.address.trim().is_empty(),
            AnswerValue::Choices(values) => !values.is_empty(),
            AnswerValue::Choice(value) => !value.is_empty(),
            AnswerValue::Range(range) => range.is_complete(),
        }
    }

    /// Reads a loosely shaped JSON answer; anything that does not fit is dropped.
    pub fn parse_answer(&self, raw: &Value) -> Option<AnswerValue> {
        match self {
            FieldKind::Autocomplete { .. } => AnswerValue::loose_text(raw),
            FieldKind::MultiSelect { .. } => AnswerValue::loose_choices(raw),
            FieldKind::SingleSelect { .. } => AnswerValue::loose_choice(raw),
            FieldKind::Range(_) => AnswerValue::loose_range(raw),
        }
    }
}

/// Definition of a single question inside a step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FieldSpec {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible_if: Option<Condition>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
            required: false,
            visible_if: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn visible_if(mut self, condition: Condition) -> Self {
        self.visible_if = Some(condition);
        self
    }

    pub fn is_visible(&self, answers: &AnswerBag) -> bool {
        self.visible_if
            .as_ref()
            .is_none_or(|condition| condition.evaluate(answers))
    }

    pub fn range(&self) -> Option<&RangeSpec> {
        match &self.kind {
            FieldKind::Range(spec) => Some(spec),
            _ => None,
        }
    }

    pub fn option_label<'a>(&'a self, value: &'a str) -> &'a str {
        self.kind
            .options()
            .iter()
            .find(|option| option.value == value)
            .map(|option| option.label.as_str())
            .unwrap_or(value)
    }

    /// Human readable form of an answer to this field.
    pub fn display(&self, value: &AnswerValue) -> String {
        match value {
            AnswerValue::Text(text) => text.clone(),
            AnswerValue::Location(location) => location.address.clone(),
            AnswerValue::Choices(values) => values
                .iter()
                .map(|value| self.option_label(value))
                .collect::<Vec<_>>()
                .join(", "),
            AnswerValue::Choice(value) => self.option_label(value).to_string(),
            AnswerValue::Range(range) => match self.range() {
                Some(spec) => spec.describe(range),
                None => format!("{:?} - {:?}", range.min, range.max),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn budget() -> RangeSpec {
        RangeSpec {
            min_value: 0.0,
            max_value: 50_000_000.0,
            step: 100_000.0,
            unit: Some("₹".into()),
            format: ValueFormat::IndianCurrency,
        }
    }

    #[test]
    fn indian_currency_switches_to_crore() {
        let format = ValueFormat::IndianCurrency;
        assert_eq!(format.format(2_500_000.0, None), "₹25.00 Lac");
        assert_eq!(format.format(31_000_000.0, None), "₹3.10 Cr");
    }

    #[test]
    fn plain_format_appends_unit() {
        assert_eq!(ValueFormat::Plain.format(12000.0, Some("Sqft")), "12000 Sqft");
        assert_eq!(ValueFormat::Plain.format(1.5, None), "1.5");
    }

    #[test]
    fn max_is_locked_to_current_min() {
        let spec = budget();
        let current = RangeValue::new(5_000_000.0, 20_000_000.0);
        let lowered = spec.with_max(Some(&current), Some(1_000_000.0));
        assert_eq!(lowered.max, Some(5_000_000.0));
        let cleared = spec.with_max(Some(&current), None);
        assert_eq!(cleared.max, Some(5_000_000.0));
    }

    #[test]
    fn zero_min_falls_back_to_field_minimum() {
        let spec = RangeSpec {
            min_value: 1000.0,
            ..budget()
        };
        let range = spec.with_min(None, Some(0.0));
        assert_eq!(range.min, Some(1000.0));
        assert_eq!(range.max, Some(50_000_000.0));
    }

    #[test]
    fn wrong_shape_is_not_an_answer() {
        let kind = FieldKind::Range(budget());
        assert!(!kind.is_answered(Some(&AnswerValue::Text("lots".into()))));
        assert!(!kind.is_answered(Some(&AnswerValue::Range(RangeValue {
            min: Some(1.0),
            max: None
        }))));
    }
}
