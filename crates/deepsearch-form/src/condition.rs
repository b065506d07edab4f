use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::answers::{AnswerBag, AnswerValue};

/// Pure predicate over the answer bag, used for step/field visibility,
/// option filtering and conditional requirements.
///
/// Absent or mis-shaped answers behave as "nothing selected".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Condition {
    Always,
    IsSet { field: String },
    NonEmpty { field: String },
    Equals { field: String, value: String },
    Includes { field: String, value: String },
    IncludesAny { field: String, values: Vec<String> },
    /// At least one value is selected and every selected value is in `values`.
    OnlyFrom { field: String, values: Vec<String> },
    And { conditions: Vec<Condition> },
    Or { conditions: Vec<Condition> },
    Not { condition: Box<Condition> },
}

impl Condition {
    pub fn is_set(field: impl Into<String>) -> Self {
        Condition::IsSet {
            field: field.into(),
        }
    }

    pub fn non_empty(field: impl Into<String>) -> Self {
        Condition::NonEmpty {
            field: field.into(),
        }
    }

    pub fn includes(field: impl Into<String>, value: impl Into<String>) -> Self {
        Condition::Includes {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn includes_any(field: impl Into<String>, values: &[&str]) -> Self {
        Condition::IncludesAny {
            field: field.into(),
            values: values.iter().map(|value| value.to_string()).collect(),
        }
    }

    pub fn only_from(field: impl Into<String>, values: &[&str]) -> Self {
        Condition::OnlyFrom {
            field: field.into(),
            values: values.iter().map(|value| value.to_string()).collect(),
        }
    }

    pub fn negate(condition: Condition) -> Self {
        Condition::Not {
            condition: Box::new(condition),
        }
    }

    pub fn evaluate(&self, answers: &AnswerBag) -> bool {
        match self {
            Condition::Always => true,
            Condition::IsSet { field } => answers.contains(field),
            Condition::NonEmpty { field } => answers.get(field).is_some_and(has_content),
            Condition::Equals { field, value } => answers.get(field).is_some_and(|answer| {
                answer.as_choice().or_else(|| answer.as_text()) == Some(value.as_str())
            }),
            Condition::Includes { field, value } => selected(answers, field).contains(&value.as_str()),
            Condition::IncludesAny { field, values } => {
                let chosen = selected(answers, field);
                values.iter().any(|value| chosen.contains(&value.as_str()))
            }
            Condition::OnlyFrom { field, values } => {
                let chosen = selected(answers, field);
                !chosen.is_empty()
                    && chosen
                        .iter()
                        .all(|value| values.iter().any(|allowed| allowed == value))
            }
            Condition::And { conditions } => conditions.iter().all(|inner| inner.evaluate(answers)),
            Condition::Or { conditions } => conditions.iter().any(|inner| inner.evaluate(answers)),
            Condition::Not { condition } => !condition.evaluate(answers),
        }
    }

    /// Field names this condition reads.
    pub fn fields(&self) -> Vec<&str> {
        match self {
            Condition::Always => Vec::new(),
            Condition::IsSet { field }
            | Condition::NonEmpty { field }
            | Condition::Equals { field, .. }
            | Condition::Includes { field, .. }
            | Condition::IncludesAny { field, .. }
            | Condition::OnlyFrom { field, .. } => vec![field.as_str()],
            Condition::And { conditions } | Condition::Or { conditions } => {
                conditions.iter().flat_map(Condition::fields).collect()
            }
            Condition::Not { condition } => condition.fields(),
        }
    }
}

fn selected<'a>(answers: &'a AnswerBag, field: &str) -> Vec<&'a str> {
    answers
        .get(field)
        .map(AnswerValue::selected)
        .unwrap_or_default()
}

fn has_content(answer: &AnswerValue) -> bool {
    match answer {
        AnswerValue::Text(text) => !text.trim().is_empty(),
        AnswerValue::Location(location) => !location.address.trim().is_empty(),
        AnswerValue::Choices(values) => !values.is_empty(),
        AnswerValue::Choice(value) => !value.is_empty(),
        AnswerValue::Range(range) => range.min.is_some() || range.max.is_some(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types(values: &[&str]) -> AnswerBag {
        AnswerBag::new().with("propertyType", AnswerValue::choices(values.iter().copied()))
    }

    #[test]
    fn only_from_needs_a_selection() {
        let villas = Condition::only_from("propertyType", &["villa", "villament", "rowHouses"]);
        assert!(!villas.evaluate(&AnswerBag::new()));
        assert!(!villas.evaluate(&types(&[])));
        assert!(villas.evaluate(&types(&["villa", "rowHouses"])));
        assert!(!villas.evaluate(&types(&["villa", "apartment"])));
    }

    #[test]
    fn mis_shaped_answers_read_as_unselected() {
        let bag = AnswerBag::new().with("propertyType", AnswerValue::Text("plot".into()));
        assert!(!Condition::includes("propertyType", "plot").evaluate(&bag));
        assert!(Condition::non_empty("propertyType").evaluate(&bag));
    }

    #[test]
    fn conditions_round_trip_through_json() {
        let condition = Condition::And {
            conditions: vec![
                Condition::non_empty("projectType"),
                Condition::negate(Condition::includes("projectType", "readyToMove")),
            ],
        };
        let json = serde_json::to_value(&condition).expect("serialize");
        assert_eq!(json["op"], "and");
        let back: Condition = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, condition);
    }
}
