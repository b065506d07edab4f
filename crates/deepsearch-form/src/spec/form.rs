use std::collections::BTreeSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::answers::AnswerBag;
use crate::spec::field::FieldSpec;
use crate::spec::step::{CompletionRule, StepSpec};

/// Top-level wizard definition: an ordered list of steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FormSpec {
    pub id: String,
    pub title: String,
    pub version: String,
    pub steps: Vec<StepSpec>,
}

/// Integrity problems in a form definition.
#[derive(Debug, Error)]
pub enum FormSpecError {
    #[error("form '{0}' has no steps")]
    NoSteps(String),
    #[error("duplicate step id '{0}'")]
    DuplicateStep(String),
    #[error("duplicate field name '{0}'")]
    DuplicateField(String),
    #[error("step '{step}' references unknown field '{field}'")]
    UnknownField { step: String, field: String },
    #[error("range field '{0}' has min_value above max_value")]
    InvertedRange(String),
    #[error("invalid form json: {0}")]
    Json(#[from] serde_json::Error),
}

impl FormSpec {
    /// Parses and checks a JSON form definition.
    pub fn from_json_str(raw: &str) -> Result<Self, FormSpecError> {
        let spec: FormSpec = serde_json::from_str(raw)?;
        spec.check()?;
        Ok(spec)
    }

    /// Verifies unique ids/names and that step rules only name fields of their own step.
    pub fn check(&self) -> Result<(), FormSpecError> {
        if self.steps.is_empty() {
            return Err(FormSpecError::NoSteps(self.id.clone()));
        }

        let mut step_ids = BTreeSet::new();
        let mut field_names = BTreeSet::new();
        for step in &self.steps {
            if !step_ids.insert(step.id.as_str()) {
                return Err(FormSpecError::DuplicateStep(step.id.clone()));
            }
            for field in &step.fields {
                if !field_names.insert(field.name.as_str()) {
                    return Err(FormSpecError::DuplicateField(field.name.clone()));
                }
                if let Some(range) = field.range()
                    && range.min_value > range.max_value
                {
                    return Err(FormSpecError::InvertedRange(field.name.clone()));
                }
            }

            let mut referenced = step
                .requirements
                .iter()
                .map(|requirement| requirement.field.as_str())
                .collect::<Vec<_>>();
            if let CompletionRule::ResolvedLocation { field } = &step.completion {
                referenced.push(field);
            }
            if let Some(missing) = referenced.into_iter().find(|name| step.field(name).is_none()) {
                return Err(FormSpecError::UnknownField {
                    step: step.id.clone(),
                    field: missing.to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn step(&self, id: &str) -> Option<&StepSpec> {
        self.steps.iter().find(|step| step.id == id)
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.steps.iter().find_map(|step| step.field(name))
    }

    /// Builds a bag from loosely shaped JSON, keeping only known fields whose value fits the field kind.
    pub fn parse_answers(&self, raw: &Value) -> AnswerBag {
        let Some(object) = raw.as_object() else {
            return AnswerBag::new();
        };
        object
            .iter()
            .filter_map(|(name, value)| {
                let field = self.field(name)?;
                let parsed = field.kind.parse_answer(value);
                if parsed.is_none() {
                    tracing::debug!(field = %name, kind = field.kind.name(), "dropping mis-shaped answer");
                }
                parsed.map(|answer| (name.clone(), answer))
            })
            .collect()
    }
}
