use serde::{Deserialize, Serialize};

use crate::answers::AnswerBag;
use crate::spec::step::{CompletionRule, StepSpec};
use crate::visibility::visible_fields;

/// A problem with an answer that is present but unusable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub code: String,
}

/// Outcome of checking one step against the current answers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StepValidation {
    pub complete: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_required: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ValidationError>,
}

pub fn is_step_complete(step: &StepSpec, answers: &AnswerBag) -> bool {
    check_step(step, answers).complete
}

pub fn check_step(step: &StepSpec, answers: &AnswerBag) -> StepValidation {
    let mut missing_required = Vec::new();
    let mut errors = Vec::new();

    match &step.completion {
        CompletionRule::ResolvedLocation { field } => {
            match answers.get(field) {
                Some(answer) if answer.as_location().is_some() => {
                    if answer.as_text().is_none_or(|text| text.trim().is_empty()) {
                        missing_required.push(field.clone());
                    }
                }
                Some(answer) if answer.as_text().is_some() => errors.push(ValidationError {
                    field: field.clone(),
                    message: "location has not been resolved".into(),
                    code: "unresolved_location".into(),
                }),
                _ => missing_required.push(field.clone()),
            }
            return finish(missing_required, errors);
        }
        CompletionRule::Fields => {}
    }

    for field in visible_fields(step, answers) {
        let answer = answers.get(&field.name);
        if !field.kind.is_answered(answer) {
            if field.required {
                missing_required.push(field.name.clone());
            }
            continue;
        }
        if let Some(range) = answer.and_then(|answer| answer.as_range())
            && !range.is_ordered()
        {
            errors.push(ValidationError {
                field: field.name.clone(),
                message: "range minimum is above its maximum".into(),
                code: "range_inverted".into(),
            });
        }
    }

    for requirement in &step.requirements {
        if !requirement.when.evaluate(answers) || missing_required.contains(&requirement.field) {
            continue;
        }
        let Some(field) = step.field(&requirement.field) else {
            missing_required.push(requirement.field.clone());
            continue;
        };
        // hidden fields cannot be answered
        if !field.is_visible(answers) {
            continue;
        }
        if !field.kind.is_answered(answers.get(&requirement.field)) {
            missing_required.push(requirement.field.clone());
        }
    }

    finish(missing_required, errors)
}

fn finish(missing_required: Vec<String>, errors: Vec<ValidationError>) -> StepValidation {
    StepValidation {
        complete: missing_required.is_empty() && errors.is_empty(),
        missing_required,
        errors,
    }
}
