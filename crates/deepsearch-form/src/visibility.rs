use crate::answers::AnswerBag;
use crate::spec::field::{ChoiceOption, FieldKind, FieldSpec};
use crate::spec::form::FormSpec;
use crate::spec::step::StepSpec;

/// Steps whose predicate holds for `answers`, in declaration order.
pub fn visible_steps<'a>(spec: &'a FormSpec, answers: &AnswerBag) -> Vec<&'a StepSpec> {
    spec.steps
        .iter()
        .filter(|step| step.is_visible(answers))
        .collect()
}

/// Fields of `step` whose predicate holds for `answers`, in declaration order.
pub fn visible_fields<'a>(step: &'a StepSpec, answers: &AnswerBag) -> Vec<&'a FieldSpec> {
    step.fields
        .iter()
        .filter(|field| field.is_visible(answers))
        .collect()
}

/// Options still offered after `hidden_if` filtering and, for searchable fields,
/// a case-insensitive label match against `search`.
pub fn visible_options<'a>(
    field: &'a FieldSpec,
    answers: &AnswerBag,
    search: &str,
) -> Vec<&'a ChoiceOption> {
    let needle = search.trim().to_lowercase();
    let searchable = matches!(
        field.kind,
        FieldKind::MultiSelect {
            searchable: true,
            ..
        }
    );
    field
        .kind
        .options()
        .iter()
        .filter(|option| option.is_offered(answers))
        .filter(|option| {
            !searchable || needle.is_empty() || option.label.to_lowercase().contains(&needle)
        })
        .collect()
}
