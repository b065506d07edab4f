use serde::Serialize;

use crate::answers::AnswerValue;
use crate::spec::field::FieldSpec;
use crate::visibility::visible_options;
use crate::wizard::WizardController;

/// One option as offered to the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionView {
    pub value: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub selected: bool,
}

/// Describes a single visible field for renderers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldView {
    pub name: String,
    pub label: String,
    pub kind: &'static str,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<AnswerValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    pub search_text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionView>,
}

/// Everything a host needs to draw the current step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepView {
    pub step_id: String,
    pub title: String,
    pub index: usize,
    pub total: usize,
    pub progress_percent: f64,
    pub fields: Vec<FieldView>,
    pub can_advance: bool,
    pub can_skip: bool,
    pub is_last: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing_required: Vec<String>,
}

/// Build the view of the wizard's current step; `None` when no step is visible.
pub fn build_step_view(wizard: &WizardController) -> Option<StepView> {
    let step = wizard.current_step()?;
    let validation = wizard.validation();
    let fields = wizard
        .visible_fields()
        .into_iter()
        .map(|field| field_view(wizard, field))
        .collect();

    Some(StepView {
        step_id: step.id.clone(),
        title: wizard.current_title(),
        index: wizard.step_index(),
        total: wizard.visible_steps().len(),
        progress_percent: wizard.progress_percent(),
        fields,
        can_advance: validation.complete,
        can_skip: wizard.can_skip(),
        is_last: wizard.is_last_step(),
        missing_required: validation.missing_required,
    })
}

fn field_view(wizard: &WizardController, field: &FieldSpec) -> FieldView {
    let answers = wizard.answers();
    let search_text = wizard.search_text(&field.name).to_string();
    let value = answers
        .get(&field.name)
        .filter(|value| field.kind.accepts(value))
        .cloned();
    let selected = value
        .as_ref()
        .map(AnswerValue::selected)
        .unwrap_or_default();
    let options = visible_options(field, answers, &search_text)
        .into_iter()
        .map(|option| OptionView {
            value: option.value.clone(),
            label: option.label.clone(),
            icon: option.icon.clone(),
            selected: selected.contains(&option.value.as_str()),
        })
        .collect();
    let display = match (&value, field.range()) {
        (Some(value), _) => Some(field.display(value)),
        (None, Some(range)) => Some(range.describe(&range.full_span())),
        (None, None) => None,
    };

    FieldView {
        name: field.name.clone(),
        label: field.label.clone(),
        kind: field.kind.name(),
        required: field.required,
        value,
        display,
        search_text,
        options,
    }
}

/// Plain text rendering of a step view, for terminals and logs.
pub fn render_text(view: &StepView) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "[{}/{}] {} ({:.0}%)",
        view.index + 1,
        view.total,
        view.title,
        view.progress_percent
    ));
    for field in &view.fields {
        let marker = if field.required { "*" } else { "" };
        match &field.display {
            Some(display) => lines.push(format!("{}{}: {}", field.label, marker, display)),
            None => lines.push(format!("{}{}:", field.label, marker)),
        }
        for option in &field.options {
            let check = if option.selected { "x" } else { " " };
            lines.push(format!("  [{}] {}", check, option.label));
        }
    }
    let mut actions = Vec::new();
    if view.can_skip {
        actions.push("skip");
    }
    if view.can_advance {
        actions.push(if view.is_last { "submit" } else { "next" });
    }
    if !actions.is_empty() {
        lines.push(format!("actions: {}", actions.join(", ")));
    }
    lines.join("\n")
}
