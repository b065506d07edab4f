use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::answers::AnswerBag;
use crate::condition::Condition;
use crate::spec::field::FieldSpec;
use crate::spec::form::FormSpec;

/// Heading of a step; templates echo earlier answers back to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum StepTitle {
    Text(String),
    /// `{field}` placeholders expand to the display form of that field's answer.
    Template(String),
}

impl StepTitle {
    pub fn resolve(&self, form: &FormSpec, answers: &AnswerBag) -> String {
        match self {
            StepTitle::Text(text) => text.clone(),
            StepTitle::Template(template) => expand(template, form, answers),
        }
    }
}

fn expand(template: &str, form: &FormSpec, answers: &AnswerBag) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            out.push_str(&rest[open..]);
            return out;
        };
        let name = &after[..close];
        if let (Some(field), Some(value)) = (form.field(name), answers.get(name))
            && field.kind.accepts(value)
        {
            out.push_str(&field.display(value));
        }
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    out
}

/// Whole-step rule that replaces the per-field checks.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum CompletionRule {
    #[default]
    Fields,
    /// The field must hold a resolved location with a non-empty address; plain text is not enough.
    ResolvedLocation { field: String },
}

/// Makes `field` required whenever `when` holds, regardless of its own `required` flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ConditionalRequirement {
    pub field: String,
    pub when: Condition,
}

/// One screen of the wizard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StepSpec {
    pub id: String,
    pub title: StepTitle,
    pub fields: Vec<FieldSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible_if: Option<Condition>,
    #[serde(default)]
    pub completion: CompletionRule,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requirements: Vec<ConditionalRequirement>,
    #[serde(default)]
    pub skippable: bool,
}

impl StepSpec {
    pub fn new(id: impl Into<String>, title: StepTitle, fields: Vec<FieldSpec>) -> Self {
        Self {
            id: id.into(),
            title,
            fields,
            visible_if: None,
            completion: CompletionRule::Fields,
            requirements: Vec::new(),
            skippable: false,
        }
    }

    pub fn visible_if(mut self, condition: Condition) -> Self {
        self.visible_if = Some(condition);
        self
    }

    pub fn completion(mut self, rule: CompletionRule) -> Self {
        self.completion = rule;
        self
    }

    pub fn require_when(mut self, field: impl Into<String>, when: Condition) -> Self {
        self.requirements.push(ConditionalRequirement {
            field: field.into(),
            when,
        });
        self
    }

    pub fn skippable(mut self) -> Self {
        self.skippable = true;
        self
    }

    pub fn is_visible(&self, answers: &AnswerBag) -> bool {
        self.visible_if
            .as_ref()
            .is_none_or(|condition| condition.evaluate(answers))
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }
}
