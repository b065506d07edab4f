#![allow(missing_docs)]

pub mod answers;
pub mod builtin;
pub mod condition;
pub mod spec;
pub mod store;
pub mod validate;
pub mod view;
pub mod visibility;
pub mod wizard;

pub use answers::{AnswerBag, AnswerValue, LocationSelection, LocationSource, RangeValue};
pub use builtin::property_search_form;
pub use condition::Condition;
pub use spec::{
    ChoiceOption, CompletionRule, ConditionalRequirement, FieldKind, FieldSpec, FormSpec,
    FormSpecError, RangeSpec, StepSpec, StepTitle, ValueFormat,
};
pub use store::{AnswerStore, SubscriptionId};
pub use validate::{StepValidation, ValidationError, check_step, is_step_complete};
pub use view::{FieldView, OptionView, StepView, build_step_view, render_text};
pub use visibility::{visible_fields, visible_options, visible_steps};
pub use wizard::{Advance, WizardController, WizardEvent};
