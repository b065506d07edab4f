pub mod field;
pub mod form;
pub mod step;

pub use field::{ChoiceOption, FieldKind, FieldSpec, RangeSpec, ValueFormat};
pub use form::{FormSpec, FormSpecError};
pub use step::{CompletionRule, ConditionalRequirement, StepSpec, StepTitle};
