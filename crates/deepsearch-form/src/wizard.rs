use std::fmt;

use tracing::debug;

use crate::answers::{AnswerBag, AnswerValue};
use crate::spec::field::FieldSpec;
use crate::spec::form::FormSpec;
use crate::spec::step::StepSpec;
use crate::store::{AnswerStore, SubscriptionId};
use crate::validate::{StepValidation, check_step};
use crate::visibility::{visible_fields, visible_steps};

/// Notifications delivered to whatever hosts the wizard.
#[derive(Debug, Clone, PartialEq)]
pub enum WizardEvent {
    StepChanged(usize),
    ValidationChanged(bool),
    AnswersChanged(AnswerBag),
    Submitted(AnswerBag),
}

/// Result of a forward navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Moved(usize),
    /// The current step is incomplete, not skippable, or there is no step to leave.
    Blocked,
    Submitted,
}

type WizardObserver = Box<dyn FnMut(&WizardEvent)>;

/// Drives the step index over the *visible* steps and re-derives visibility and
/// validity from the current answers after every mutation.
pub struct WizardController {
    spec: FormSpec,
    store: AnswerStore,
    step_index: usize,
    active_field: Option<String>,
    step_valid: bool,
    observers: Vec<(SubscriptionId, WizardObserver)>,
    next_observer: SubscriptionId,
}

impl fmt::Debug for WizardController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WizardController")
            .field("form", &self.spec.id)
            .field("step_index", &self.step_index)
            .field("active_field", &self.active_field)
            .field("step_valid", &self.step_valid)
            .field("store", &self.store)
            .finish()
    }
}

impl WizardController {
    pub fn new(spec: FormSpec) -> Self {
        Self::with_answers(spec, AnswerBag::new())
    }

    pub fn with_answers(spec: FormSpec, answers: AnswerBag) -> Self {
        let mut controller = Self {
            spec,
            store: AnswerStore::with_answers(answers),
            step_index: 0,
            active_field: None,
            step_valid: false,
            observers: Vec::new(),
            next_observer: 0,
        };
        controller.step_valid = controller.can_advance();
        controller
    }

    pub fn spec(&self) -> &FormSpec {
        &self.spec
    }

    pub fn answers(&self) -> &AnswerBag {
        self.store.answers()
    }

    pub fn store(&self) -> &AnswerStore {
        &self.store
    }

    pub fn step_index(&self) -> usize {
        self.step_index
    }

    pub fn visible_steps(&self) -> Vec<&StepSpec> {
        visible_steps(&self.spec, self.store.answers())
    }

    pub fn current_step(&self) -> Option<&StepSpec> {
        self.visible_steps().get(self.step_index).copied()
    }

    pub fn visible_fields(&self) -> Vec<&FieldSpec> {
        self.current_step()
            .map(|step| visible_fields(step, self.store.answers()))
            .unwrap_or_default()
    }

    /// Title of the current step, evaluated against the answers as they are now.
    pub fn current_title(&self) -> String {
        self.current_step()
            .map(|step| step.title.resolve(&self.spec, self.store.answers()))
            .unwrap_or_default()
    }

    pub fn validation(&self) -> StepValidation {
        self.current_step()
            .map(|step| check_step(step, self.store.answers()))
            .unwrap_or_default()
    }

    pub fn can_advance(&self) -> bool {
        self.validation().complete
    }

    pub fn is_last_step(&self) -> bool {
        let total = self.visible_steps().len();
        total > 0 && self.step_index + 1 == total
    }

    pub fn can_skip(&self) -> bool {
        !self.is_last_step() && self.current_step().is_some_and(|step| step.skippable)
    }

    /// Completion percentage: index / (visible steps - 1).
    pub fn progress_percent(&self) -> f64 {
        let total = self.visible_steps().len();
        if total <= 1 {
            return if total == 1 { 100.0 } else { 0.0 };
        }
        self.step_index as f64 / (total - 1) as f64 * 100.0
    }

    pub fn active_field(&self) -> Option<&str> {
        self.active_field.as_deref()
    }

    pub fn set_active_field(&mut self, field: Option<&str>) {
        self.active_field = field.map(str::to_string);
    }

    pub fn advance(&mut self) -> Advance {
        if !self.can_advance() {
            return Advance::Blocked;
        }
        if self.is_last_step() {
            let answers = self.store.answers().clone();
            debug!(form = %self.spec.id, answers = answers.len(), "wizard submitted");
            self.emit(WizardEvent::Submitted(answers));
            return Advance::Submitted;
        }
        self.move_to(self.step_index + 1);
        Advance::Moved(self.step_index)
    }

    /// Moves forward without the completeness gate; never leaves the terminal step.
    pub fn skip(&mut self) -> Advance {
        if !self.can_skip() {
            return Advance::Blocked;
        }
        self.move_to(self.step_index + 1);
        Advance::Moved(self.step_index)
    }

    pub fn retreat(&mut self) -> usize {
        self.move_to(self.step_index.saturating_sub(1));
        self.step_index
    }

    pub fn set_answer(&mut self, field: &str, value: AnswerValue) {
        self.store.set(field, value);
        self.after_answers_changed();
    }

    pub fn clear_answer(&mut self, field: &str) {
        self.store.clear(field);
        self.after_answers_changed();
    }

    pub fn toggle_choice(&mut self, field: &str, option: &str) {
        self.store.toggle_choice(field, option);
        self.after_answers_changed();
    }

    /// Stores a picked location or option and clears the field's search text.
    pub fn commit_selection(&mut self, field: &str, value: AnswerValue) {
        self.store.commit_selection(field, value);
        self.after_answers_changed();
    }

    pub fn set_search_text(&mut self, field: &str, text: impl Into<String>) {
        self.store.set_search_text(field, text);
    }

    pub fn search_text(&self, field: &str) -> &str {
        self.store.search_text(field)
    }

    /// Sets the lower bound of a range field using the field's editing rules.
    pub fn set_range_min(&mut self, field: &str, min: Option<f64>) {
        let Some(range) = self.spec.field(field).and_then(FieldSpec::range) else {
            return;
        };
        let current = self.store.get(field).and_then(AnswerValue::as_range);
        let next = range.with_min(current, min);
        self.set_answer(field, AnswerValue::Range(next));
    }

    /// Sets the upper bound of a range field; it never drops below the lower bound.
    pub fn set_range_max(&mut self, field: &str, max: Option<f64>) {
        let Some(range) = self.spec.field(field).and_then(FieldSpec::range) else {
            return;
        };
        let current = self.store.get(field).and_then(AnswerValue::as_range);
        let next = range.with_max(current, max);
        self.set_answer(field, AnswerValue::Range(next));
    }

    /// Observes answers of the underlying store directly.
    pub fn subscribe_answers(
        &mut self,
        listener: impl FnMut(&AnswerBag) + 'static,
    ) -> SubscriptionId {
        self.store.subscribe(listener)
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&WizardEvent) + 'static) -> SubscriptionId {
        let id = self.next_observer;
        self.next_observer += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(observer_id, _)| *observer_id != id);
        before != self.observers.len()
    }

    fn move_to(&mut self, index: usize) {
        let last = self.visible_steps().len().saturating_sub(1);
        let index = index.min(last);
        if index != self.step_index {
            debug!(from = self.step_index, to = index, "wizard step changed");
            self.step_index = index;
            self.active_field = None;
            self.emit(WizardEvent::StepChanged(index));
        }
        self.refresh_validity();
    }

    fn after_answers_changed(&mut self) {
        self.emit(WizardEvent::AnswersChanged(self.store.answers().clone()));
        let last = self.visible_steps().len().saturating_sub(1);
        if self.step_index > last {
            debug!(
                from = self.step_index,
                to = last,
                "visible steps shrank, clamping step index"
            );
            self.step_index = last;
            self.active_field = None;
            self.emit(WizardEvent::StepChanged(last));
        }
        self.refresh_validity();
    }

    fn refresh_validity(&mut self) {
        let valid = self.can_advance();
        if valid != self.step_valid {
            self.step_valid = valid;
            self.emit(WizardEvent::ValidationChanged(valid));
        }
    }

    fn emit(&mut self, event: WizardEvent) {
        for (_, observer) in self.observers.iter_mut() {
            observer(&event);
        }
    }
}
