use std::collections::BTreeMap;
use std::fmt;

use crate::answers::{AnswerBag, AnswerValue};

/// Identifier returned by `subscribe`, used to unsubscribe.
pub type SubscriptionId = u64;

type AnswerListener = Box<dyn FnMut(&AnswerBag)>;

/// Sole writer of answers. Every mutation swaps in a new bag snapshot and notifies
/// subscribers with it. Search text is a separate, transient channel.
#[derive(Default)]
pub struct AnswerStore {
    answers: AnswerBag,
    search_text: BTreeMap<String, String>,
    listeners: Vec<(SubscriptionId, AnswerListener)>,
    next_subscription: SubscriptionId,
}

impl fmt::Debug for AnswerStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnswerStore")
            .field("answers", &self.answers)
            .field("search_text", &self.search_text)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl AnswerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_answers(answers: AnswerBag) -> Self {
        Self {
            answers,
            ..Self::default()
        }
    }

    pub fn answers(&self) -> &AnswerBag {
        &self.answers
    }

    pub fn get(&self, field: &str) -> Option<&AnswerValue> {
        self.answers.get(field)
    }

    pub fn set(&mut self, field: &str, value: AnswerValue) -> AnswerBag {
        let next = self.answers.with(field, value);
        self.replace(next)
    }

    pub fn clear(&mut self, field: &str) -> AnswerBag {
        let next = self.answers.without(field);
        self.replace(next)
    }

    /// Adds `option` to a multiselect answer, or removes it when already selected.
    pub fn toggle_choice(&mut self, field: &str, option: &str) -> AnswerBag {
        let mut values = self
            .answers
            .get(field)
            .and_then(AnswerValue::as_choices)
            .map(<[String]>::to_vec)
            .unwrap_or_default();
        if let Some(position) = values.iter().position(|value| value == option) {
            values.remove(position);
        } else {
            values.push(option.to_string());
        }
        self.set(field, AnswerValue::Choices(values))
    }

    /// Writes an answer that came from a selection and drops the field's search text.
    pub fn commit_selection(&mut self, field: &str, value: AnswerValue) -> AnswerBag {
        self.search_text.remove(field);
        self.set(field, value)
    }

    pub fn search_text(&self, field: &str) -> &str {
        self.search_text.get(field).map(String::as_str).unwrap_or("")
    }

    pub fn set_search_text(&mut self, field: &str, text: impl Into<String>) {
        self.search_text.insert(field.to_string(), text.into());
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&AnswerBag) + 'static) -> SubscriptionId {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        before != self.listeners.len()
    }

    fn replace(&mut self, next: AnswerBag) -> AnswerBag {
        self.answers = next;
        for (_, listener) in self.listeners.iter_mut() {
            listener(&self.answers);
        }
        self.answers.clone()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn toggle_adds_then_removes() {
        let mut store = AnswerStore::new();
        store.toggle_choice("propertyType", "plot");
        store.toggle_choice("propertyType", "villa");
        let bag = store.toggle_choice("propertyType", "plot");
        assert_eq!(
            bag.get("propertyType").and_then(AnswerValue::as_choices),
            Some(&["villa".to_string()][..])
        );
    }

    #[test]
    fn commit_clears_search_text_only_for_that_field() {
        let mut store = AnswerStore::new();
        store.set_search_text("location", "Indira");
        store.set_search_text("developer", "pres");
        store.commit_selection("location", AnswerValue::Text("Indiranagar".into()));
        assert_eq!(store.search_text("location"), "");
        assert_eq!(store.search_text("developer"), "pres");
    }

    #[test]
    fn subscribers_see_each_snapshot_until_unsubscribed() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut store = AnswerStore::new();
        let sink = Rc::clone(&seen);
        let id = store.subscribe(move |bag| sink.borrow_mut().push(bag.len()));

        store.set("budget", AnswerValue::Choice("x".into()));
        store.set("developer", AnswerValue::choices(["sobha"]));
        assert!(store.unsubscribe(id));
        store.clear("budget");

        assert_eq!(*seen.borrow(), vec![1, 2]);
    }
}
