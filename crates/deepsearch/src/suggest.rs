use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, warn};

use crate::service::{LocationResolutionService, LookupError};

/// One issued lookup. Only the most recent ticket of a field may fill the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionTicket {
    pub field: String,
    pub query: String,
    pub sequence: u64,
}

/// Suggestion list of the focused autocomplete field.
///
/// Results are applied by sequence number rather than arrival order: a slow
/// answer to an older query is dropped once a newer query was issued, and any
/// answer is dropped once its field lost focus.
#[derive(Debug, Clone)]
pub struct SuggestionBoard {
    min_query_chars: usize,
    limit: usize,
    active_field: Option<String>,
    latest: BTreeMap<String, u64>,
    next_sequence: u64,
    suggestions: Vec<String>,
    open: bool,
}

impl SuggestionBoard {
    pub fn new(min_query_chars: usize, limit: usize) -> Self {
        Self {
            min_query_chars,
            limit,
            active_field: None,
            latest: BTreeMap::new(),
            next_sequence: 0,
            suggestions: Vec::new(),
            open: false,
        }
    }

    pub fn active_field(&self) -> Option<&str> {
        self.active_field.as_deref()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn suggestions(&self) -> &[String] {
        if self.open { &self.suggestions } else { &[] }
    }

    pub fn focus(&mut self, field: &str) {
        if self.active_field.as_deref() != Some(field) {
            self.suggestions.clear();
        }
        self.active_field = Some(field.to_string());
        self.open = true;
    }

    pub fn blur(&mut self) {
        self.active_field = None;
        self.close();
    }

    pub fn close(&mut self) {
        self.open = false;
        self.suggestions.clear();
    }

    /// Registers a new query for `field`, superseding every earlier one. Returns
    /// `None` (and empties the list) when the query is too short to look up.
    pub fn issue(&mut self, field: &str, query: &str) -> Option<SuggestionTicket> {
        let sequence = self.supersede(field);

        let query = query.trim();
        if query.chars().count() < self.min_query_chars {
            self.suggestions.clear();
            return None;
        }
        Some(SuggestionTicket {
            field: field.to_string(),
            query: query.to_string(),
            sequence,
        })
    }

    /// Invalidates every ticket issued so far for `field`.
    pub fn supersede(&mut self, field: &str) -> u64 {
        self.next_sequence += 1;
        self.latest.insert(field.to_string(), self.next_sequence);
        self.next_sequence
    }

    /// Applies a finished lookup. Returns `false` when the result was stale.
    /// Provider failures leave an empty list.
    pub fn resolve(
        &mut self,
        ticket: &SuggestionTicket,
        result: Result<Vec<String>, LookupError>,
    ) -> bool {
        if self.latest.get(&ticket.field) != Some(&ticket.sequence) {
            debug!(field = %ticket.field, query = %ticket.query, "dropping superseded suggestions");
            return false;
        }
        if self.active_field.as_deref() != Some(ticket.field.as_str()) {
            debug!(field = %ticket.field, "dropping suggestions for inactive field");
            return false;
        }
        self.suggestions = match result {
            Ok(found) => {
                let mut seen = BTreeSet::new();
                found
                    .into_iter()
                    .filter(|suggestion| seen.insert(suggestion.clone()))
                    .take(self.limit)
                    .collect()
            }
            Err(err) => {
                warn!(field = %ticket.field, query = %ticket.query, error = %err, "suggestion lookup failed");
                Vec::new()
            }
        };
        self.open = true;
        true
    }
}

pub async fn lookup_suggestions<S>(
    service: &S,
    ticket: &SuggestionTicket,
) -> Result<Vec<String>, LookupError>
where
    S: LocationResolutionService + ?Sized,
{
    service.get_suggestions(&ticket.query).await
}
