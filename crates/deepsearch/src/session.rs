use deepsearch_draw::{DrawnArea, LatLng, Viewport};
use deepsearch_form::{
    Advance, AnswerBag, AnswerValue, FieldKind, FormSpec, LocationSelection, LocationSource,
    StepView, WizardController, build_step_view,
};
use tracing::{debug, warn};

use crate::geolocation::{ErrorBanner, GeolocationError};
use crate::options::WizardOptions;
use crate::preview::{MapPreview, PreviewRadius};
use crate::service::{LocationResolutionService, LookupError};
use crate::suggest::{SuggestionBoard, SuggestionTicket, lookup_suggestions};

/// Address recorded for an area drawn on the map.
pub const DRAWN_AREA_ADDRESS: &str = "Custom Drawn Area";

/// One user's pass through the search wizard, wired to the location
/// collaborators. All answer writes still go through the wizard.
pub struct SearchSession<S> {
    wizard: WizardController,
    service: S,
    options: WizardOptions,
    suggestions: SuggestionBoard,
    banner: ErrorBanner,
    preview: Option<MapPreview>,
    radius: PreviewRadius,
}

impl<S: LocationResolutionService> SearchSession<S> {
    pub fn new(spec: FormSpec, service: S, options: WizardOptions) -> Self {
        Self::resume(spec, AnswerBag::new(), service, options)
    }

    pub fn resume(
        spec: FormSpec,
        answers: AnswerBag,
        service: S,
        options: WizardOptions,
    ) -> Self {
        Self {
            wizard: WizardController::with_answers(spec, answers),
            service,
            suggestions: SuggestionBoard::new(options.min_query_chars, options.suggestion_limit),
            banner: ErrorBanner::new(options.error_ttl()),
            options,
            preview: None,
            radius: PreviewRadius::default(),
        }
    }

    pub fn wizard(&self) -> &WizardController {
        &self.wizard
    }

    /// Direct access for answer edits that involve no collaborator. Search
    /// text of autocomplete fields belongs to [`SearchSession::type_query`];
    /// lookups whose query no longer matches the field's text are dropped.
    pub fn wizard_mut(&mut self) -> &mut WizardController {
        &mut self.wizard
    }

    pub fn options(&self) -> &WizardOptions {
        &self.options
    }

    pub fn answers(&self) -> &AnswerBag {
        self.wizard.answers()
    }

    pub fn view(&self) -> Option<StepView> {
        build_step_view(&self.wizard)
    }

    pub fn focus_field(&mut self, field: &str) {
        self.wizard.set_active_field(Some(field));
        self.suggestions.focus(field);
        self.preview = None;
    }

    pub fn blur_field(&mut self) {
        self.wizard.set_active_field(None);
        self.suggestions.blur();
    }

    pub fn suggestions(&self) -> &[String] {
        self.suggestions.suggestions()
    }

    pub fn suggestions_open(&self) -> bool {
        self.suggestions.is_open()
    }

    /// Records typed text. For autocomplete fields the text also becomes the
    /// (unresolved) answer and a lookup ticket is returned when the query is
    /// long enough; other fields only filter their options.
    pub fn type_query(&mut self, field: &str, text: &str) -> Option<SuggestionTicket> {
        self.wizard.set_search_text(field, text);
        let autocomplete = self
            .wizard
            .spec()
            .field(field)
            .is_some_and(|spec| matches!(spec.kind, FieldKind::Autocomplete { .. }));
        if !autocomplete {
            return None;
        }
        if text.trim().is_empty() {
            self.wizard.clear_answer(field);
        } else {
            self.wizard.set_answer(field, AnswerValue::Text(text.to_string()));
        }
        if self.wizard.active_field() != Some(field) {
            self.focus_field(field);
        }
        self.suggestions.issue(field, text)
    }

    /// Runs the lookup for `ticket` against the service.
    pub async fn lookup(&self, ticket: &SuggestionTicket) -> Result<Vec<String>, LookupError> {
        lookup_suggestions(&self.service, ticket).await
    }

    pub fn apply_suggestions(
        &mut self,
        ticket: &SuggestionTicket,
        result: Result<Vec<String>, LookupError>,
    ) -> bool {
        if self.wizard.search_text(&ticket.field).trim() != ticket.query {
            debug!(field = %ticket.field, query = %ticket.query, "search text changed since lookup");
            return false;
        }
        self.suggestions.resolve(ticket, result)
    }

    /// Types `text` and waits for its suggestions.
    pub async fn search(&mut self, field: &str, text: &str) -> bool {
        let Some(ticket) = self.type_query(field, text) else {
            return false;
        };
        let result = self.lookup(&ticket).await;
        self.apply_suggestions(&ticket, result)
    }

    /// Commits a suggestion, geocoding it for the preview. Unknown addresses
    /// and provider failures fall back to the default centre.
    pub async fn select_suggestion(
        &mut self,
        field: &str,
        suggestion: &str,
    ) -> LocationSelection {
        let point = match self.service.geocode_address(suggestion).await {
            Ok(Some(point)) => point,
            Ok(None) => {
                debug!(address = suggestion, "suggestion not geocoded, using fallback centre");
                self.options.fallback_center
            }
            Err(err) => {
                warn!(address = suggestion, error = %err, "geocoding failed, using fallback centre");
                self.options.fallback_center
            }
        };
        self.commit(field, point, suggestion.to_string(), LocationSource::Suggestion)
    }

    /// Resolves the field's typed text. Leaves the text answer in place and
    /// returns `None` when the provider does not know the address.
    pub async fn submit_typed(&mut self, field: &str) -> Option<LocationSelection> {
        let typed = self.wizard.search_text(field).trim().to_string();
        if typed.is_empty() {
            return None;
        }
        match self.service.geocode_address(&typed).await {
            Ok(Some(point)) => Some(self.commit(field, point, typed, LocationSource::Typed)),
            Ok(None) => None,
            Err(err) => {
                warn!(address = %typed, error = %err, "geocoding typed address failed");
                None
            }
        }
    }

    /// Reads the device position within the configured timeout and commits it
    /// with its reverse-geocoded address (or `"lat, lng"` when there is none).
    pub async fn use_current_location(
        &mut self,
        field: &str,
    ) -> Result<LocationSelection, GeolocationError> {
        self.banner.clear();
        let located = tokio::time::timeout(
            self.options.geolocation_timeout(),
            self.service.current_device_location(),
        )
        .await;
        let point = match located {
            Ok(Ok(point)) => point,
            Ok(Err(err)) => return Err(self.location_failed(err)),
            Err(_) => return Err(self.location_failed(GeolocationError::Timeout)),
        };

        let address = match self.service.reverse_geocode(point).await {
            Ok(Some(address)) if !address.trim().is_empty() => address,
            Ok(_) => coordinates_label(point),
            Err(err) => {
                warn!(error = %err, "reverse geocoding failed, using coordinates");
                coordinates_label(point)
            }
        };
        Ok(self.commit(field, point, address, LocationSource::CurrentLocation))
    }

    /// Commits an area drawn on the map, located at its centroid.
    pub fn apply_drawn_area(&mut self, field: &str, area: &DrawnArea) -> LocationSelection {
        self.commit(
            field,
            area.centroid,
            DRAWN_AREA_ADDRESS.to_string(),
            LocationSource::MapDrawn,
        )
    }

    /// Geolocation error still inside its display window.
    pub fn location_error(&self) -> Option<GeolocationError> {
        self.banner.current()
    }

    pub fn preview(&self) -> Option<MapPreview> {
        self.preview
    }

    /// Viewport for opening the full map: centred on the committed location,
    /// or on the fallback centre before one exists.
    pub fn map_viewport(&self, width: f64, height: f64) -> Viewport {
        let center = self
            .preview
            .map_or(self.options.fallback_center, |preview| preview.center);
        Viewport::new(center, self.options.default_zoom, width, height)
    }

    pub fn set_preview_radius(&mut self, radius: PreviewRadius) {
        self.radius = radius;
        if let Some(preview) = self.preview.as_mut() {
            preview.radius = radius;
        }
    }

    pub fn advance(&mut self) -> Advance {
        let before = self.wizard.step_index();
        let outcome = self.wizard.advance();
        self.after_navigation(before);
        outcome
    }

    pub fn skip(&mut self) -> Advance {
        let before = self.wizard.step_index();
        let outcome = self.wizard.skip();
        self.after_navigation(before);
        outcome
    }

    pub fn retreat(&mut self) -> usize {
        let before = self.wizard.step_index();
        let index = self.wizard.retreat();
        self.after_navigation(before);
        index
    }

    pub fn into_answers(self) -> AnswerBag {
        self.wizard.answers().clone()
    }

    fn commit(
        &mut self,
        field: &str,
        point: LatLng,
        address: String,
        source: LocationSource,
    ) -> LocationSelection {
        let selection = LocationSelection {
            lat: point.lat,
            lng: point.lng,
            address,
            source,
        };
        debug!(field, source = source.as_str(), address = %selection.address, "location committed");
        self.wizard
            .commit_selection(field, AnswerValue::Location(selection.clone()));
        self.suggestions.supersede(field);
        self.suggestions.close();
        self.preview = Some(MapPreview {
            center: point,
            radius: self.radius,
        });
        selection
    }

    fn location_failed(&mut self, err: GeolocationError) -> GeolocationError {
        warn!(code = err.code(), error = %err, "device location unavailable");
        self.banner.show(err);
        err
    }

    fn after_navigation(&mut self, before: usize) {
        if self.wizard.step_index() != before {
            self.suggestions.blur();
        }
    }
}

fn coordinates_label(point: LatLng) -> String {
    format!("{:.6}, {:.6}", point.lat, point.lng)
}
