#![allow(missing_docs)]

pub mod config;
pub mod geolocation;
pub mod options;
pub mod preview;
pub mod service;
pub mod session;
pub mod suggest;

pub use config::{load_form_spec, load_options};
pub use geolocation::{ErrorBanner, GeolocationError};
pub use options::{FALLBACK_CENTER, WizardOptions};
pub use preview::{MapPreview, PreviewRadius};
pub use service::{LocationResolutionService, LookupError, StaticLocations};
pub use session::{DRAWN_AREA_ADDRESS, SearchSession};
pub use suggest::{SuggestionBoard, SuggestionTicket, lookup_suggestions};

pub use deepsearch_draw as draw;
pub use deepsearch_form as form;
