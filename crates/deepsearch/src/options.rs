use std::time::Duration;

use deepsearch_draw::LatLng;
use serde::{Deserialize, Serialize};

/// Map centre used whenever a location cannot be resolved (central Bengaluru).
pub const FALLBACK_CENTER: LatLng = LatLng::new(12.9716, 77.5946);

/// Tunables of a search session. Every field has a default, so a partial
/// JSON object is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WizardOptions {
    /// Queries shorter than this never reach the location provider.
    pub min_query_chars: usize,
    pub suggestion_limit: usize,
    pub geolocation_timeout_ms: u64,
    pub error_ttl_ms: u64,
    pub fallback_center: LatLng,
    pub default_zoom: f64,
}

impl Default for WizardOptions {
    fn default() -> Self {
        Self {
            min_query_chars: 2,
            suggestion_limit: 8,
            geolocation_timeout_ms: 10_000,
            error_ttl_ms: 5_000,
            fallback_center: FALLBACK_CENTER,
            default_zoom: 11.0,
        }
    }
}

impl WizardOptions {
    pub fn geolocation_timeout(&self) -> Duration {
        Duration::from_millis(self.geolocation_timeout_ms)
    }

    pub fn error_ttl(&self) -> Duration {
        Duration::from_millis(self.error_ttl_ms)
    }
}
