use async_trait::async_trait;
use deepsearch_draw::LatLng;
use thiserror::Error;

use crate::geolocation::GeolocationError;

/// Failure of a suggestion or geocoding provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("location provider unavailable: {0}")]
    Unavailable(String),
    #[error("location provider rejected the request: {0}")]
    Rejected(String),
}

/// Places/geocoding collaborator. Implementations run on the UI loop, so the
/// futures are not required to be `Send`.
#[async_trait(?Send)]
pub trait LocationResolutionService {
    async fn get_suggestions(&self, query: &str) -> Result<Vec<String>, LookupError>;

    /// `Ok(None)` when the address is unknown to the provider.
    async fn geocode_address(&self, address: &str) -> Result<Option<LatLng>, LookupError>;

    async fn reverse_geocode(&self, point: LatLng) -> Result<Option<String>, LookupError>;

    async fn current_device_location(&self) -> Result<LatLng, GeolocationError>;
}

const LOCALITIES: &[(&str, LatLng)] = &[
    ("Koramangala, Bengaluru", LatLng::new(12.9279, 77.6271)),
    ("Indiranagar, Bengaluru", LatLng::new(12.9719, 77.6412)),
    ("Whitefield, Bengaluru", LatLng::new(12.9698, 77.7500)),
    ("HSR Layout, Bengaluru", LatLng::new(12.9116, 77.6389)),
    ("Marathahalli, Bengaluru", LatLng::new(12.9591, 77.6974)),
];

/// Offline provider backed by a fixed list of Bengaluru localities. Used when
/// no places backend is configured; it has no device location.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticLocations;

impl StaticLocations {
    pub fn localities() -> impl Iterator<Item = &'static str> {
        LOCALITIES.iter().map(|(name, _)| *name)
    }
}

#[async_trait(?Send)]
impl LocationResolutionService for StaticLocations {
    async fn get_suggestions(&self, query: &str) -> Result<Vec<String>, LookupError> {
        let needle = query.trim().to_lowercase();
        Ok(Self::localities()
            .filter(|name| name.to_lowercase().contains(&needle))
            .map(str::to_string)
            .collect())
    }

    async fn geocode_address(&self, address: &str) -> Result<Option<LatLng>, LookupError> {
        Ok(LOCALITIES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(address.trim()))
            .map(|(_, point)| *point))
    }

    async fn reverse_geocode(&self, _point: LatLng) -> Result<Option<String>, LookupError> {
        Ok(None)
    }

    async fn current_device_location(&self) -> Result<LatLng, GeolocationError> {
        Err(GeolocationError::PositionUnavailable)
    }
}
