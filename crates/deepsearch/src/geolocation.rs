use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::time::Instant;

/// Why the device location could not be read. The display text is what the
/// user sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeolocationError {
    #[error("Location access denied. Please enable location services.")]
    PermissionDenied,
    #[error("Location information unavailable.")]
    PositionUnavailable,
    #[error("Location request timed out.")]
    Timeout,
    #[error("An unknown error occurred.")]
    Unknown,
}

impl GeolocationError {
    /// Maps the platform error code (1 denied, 2 unavailable, 3 timeout).
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => GeolocationError::PermissionDenied,
            2 => GeolocationError::PositionUnavailable,
            3 => GeolocationError::Timeout,
            _ => GeolocationError::Unknown,
        }
    }

    pub fn code(&self) -> u16 {
        match self {
            GeolocationError::PermissionDenied => 1,
            GeolocationError::PositionUnavailable => 2,
            GeolocationError::Timeout => 3,
            GeolocationError::Unknown => 0,
        }
    }
}

/// Holds the last geolocation error until its time-to-live runs out.
#[derive(Debug, Clone)]
pub struct ErrorBanner {
    ttl: Duration,
    shown: Option<(GeolocationError, Instant)>,
}

impl ErrorBanner {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, shown: None }
    }

    pub fn show(&mut self, error: GeolocationError) {
        self.shown = Some((error, Instant::now()));
    }

    pub fn clear(&mut self) {
        self.shown = None;
    }

    /// The error, if it is still within its time-to-live.
    pub fn current(&self) -> Option<GeolocationError> {
        self.shown
            .filter(|(_, at)| at.elapsed() < self.ttl)
            .map(|(error, _)| error)
    }

    pub fn expires_at(&self) -> Option<Instant> {
        self.shown.map(|(_, at)| at + self.ttl)
    }
}
