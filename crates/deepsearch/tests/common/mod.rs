#![allow(dead_code)]

use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;
use deepsearch::draw::LatLng;
use deepsearch::{GeolocationError, LocationResolutionService, LookupError};

/// Location provider with canned answers and per-query latency.
#[derive(Clone, Default)]
pub struct Scripted {
    script: Rc<Script>,
}

#[derive(Default)]
pub struct Script {
    delays_ms: BTreeMap<String, u64>,
    listing: Option<Vec<String>>,
    fail_lookups: bool,
    geocoded: BTreeMap<String, LatLng>,
    device: Option<Result<LatLng, GeolocationError>>,
    device_delay_ms: u64,
    reverse: Option<String>,
}

impl Script {
    pub fn delay(mut self, query: &str, ms: u64) -> Self {
        self.delays_ms.insert(query.to_string(), ms);
        self
    }

    pub fn listing(mut self, suggestions: Vec<String>) -> Self {
        self.listing = Some(suggestions);
        self
    }

    pub fn failing_lookups(mut self) -> Self {
        self.fail_lookups = true;
        self
    }

    pub fn geocode(mut self, address: &str, point: LatLng) -> Self {
        self.geocoded.insert(address.to_string(), point);
        self
    }

    pub fn device(mut self, result: Result<LatLng, GeolocationError>, delay_ms: u64) -> Self {
        self.device = Some(result);
        self.device_delay_ms = delay_ms;
        self
    }

    pub fn reverse(mut self, address: &str) -> Self {
        self.reverse = Some(address.to_string());
        self
    }

    pub fn build(self) -> Scripted {
        Scripted {
            script: Rc::new(self),
        }
    }
}

#[async_trait(?Send)]
impl LocationResolutionService for Scripted {
    async fn get_suggestions(&self, query: &str) -> Result<Vec<String>, LookupError> {
        if let Some(ms) = self.script.delays_ms.get(query) {
            tokio::time::sleep(Duration::from_millis(*ms)).await;
        }
        if self.script.fail_lookups {
            return Err(LookupError::Unavailable("places backend offline".into()));
        }
        Ok(self
            .script
            .listing
            .clone()
            .unwrap_or_else(|| vec![format!("{query}, Bengaluru")]))
    }

    async fn geocode_address(&self, address: &str) -> Result<Option<LatLng>, LookupError> {
        Ok(self.script.geocoded.get(address).copied())
    }

    async fn reverse_geocode(&self, _point: LatLng) -> Result<Option<String>, LookupError> {
        Ok(self.script.reverse.clone())
    }

    async fn current_device_location(&self) -> Result<LatLng, GeolocationError> {
        tokio::time::sleep(Duration::from_millis(self.script.device_delay_ms)).await;
        self.script
            .device
            .unwrap_or(Err(GeolocationError::PositionUnavailable))
    }
}
