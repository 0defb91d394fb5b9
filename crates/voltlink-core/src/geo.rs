//! **Location Resolver** — reverse geocoding and travel time to home.
//!
//! Implement `GeoProvider` for a real maps backend or use `StaticGeo` for
//! tests and keyless operation. Structurally empty responses (no geocode
//! results, no route) are expected degraded outcomes and surface as
//! `None`/empty, never as errors; only transport failures return `Err`.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{SkillError, SkillResult};

/// One address component from a reverse-geocode result, tagged with the
/// provider's component types (`street_number`, `route`, `locality`, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressComponent {
    pub long_name: String,
    pub short_name: String,
    pub types: Vec<String>,
}

/// Human-readable place derived from coordinates. Every part is optional;
/// ephemeral, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Place {
    pub street_number: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
}

/// The user's configured "home" location, the travel-time baseline.
/// Absent entirely when never configured or not permitted.
#[derive(Debug, Clone, Default)]
pub struct ReferenceAddress {
    pub street_line: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
}

impl ReferenceAddress {
    /// Destination string for the routing provider: present parts joined
    /// with ", " ("1 Main St, Palo Alto, CA").
    pub fn formatted(&self) -> String {
        [&self.street_line, &self.city, &self.region]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// External geocoding/routing backend.
pub trait GeoProvider: Send + Sync {
    /// Address components at the coordinates. Empty vec = no results.
    fn reverse_geocode(&self, lat: f64, lon: f64) -> SkillResult<Vec<AddressComponent>>;

    /// Driving duration in seconds from the coordinates to a destination
    /// address string. `Ok(None)` = no route / malformed provider response.
    fn driving_duration_secs(
        &self,
        lat: f64,
        lon: f64,
        destination: &str,
    ) -> SkillResult<Option<u64>>;
}

/// Reverse-geocode coordinates into a `Place`. Each part is extracted
/// independently from whatever component tags come back; `None` when the
/// provider returns no results at all.
pub fn resolve_place(
    geo: &dyn GeoProvider,
    lat: f64,
    lon: f64,
) -> SkillResult<Option<Place>> {
    let components = geo.reverse_geocode(lat, lon)?;
    if components.is_empty() {
        debug!(lat, lon, "no geocode results");
        return Ok(None);
    }

    let mut place = Place::default();
    for component in &components {
        if component.types.iter().any(|t| t == "street_number") {
            place.street_number = Some(component.short_name.clone());
        } else if component.types.iter().any(|t| t == "route") {
            place.street = Some(component.short_name.clone());
        } else if component.types.iter().any(|t| t == "locality") {
            place.city = Some(component.long_name.clone());
        } else if component.types.iter().any(|t| t == "administrative_area_level_1") {
            place.state = Some(component.short_name.clone());
        }
    }
    Ok(Some(place))
}

/// Driving time in seconds from the coordinates to the reference address.
/// `None` when the provider has no route.
pub fn travel_time_seconds(
    geo: &dyn GeoProvider,
    lat: f64,
    lon: f64,
    home: &ReferenceAddress,
) -> SkillResult<Option<u64>> {
    geo.driving_duration_secs(lat, lon, &home.formatted())
}

/// Production provider: Google Maps geocoding + distance-matrix web APIs.
pub struct GoogleMapsGeo {
    client: reqwest::blocking::Client,
    api_key: String,
    base_url: String,
}

impl GoogleMapsGeo {
    const DEFAULT_BASE_URL: &'static str = "https://maps.googleapis.com/maps/api";

    pub fn new(api_key: impl Into<String>) -> SkillResult<Self> {
        Self::with_base_url(api_key, Self::DEFAULT_BASE_URL)
    }

    /// Override the endpoint base, mainly for pointing tests at a stub server.
    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> SkillResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| SkillError::Geocode(e.to_string()))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Build from the `GOOGLE_MAPS_API_KEY` environment variable.
    pub fn from_env() -> SkillResult<Self> {
        let key = std::env::var("GOOGLE_MAPS_API_KEY")
            .map_err(|_| SkillError::Config("GOOGLE_MAPS_API_KEY not set".to_string()))?;
        if key.trim().is_empty() {
            return Err(SkillError::Config("GOOGLE_MAPS_API_KEY is empty".to_string()));
        }
        Self::new(key)
    }
}

impl GeoProvider for GoogleMapsGeo {
    fn reverse_geocode(&self, lat: f64, lon: f64) -> SkillResult<Vec<AddressComponent>> {
        let url = format!("{}/geocode/json", self.base_url);
        let res = self
            .client
            .get(&url)
            .query(&[
                ("latlng", format!("{},{}", lat, lon)),
                ("key", self.api_key.clone()),
            ])
            .send()
            .map_err(|e| SkillError::Geocode(e.to_string()))?;
        if !res.status().is_success() {
            return Err(SkillError::Geocode(format!(
                "geocode failed with status {}",
                res.status()
            )));
        }
        let body: serde_json::Value = res
            .json()
            .map_err(|e| SkillError::Geocode(e.to_string()))?;
        // An empty results array is a valid "nothing here" answer.
        let components = body
            .pointer("/results/0/address_components")
            .cloned()
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| SkillError::Geocode(e.to_string()))?
            .unwrap_or_default();
        Ok(components)
    }

    fn driving_duration_secs(
        &self,
        lat: f64,
        lon: f64,
        destination: &str,
    ) -> SkillResult<Option<u64>> {
        let url = format!("{}/distancematrix/json", self.base_url);
        let res = self
            .client
            .get(&url)
            .query(&[
                ("origins", format!("{},{}", lat, lon)),
                ("destinations", destination.to_string()),
                ("mode", "driving".to_string()),
                ("units", "imperial".to_string()),
                ("key", self.api_key.clone()),
            ])
            .send()
            .map_err(|e| SkillError::Routing(e.to_string()))?;
        if !res.status().is_success() {
            return Err(SkillError::Routing(format!(
                "distance matrix failed with status {}",
                res.status()
            )));
        }
        let body: serde_json::Value = res
            .json()
            .map_err(|e| SkillError::Routing(e.to_string()))?;
        // Any missing level in rows[0].elements[0].duration.value means no
        // route: an expected outcome, resolved silently to None.
        Ok(body
            .pointer("/rows/0/elements/0/duration/value")
            .and_then(|v| v.as_u64()))
    }
}

/// Canned provider: fixed components and duration, with call counters.
/// Stands in for the maps backend when no API key is configured, and lets
/// tests assert that the "at home" short-circuit skips geocoding entirely.
#[derive(Debug, Default)]
pub struct StaticGeo {
    pub components: Vec<AddressComponent>,
    pub duration_secs: Option<u64>,
    geocode_calls: AtomicUsize,
    duration_calls: AtomicUsize,
}

impl StaticGeo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_components(mut self, components: Vec<AddressComponent>) -> Self {
        self.components = components;
        self
    }

    pub fn with_duration(mut self, secs: u64) -> Self {
        self.duration_secs = Some(secs);
        self
    }

    /// How many times `reverse_geocode` has been invoked.
    pub fn geocode_calls(&self) -> usize {
        self.geocode_calls.load(Ordering::SeqCst)
    }

    /// How many times `driving_duration_secs` has been invoked.
    pub fn duration_calls(&self) -> usize {
        self.duration_calls.load(Ordering::SeqCst)
    }
}

impl GeoProvider for StaticGeo {
    fn reverse_geocode(&self, _lat: f64, _lon: f64) -> SkillResult<Vec<AddressComponent>> {
        self.geocode_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.components.clone())
    }

    fn driving_duration_secs(
        &self,
        _lat: f64,
        _lon: f64,
        _destination: &str,
    ) -> SkillResult<Option<u64>> {
        self.duration_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.duration_secs)
    }
}

/// Component constructor shorthand used across the test suites.
pub fn component(long_name: &str, short_name: &str, types: &[&str]) -> AddressComponent {
    AddressComponent {
        long_name: long_name.to_string(),
        short_name: short_name.to_string(),
        types: types.iter().map(|t| t.to_string()).collect(),
    }
}
