//! Address geocoding.
//!
//! Bootcamp addresses are resolved to a [`Location`] when a geocoder is
//! configured. [`MapQuestGeocoder`] speaks the MapQuest `address` API; tests
//! plug in their own [`Geocoder`].

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::ServerConfig;
use crate::models::Location;

/// Geocoding failures.
#[derive(Error, Debug)]
pub enum GeocodeError {
    /// The provider found nothing for the address.
    #[error("no location found for address '{0}'")]
    NoMatch(String),

    /// The provider could not be reached or answered garbage.
    #[error("geocoder request failed: {0}")]
    Request(String),
}

/// Resolves free-form addresses to locations.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Geocodes one address.
    async fn geocode(&self, address: &str) -> Result<Location, GeocodeError>;
}

/// Client for MapQuest-compatible geocoding endpoints.
#[derive(Debug, Clone)]
pub struct MapQuestGeocoder {
    client: reqwest::Client,
    url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct MapQuestResponse {
    #[serde(default)]
    results: Vec<MapQuestResult>,
}

#[derive(Debug, Deserialize)]
struct MapQuestResult {
    #[serde(default)]
    locations: Vec<MapQuestLocation>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct MapQuestLocation {
    street: String,
    #[serde(rename = "adminArea5")]
    city: String,
    #[serde(rename = "adminArea3")]
    state: String,
    #[serde(rename = "adminArea1")]
    country: String,
    postal_code: String,
    lat_lng: LatLng,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LatLng {
    lat: f64,
    lng: f64,
}

impl MapQuestGeocoder {
    /// Creates a client for `url` authenticating with `api_key`.
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            api_key: api_key.into(),
        }
    }

    /// Builds a geocoder from configuration, if one is configured.
    pub fn from_config(config: &ServerConfig) -> Option<Self> {
        let url = config.geocoder_url.as_deref()?.trim();
        if url.is_empty() {
            return None;
        }
        Some(Self::new(
            url,
            config.geocoder_api_key.clone().unwrap_or_default(),
        ))
    }
}

fn first_location(response: MapQuestResponse, address: &str) -> Result<Location, GeocodeError> {
    let found = response
        .results
        .into_iter()
        .next()
        .and_then(|result| result.locations.into_iter().next())
        .ok_or_else(|| GeocodeError::NoMatch(address.to_string()))?;

    Ok(Location::point(
        found.lat_lng.lat,
        found.lat_lng.lng,
        &found.street,
        &found.city,
        &found.state,
        &found.postal_code,
        &found.country,
    ))
}

#[async_trait]
impl Geocoder for MapQuestGeocoder {
    async fn geocode(&self, address: &str) -> Result<Location, GeocodeError> {
        debug!(address, "Geocoding address");

        let response = self
            .client
            .get(&self.url)
            .query(&[("key", self.api_key.as_str()), ("location", address)])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                warn!(error = %e, "Geocoder request failed");
                GeocodeError::Request(e.to_string())
            })?;

        let body: MapQuestResponse = response
            .json()
            .await
            .map_err(|e| GeocodeError::Request(e.to_string()))?;

        first_location(body, address)
    }
}
