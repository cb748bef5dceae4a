//! Nominatim reverse-geocoding provider.
//!
//! Wraps the public Nominatim `/reverse` endpoint (jsonv2 format). The
//! response-to-facts mapping is a pure function so it can be tested
//! without the network.

use async_trait::async_trait;
use serde::Deserialize;

use scenecard_core::{GeocodeFacts, Unavailable};

use super::{Geocoder, ProviderInitError};

const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// Nominatim requires a descriptive User-Agent from API consumers.
const USER_AGENT: &str = concat!("scenecard/", env!("CARGO_PKG_VERSION"));

/// Reverse geocoder backed by a Nominatim instance.
pub struct NominatimGeocoder {
    base_url: String,
    client: reqwest::Client,
}

impl NominatimGeocoder {
    pub fn new() -> Result<Self, ProviderInitError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Point at a self-hosted Nominatim instance.
    pub fn with_base_url(url: impl Into<String>) -> Result<Self, ProviderInitError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ProviderInitError::HttpClient(e.to_string()))?;
        Ok(Self {
            base_url: url.into(),
            client,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    display_name: Option<String>,
    #[serde(default)]
    address: Option<Address>,
}

#[derive(Debug, Default, Deserialize)]
struct Address {
    road: Option<String>,
    suburb: Option<String>,
    neighbourhood: Option<String>,
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    state: Option<String>,
    postcode: Option<String>,
    country: Option<String>,
    country_code: Option<String>,
}

fn to_facts(response: ReverseResponse) -> GeocodeFacts {
    let address = response.address.unwrap_or_default();
    GeocodeFacts {
        display_name: response.display_name,
        road: address.road,
        suburb: address.suburb.or(address.neighbourhood),
        // Nominatim reports exactly one of these per place rank
        city: address.city.or(address.town).or(address.village),
        state: address.state,
        postcode: address.postcode,
        country: address.country,
        country_code: address.country_code,
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn reverse(&self, lat: f64, lon: f64) -> Result<GeocodeFacts, Unavailable> {
        let url = format!(
            "{}/reverse?format=jsonv2&lat={lat}&lon={lon}&zoom=18&addressdetails=1",
            self.base_url
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Unavailable::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Unavailable::Transport(format!("HTTP {status}")));
        }

        let parsed: ReverseResponse = response
            .json()
            .await
            .map_err(|e| Unavailable::Malformed(e.to_string()))?;

        Ok(to_facts(parsed))
    }

    fn name(&self) -> &str {
        "nominatim/0.1"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn city_falls_back_through_town_and_village() {
        let town_only = ReverseResponse {
            display_name: Some("Somewhere".to_string()),
            address: Some(Address {
                town: Some("Vernon".to_string()),
                country: Some("France".to_string()),
                ..Default::default()
            }),
        };
        let facts = to_facts(town_only);
        assert_eq!(facts.city.as_deref(), Some("Vernon"));

        let village_only = ReverseResponse {
            display_name: None,
            address: Some(Address {
                village: Some("Giverny".to_string()),
                ..Default::default()
            }),
        };
        assert_eq!(to_facts(village_only).city.as_deref(), Some("Giverny"));
    }

    #[test]
    fn missing_address_block_yields_bare_facts() {
        let response = ReverseResponse {
            display_name: Some("48.85837, 2.29448".to_string()),
            address: None,
        };
        let facts = to_facts(response);
        assert!(facts.city.is_none());
        assert!(facts.country.is_none());
        assert_eq!(facts.display_name.as_deref(), Some("48.85837, 2.29448"));
    }

    #[test]
    fn full_address_maps_through() {
        let json = r#"{
            "display_name": "Avenue Anatole France, Paris, France",
            "address": {
                "road": "Avenue Anatole France",
                "suburb": "Gros-Caillou",
                "city": "Paris",
                "state": "Île-de-France",
                "postcode": "75007",
                "country": "France",
                "country_code": "fr"
            }
        }"#;
        let parsed: ReverseResponse = serde_json::from_str(json).unwrap();
        let facts = to_facts(parsed);
        assert_eq!(facts.road.as_deref(), Some("Avenue Anatole France"));
        assert_eq!(facts.city.as_deref(), Some("Paris"));
        assert_eq!(facts.country_code.as_deref(), Some("fr"));
    }
}
