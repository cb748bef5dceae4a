//! Overpass map-context provider.
//!
//! Queries an Overpass API endpoint for ways and POIs around the point and
//! folds the raw tags into [`MapFacts`]. The fold is a pure function over
//! the element list; only the HTTP exchange is fallible.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Deserialize;

use scenecard_core::{MapFacts, Unavailable, MAX_POIS, MAX_POI_CHARS};

use super::{MapContextSource, ProviderInitError};

const DEFAULT_BASE_URL: &str = "https://overpass-api.de/api/interpreter";

/// Tag keys that make an element a nameable POI, in notability order.
const POI_KEYS: [&str; 5] = ["tourism", "historic", "amenity", "shop", "leisure"];

/// Map-context source backed by an Overpass API endpoint.
pub struct OverpassMapContext {
    base_url: String,
    client: reqwest::Client,
}

impl OverpassMapContext {
    pub fn new() -> Result<Self, ProviderInitError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(url: impl Into<String>) -> Result<Self, ProviderInitError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ProviderInitError::HttpClient(e.to_string()))?;
        Ok(Self {
            base_url: url.into(),
            client,
        })
    }

    fn query_body(lat: f64, lon: f64, radius_m: u32) -> String {
        format!(
            "[out:json][timeout:10];\
             (\
               way(around:{r},{lat},{lon})[\"highway\"];\
               way(around:{r},{lat},{lon})[\"landuse\"];\
               way(around:{r},{lat},{lon})[\"natural\"];\
               way(around:{r},{lat},{lon})[\"waterway\"];\
               way(around:{r},{lat},{lon})[\"building\"];\
               way(around:{r},{lat},{lon})[\"leisure\"];\
               nwr(around:{r},{lat},{lon})[\"name\"][\"amenity\"];\
               nwr(around:{r},{lat},{lon})[\"name\"][\"shop\"];\
               nwr(around:{r},{lat},{lon})[\"name\"][\"tourism\"];\
               nwr(around:{r},{lat},{lon})[\"name\"][\"historic\"];\
               nwr(around:{r},{lat},{lon})[\"name\"][\"leisure\"];\
             );\
             out tags;",
            r = radius_m
        )
    }
}

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<Element>,
}

#[derive(Debug, Default, Deserialize)]
struct Element {
    #[serde(default)]
    tags: BTreeMap<String, String>,
}

/// Fold raw elements into the map-facts summary.
fn summarize(elements: &[Element]) -> MapFacts {
    let mut facts = MapFacts::default();
    let mut building_count: u32 = 0;
    let mut levels_sum = 0.0f64;
    let mut levels_n: u32 = 0;
    // (notability rank, label) pairs, deduplicated by label
    let mut pois: Vec<(usize, String)> = Vec::new();

    for element in elements {
        let tags = &element.tags;

        if let Some(value) = tags.get("landuse") {
            *facts.landuse.entry(value.clone()).or_insert(0) += 1;
        }
        if let Some(value) = tags.get("natural") {
            *facts.natural.entry(value.clone()).or_insert(0) += 1;
        }
        if tags.contains_key("waterway") {
            facts.water = true;
        }
        if let Some(value) = tags.get("highway") {
            *facts.highway.entry(value.clone()).or_insert(0) += 1;
        }
        if tags
            .get("sidewalk")
            .is_some_and(|v| v != "no" && v != "none")
        {
            facts.sidewalk = true;
        }
        if tags.get("leisure").is_some_and(|v| v == "park") {
            facts.park = true;
        }
        if tags.contains_key("building") {
            building_count += 1;
            if let Some(levels) = tags.get("building:levels").and_then(|v| v.parse::<f64>().ok())
            {
                if levels.is_finite() && levels > 0.0 {
                    levels_sum += levels;
                    levels_n += 1;
                }
            }
        }

        if let Some(name) = tags.get("name") {
            if let Some(rank) = POI_KEYS.iter().position(|key| tags.contains_key(*key)) {
                let label: String = name.trim().chars().take(MAX_POI_CHARS).collect();
                if !label.is_empty() && !pois.iter().any(|(_, existing)| existing == &label) {
                    pois.push((rank, label));
                }
            }
        }
    }

    facts.water = facts.water
        || facts.natural.keys().any(|k| k == "water" || k == "wetland");
    facts.building_count = Some(building_count);
    facts.avg_building_levels = (levels_n > 0).then(|| levels_sum / f64::from(levels_n));

    pois.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
    facts.pois = pois
        .into_iter()
        .take(MAX_POIS)
        .map(|(_, label)| label)
        .collect();

    facts
}

#[async_trait]
impl MapContextSource for OverpassMapContext {
    async fn features(
        &self,
        lat: f64,
        lon: f64,
        radius_m: u32,
    ) -> Result<MapFacts, Unavailable> {
        let body = Self::query_body(lat, lon, radius_m);

        let response = self
            .client
            .post(&self.base_url)
            .form(&[("data", body)])
            .send()
            .await
            .map_err(|e| Unavailable::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Unavailable::Transport(format!("HTTP {status}")));
        }

        let parsed: OverpassResponse = response
            .json()
            .await
            .map_err(|e| Unavailable::Malformed(e.to_string()))?;

        Ok(summarize(&parsed.elements))
    }

    fn name(&self) -> &str {
        "overpass/0.1"
    }
}
