//! Open-Meteo weather provider.
//!
//! Fetches a one-day daily summary from the Open-Meteo archive API. Wind
//! is requested in m/s and precipitation in mm, so values pass straight
//! into the card's canonical units. WMO weather codes are mapped onto the
//! canonical condition enum by a pure, tested function.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;

use scenecard_core::{CanonicalCondition, Unavailable, WeatherFacts};

use super::{ProviderInitError, WeatherSource};

const DEFAULT_BASE_URL: &str = "https://archive-api.open-meteo.com/v1/archive";

/// Weather source backed by the Open-Meteo archive API.
pub struct OpenMeteoWeather {
    base_url: String,
    client: reqwest::Client,
}

impl OpenMeteoWeather {
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
}

#[derive(Debug, Deserialize)]
struct ArchiveResponse {
    daily: Option<Daily>,
}

#[derive(Debug, Default, Deserialize)]
struct Daily {
    #[serde(default)]
    time: Vec<String>,
    #[serde(default)]
    weather_code: Vec<Option<u16>>,
    #[serde(default)]
    temperature_2m_mean: Vec<Option<f64>>,
    #[serde(default)]
    precipitation_sum: Vec<Option<f64>>,
    #[serde(default)]
    wind_speed_10m_max: Vec<Option<f64>>,
}

/// Map a WMO weather interpretation code onto the canonical vocabulary.
///
/// Unknown codes fall to `Unknown`, never `Clear`.
pub fn wmo_condition(code: u16) -> CanonicalCondition {
    use CanonicalCondition::*;
    match code {
        0 => Clear,
        1 | 2 => PartlyCloudy,
        3 => Overcast,
        45 | 48 => Fog,
        51 | 53 | 55 | 61 | 80 => LightRain,
        63 | 65 | 81 | 82 => Rain,
        56 | 57 | 66 | 67 => Snow, // freezing drizzle/rain
        71 | 73 | 75 | 77 | 85 | 86 => Snow,
        95 | 96 | 99 => Thunderstorm,
        _ => Unknown,
    }
}

fn to_facts(response: ArchiveResponse, requested: NaiveDate) -> WeatherFacts {
    let Some(daily) = response.daily else {
        return WeatherFacts::default();
    };

    // find the row for the requested date; the API echoes ISO dates
    let requested_str = requested.format("%Y-%m-%d").to_string();
    let Some(row) = daily.time.iter().position(|t| *t == requested_str) else {
        return WeatherFacts::default();
    };

    let get = |values: &Vec<Option<f64>>| values.get(row).copied().flatten();

    WeatherFacts {
        label: None,
        condition: daily
            .weather_code
            .get(row)
            .copied()
            .flatten()
            .map(wmo_condition),
        temperature_c: get(&daily.temperature_2m_mean),
        precip_mm: get(&daily.precipitation_sum),
        wind_mps: get(&daily.wind_speed_10m_max),
        visibility_km: None,
        observation_date: Some(requested),
    }
}

#[async_trait]
impl WeatherSource for OpenMeteoWeather {
    async fn daily(
        &self,
        lat: f64,
        lon: f64,
        date: NaiveDate,
    ) -> Result<WeatherFacts, Unavailable> {
        let day = date.format("%Y-%m-%d");
        let url = format!(
            "{}?latitude={lat}&longitude={lon}&start_date={day}&end_date={day}\
             &daily=weather_code,temperature_2m_mean,precipitation_sum,wind_speed_10m_max\
             &wind_speed_unit=ms&timezone=auto",
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

        let parsed: ArchiveResponse = response
            .json()
            .await
            .map_err(|e| Unavailable::Malformed(e.to_string()))?;

        Ok(to_facts(parsed, date))
    }

    fn name(&self) -> &str {
        "open-meteo/0.1"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn wmo_codes_map_to_buckets() {
        assert_eq!(wmo_condition(0), CanonicalCondition::Clear);
        assert_eq!(wmo_condition(2), CanonicalCondition::PartlyCloudy);
        assert_eq!(wmo_condition(3), CanonicalCondition::Overcast);
        assert_eq!(wmo_condition(45), CanonicalCondition::Fog);
        assert_eq!(wmo_condition(51), CanonicalCondition::LightRain);
        assert_eq!(wmo_condition(63), CanonicalCondition::Rain);
        assert_eq!(wmo_condition(75), CanonicalCondition::Snow);
        assert_eq!(wmo_condition(95), CanonicalCondition::Thunderstorm);
        // unknown code never coerces to clear
        assert_eq!(wmo_condition(42), CanonicalCondition::Unknown);
    }

    #[test]
    fn daily_row_maps_to_facts() {
        let response = ArchiveResponse {
            daily: Some(Daily {
                time: vec!["2025-10-09".to_string()],
                weather_code: vec![Some(3)],
                temperature_2m_mean: vec![Some(7.4)],
                precipitation_sum: vec![Some(0.0)],
                wind_speed_10m_max: vec![Some(3.1)],
            }),
        };

        let facts = to_facts(response, date(2025, 10, 9));
        assert_eq!(facts.condition, Some(CanonicalCondition::Overcast));
        assert_eq!(facts.temperature_c, Some(7.4));
        assert_eq!(facts.wind_mps, Some(3.1));
        assert_eq!(facts.observation_date, Some(date(2025, 10, 9)));
    }

    #[test]
    fn missing_date_row_yields_default_facts() {
        let response = ArchiveResponse {
            daily: Some(Daily {
                time: vec!["2025-10-08".to_string()],
                weather_code: vec![Some(0)],
                ..Default::default()
            }),
        };
        let facts = to_facts(response, date(2025, 10, 9));
        assert_eq!(facts, WeatherFacts::default());
    }

    #[test]
    fn null_cells_stay_null() {
        let response = ArchiveResponse {
            daily: Some(Daily {
                time: vec!["2025-10-09".to_string()],
                weather_code: vec![None],
                temperature_2m_mean: vec![None],
                precipitation_sum: vec![None],
                wind_speed_10m_max: vec![None],
            }),
        };
        let facts = to_facts(response, date(2025, 10, 9));
        assert!(facts.condition.is_none());
        assert!(facts.temperature_c.is_none());
        assert_eq!(facts.observation_date, Some(date(2025, 10, 9)));
    }
}
