//! Runtime configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// The four concurrently dispatched adapter families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterKind {
    Geocoder,
    MapContext,
    Sun,
    Weather,
}

impl AdapterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Geocoder => "geocoder",
            Self::MapContext => "map_context",
            Self::Sun => "sun",
            Self::Weather => "weather",
        }
    }
}

/// Orchestrator settings.
///
/// Serialized durations are humantime strings ("8s", "250ms") so config
/// files stay readable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Timeout applied independently to each adapter call.
    #[serde(with = "duration_str")]
    pub adapter_timeout: Duration,

    /// Override for the map-context adapter; Overpass-style services run
    /// slower than point lookups.
    #[serde(default, with = "opt_duration_str")]
    pub map_context_timeout: Option<Duration>,

    /// Bounded retries per adapter after the first attempt. Zero disables
    /// retrying entirely; values stay small by design.
    pub max_retries: usize,

    /// Pause between an attempt and its retry.
    #[serde(with = "duration_str")]
    pub retry_delay: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            adapter_timeout: Duration::from_secs(8),
            map_context_timeout: None,
            max_retries: 1,
            retry_delay: Duration::from_millis(250),
        }
    }
}

impl RuntimeConfig {
    /// Effective timeout for one adapter family.
    pub fn timeout_for(&self, kind: AdapterKind) -> Duration {
        match kind {
            AdapterKind::MapContext => {
                self.map_context_timeout.unwrap_or(self.adapter_timeout)
            }
            _ => self.adapter_timeout,
        }
    }
}

mod duration_str {
    use super::*;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&humantime::format_duration(*d).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let raw = String::deserialize(d)?;
        humantime::parse_duration(&raw).map_err(serde::de::Error::custom)
    }
}

mod opt_duration_str {
    use super::*;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match d {
            Some(d) => s.serialize_some(&humantime::format_duration(*d).to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<Duration>, D::Error> {
        let raw = Option::<String>::deserialize(d)?;
        raw.map(|r| humantime::parse_duration(&r).map_err(serde::de::Error::custom))
            .transpose()
    }
}
