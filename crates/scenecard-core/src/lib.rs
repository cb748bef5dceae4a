//! # scenecard-core
//!
//! Deterministic scene-card assembly.
//!
//! This crate is the synchronous half of the pipeline: given the settled
//! outcomes of the provider fan-out, it classifies, scores, distills, and
//! validates, producing the final [`SceneCard`] or a construction error.
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: same request, same provider outcomes, same style,
//!    same `created_at` → byte-identical card
//! 2. **No I/O**: nothing here touches the network or the clock
//! 3. **Shape-stable**: degraded sections keep their object shape; only
//!    nulls and confidence scores reveal what was unavailable
//! 4. **Validated**: a card that fails schema or cross-field checks is
//!    never returned
//!
//! ## Example
//!
//! ```rust,ignore
//! use scenecard_core::{assemble, PromptStyle, SceneRequest, SectionOutcomes};
//!
//! let request = SceneRequest::new(48.85837, 2.29448, datetime_local, "Europe/Paris");
//! let card = assemble(&request, outcomes, &PromptStyle::default(), chrono::Utc::now())?;
//! println!("{}", card.prompt);
//! ```

pub mod assemble;
pub mod card;
pub mod classify;
pub mod confidence;
pub mod facts;
pub mod ident;
pub mod input;
pub mod normalize;
pub mod prompt;

// Re-export main types at crate root
pub use assemble::{assemble, ConstructionError, SectionOutcomes, MAX_POIS, MAX_POI_CHARS};
pub use card::{
    schema::validate_card_schema, validate::validate_card, validate::ValidationError,
    BuildingDensity, BuildingHeight, CanonicalCondition, Climate, Location, MapContext,
    MapElements, PlaceType, Provenance, RoadType, SceneCard, SourceFacts, SunGeometry, Weather,
    CARD_VERSION,
};
pub use classify::SunFlags;
pub use confidence::Confidence;
pub use facts::{
    ClimateFacts, GeocodeFacts, MapFacts, SectionOutcome, SunFacts, Unavailable, WeatherFacts,
};
pub use ident::scene_id;
pub use input::{InputError, SceneRequest, DEFAULT_RADIUS_M, MAX_RADIUS_M};
pub use prompt::{distill, PromptStyle, PromptStyleError};
