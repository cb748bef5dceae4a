//! JSON Schema validation for scene cards.
//!
//! Cards are validated against spec/scene_card.schema.json before they
//! leave the pipeline. The schema covers structure: required keys at every
//! nesting level, types, enum membership, and numeric ranges. Cross-field
//! consistency lives in [`super::validate`], which runs after this pass.

use std::sync::OnceLock;
use thiserror::Error;

/// Embedded card schema (loaded at compile time).
const CARD_SCHEMA_JSON: &str = include_str!("../../../../spec/scene_card.schema.json");

/// Compiled JSON Schema validator (initialized once, reused).
static COMPILED_SCHEMA: OnceLock<Result<jsonschema::Validator, String>> = OnceLock::new();

/// Errors from schema loading.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Failed to load schema: {0}")]
    LoadError(String),
}

/// Get or initialize the compiled schema validator.
fn get_validator() -> Result<&'static jsonschema::Validator, SchemaError> {
    let result = COMPILED_SCHEMA.get_or_init(|| {
        let schema_value: serde_json::Value = match serde_json::from_str(CARD_SCHEMA_JSON) {
            Ok(v) => v,
            Err(e) => return Err(format!("Invalid schema JSON: {}", e)),
        };

        match jsonschema::options().build(&schema_value) {
            Ok(v) => Ok(v),
            Err(e) => Err(format!("Failed to compile schema: {}", e)),
        }
    });

    match result {
        Ok(v) => Ok(v),
        Err(e) => Err(SchemaError::LoadError(e.clone())),
    }
}

/// Validate a card JSON value against the schema.
///
/// Returns the first violation found; the validator never repairs.
pub fn validate_card_schema(card_json: &serde_json::Value) -> Result<(), String> {
    let validator = get_validator().map_err(|e| e.to_string())?;

    match validator.iter_errors(card_json).next() {
        None => Ok(()),
        Some(e) => Err(format!("{} at {}", e, e.instance_path)),
    }
}

/// Check whether a card JSON value is structurally valid. Use
/// [`validate_card_schema`] for the violation message.
pub fn is_valid_card(card_json: &serde_json::Value) -> bool {
    get_validator()
        .map(|v| v.is_valid(card_json))
        .unwrap_or(false)
}
