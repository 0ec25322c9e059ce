//! Defensive validation of backend output.
//!
//! The response schema sent with each generation request is advisory on
//! the backend side: the model is a free-text generator that is merely
//! asked for JSON. Raw output is therefore re-validated field by field
//! here, and nothing downstream ever touches unvalidated input. Every
//! failure names the exact field that broke the contract.

use serde_json::Value;

use crate::error::{Result, VigilError};
use crate::hero::{HeroProfile, Theme};
use crate::turn::TurnResult;

/// Shape tag for hero creation responses.
pub const HERO_SHAPE: &str = "HeroShape";
/// Shape tag for turn continuation responses.
pub const TURN_SHAPE: &str = "TurnShape";

/// The model-sourced hero fields, before the client-side coordinates are
/// attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeroSheet {
    pub name: String,
    pub archetype: String,
    pub personality: String,
    pub origin: String,
    pub theme: Theme,
    pub location_description: String,
}

impl HeroSheet {
    /// Completes the sheet into a profile with cosmetic coordinates.
    pub fn into_profile(self, start_coordinates: String) -> HeroProfile {
        HeroProfile {
            name: self.name,
            archetype: self.archetype,
            personality: self.personality,
            origin: self.origin,
            theme: self.theme,
            location_description: self.location_description,
            start_coordinates,
        }
    }
}

/// Parses and validates a `HeroShape` response.
///
/// Wire fields are camelCase: `name`, `archetype`, `personality`,
/// `origin`, `theme`, `locationDescription`. All are required non-empty
/// strings; `theme` must be one of the six biome tags.
pub fn parse_hero_sheet(raw: &str) -> Result<HeroSheet> {
    let value = parse_document(raw, HERO_SHAPE)?;
    let theme_tag = require_string(&value, HERO_SHAPE, "theme")?;
    let theme = Theme::from_tag(&theme_tag).ok_or_else(|| {
        VigilError::schema_violation(
            HERO_SHAPE,
            "theme",
            format!("'{}' is not one of the six biome tags", theme_tag),
        )
    })?;

    Ok(HeroSheet {
        name: require_string(&value, HERO_SHAPE, "name")?,
        archetype: require_string(&value, HERO_SHAPE, "archetype")?,
        personality: require_string(&value, HERO_SHAPE, "personality")?,
        origin: require_string(&value, HERO_SHAPE, "origin")?,
        theme,
        location_description: require_string(&value, HERO_SHAPE, "locationDescription")?,
    })
}

/// Parses and validates a `TurnShape` response.
///
/// Wire fields: `diaryEntry` (non-empty string), `isDead` (boolean),
/// `statusDescription` (string).
pub fn parse_turn(raw: &str) -> Result<TurnResult> {
    let value = parse_document(raw, TURN_SHAPE)?;
    Ok(TurnResult {
        diary_entry: require_string(&value, TURN_SHAPE, "diaryEntry")?,
        is_dead: require_bool(&value, TURN_SHAPE, "isDead")?,
        status_description: require_text(&value, TURN_SHAPE, "statusDescription")?,
    })
}

fn parse_document(raw: &str, shape: &'static str) -> Result<Value> {
    let value: Value = serde_json::from_str(raw.trim()).map_err(|e| {
        VigilError::schema_violation(shape, "$", format!("is not valid JSON: {}", e))
    })?;
    if !value.is_object() {
        return Err(VigilError::schema_violation(
            shape,
            "$",
            "is not a JSON object",
        ));
    }
    Ok(value)
}

/// A required string field that may be empty.
fn require_text(value: &Value, shape: &'static str, field: &'static str) -> Result<String> {
    match value.get(field) {
        None => Err(VigilError::schema_violation(shape, field, "is missing")),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(VigilError::schema_violation(
            shape,
            field,
            format!("must be a string, got {}", json_type_name(other)),
        )),
    }
}

/// A required, non-empty string field.
fn require_string(value: &Value, shape: &'static str, field: &'static str) -> Result<String> {
    let text = require_text(value, shape, field)?;
    if text.trim().is_empty() {
        return Err(VigilError::schema_violation(shape, field, "is empty"));
    }
    Ok(text)
}

fn require_bool(value: &Value, shape: &'static str, field: &'static str) -> Result<bool> {
    match value.get(field) {
        None => Err(VigilError::schema_violation(shape, field, "is missing")),
        Some(Value::Bool(b)) => Ok(*b),
        Some(other) => Err(VigilError::schema_violation(
            shape,
            field,
            format!("must be a boolean, got {}", json_type_name(other)),
        )),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
