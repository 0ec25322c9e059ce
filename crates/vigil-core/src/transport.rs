//! The generation transport seam.
//!
//! The backend is reached through a single polymorphic trait with two
//! implementations (direct provider call, forwarding relay) selected by
//! configuration. Implementations are stateless between calls and carry
//! no retry policy; recovery lives in the caller.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::Result;

/// Which response shape the backend is asked to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// World + character creation (`HeroShape`).
    Hero,
    /// Per-turn continuation (`TurnShape`).
    Turn,
}

impl ResponseShape {
    /// Required wire fields for this shape.
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            ResponseShape::Hero => &[
                "name",
                "archetype",
                "personality",
                "origin",
                "theme",
                "locationDescription",
            ],
            ResponseShape::Turn => &["diaryEntry", "isDead", "statusDescription"],
        }
    }

    /// The provider's JSON response-schema descriptor for this shape.
    ///
    /// Best-effort only: the backend treats it as a hint, so the output
    /// is still re-validated by the schema module.
    pub fn schema_descriptor(&self) -> Value {
        match self {
            ResponseShape::Hero => json!({
                "type": "OBJECT",
                "properties": {
                    "name": { "type": "STRING" },
                    "archetype": { "type": "STRING" },
                    "personality": { "type": "STRING" },
                    "origin": { "type": "STRING" },
                    "theme": {
                        "type": "STRING",
                        "enum": ["dungeon", "forest", "desert", "winter", "swamp", "city"]
                    },
                    "locationDescription": { "type": "STRING" }
                },
                "required": self.required_fields()
            }),
            ResponseShape::Turn => json!({
                "type": "OBJECT",
                "properties": {
                    "diaryEntry": { "type": "STRING" },
                    "isDead": { "type": "BOOLEAN" },
                    "statusDescription": { "type": "STRING" }
                },
                "required": self.required_fields()
            }),
        }
    }
}

/// One structured generation request.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Model identifier, e.g. `gemini-2.5-flash`.
    pub model: String,
    /// The full instruction prompt.
    pub prompt: String,
    /// Sampling temperature. `None` leaves the provider default.
    pub temperature: Option<f32>,
    /// The response shape to request.
    pub shape: ResponseShape,
}

/// Sends a generation request to a backend and returns its raw text
/// output.
///
/// All failure modes - network errors, non-success HTTP statuses, or a
/// missing/empty text payload - surface as `GenerationFailed`; relay
/// failures are indistinguishable from provider failures to the caller.
///
/// No timeout is imposed here. An integration that cannot tolerate a
/// hung call should wrap `generate` in its own timeout and treat expiry
/// as a `GenerationFailed`.
#[async_trait]
pub trait GenerationTransport: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> Result<String>;
}
