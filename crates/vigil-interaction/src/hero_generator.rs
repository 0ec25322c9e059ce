//! One-shot hero and world creation.

use std::sync::Arc;

use rand::thread_rng;

use vigil_core::error::Result;
use vigil_core::hero::{random_start_coordinates, HeroProfile};
use vigil_core::schema::parse_hero_sheet;
use vigil_core::transport::{GenerationRequest, GenerationTransport, ResponseShape};

const HERO_PROMPT: &str = "\
Generate the profile of an ordinary person (the hero) who has been pulled \
into a grim, dangerous, realistic medieval world.
Return JSON with:
- name: the hero's name
- archetype: their profession or role in their former world
- personality: their temperament
- origin: how they ended up here
- theme: one of 'dungeon' | 'forest' | 'desert' | 'winter' | 'swamp' | 'city'
- locationDescription: an atmospheric description of the place where the hero wakes up";

/// Builds the world + character creation request and produces a hero
/// profile. Called exactly once per session, at creation time.
pub struct HeroGenerator {
    transport: Arc<dyn GenerationTransport>,
    model: String,
}

impl HeroGenerator {
    pub fn new(transport: Arc<dyn GenerationTransport>, model: impl Into<String>) -> Self {
        Self {
            transport,
            model: model.into(),
        }
    }

    /// Generates a hero, or fails with `GenerationFailed`/`SchemaViolation`.
    ///
    /// The start coordinates are cosmetic and attached client-side; the
    /// model is never asked for them.
    pub async fn generate(&self) -> Result<HeroProfile> {
        let raw = self
            .transport
            .generate(GenerationRequest {
                model: self.model.clone(),
                prompt: HERO_PROMPT.to_string(),
                temperature: None,
                shape: ResponseShape::Hero,
            })
            .await?;

        let sheet = parse_hero_sheet(&raw)?;
        tracing::info!(name = %sheet.name, theme = %sheet.theme, "hero generated");

        let coordinates = random_start_coordinates(&mut thread_rng());
        Ok(sheet.into_profile(coordinates))
    }
}
