//! Hero domain model.
//!
//! The hero is generated once per session by the hero generator and is
//! immutable afterwards. The theme tag governs presentation only.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Biome tag for the hero's starting region. Exactly six fixed values;
/// anything else coming back from the backend is a schema violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dungeon,
    Forest,
    Desert,
    Winter,
    Swamp,
    City,
}

impl Theme {
    pub const ALL: [Theme; 6] = [
        Theme::Dungeon,
        Theme::Forest,
        Theme::Desert,
        Theme::Winter,
        Theme::Swamp,
        Theme::City,
    ];

    /// The wire tag for this theme.
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dungeon => "dungeon",
            Theme::Forest => "forest",
            Theme::Desert => "desert",
            Theme::Winter => "winter",
            Theme::Swamp => "swamp",
            Theme::City => "city",
        }
    }

    /// Parses a wire tag, returning `None` for anything outside the
    /// fixed set.
    pub fn from_tag(tag: &str) -> Option<Theme> {
        Theme::ALL.iter().copied().find(|t| t.as_str() == tag)
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Profile of the hero the observer is bound to.
///
/// Created once at session start and owned exclusively by the active
/// session; discarded wholesale on restart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroProfile {
    /// The hero's name.
    pub name: String,
    /// Profession or role in the hero's former world.
    pub archetype: String,
    /// Temperament, as free text.
    pub personality: String,
    /// How the hero ended up here.
    pub origin: String,
    /// Biome tag for the starting region.
    pub theme: Theme,
    /// Atmospheric description of the place the hero wakes up in.
    pub location_description: String,
    /// Cosmetic coordinate string. Generated client-side, never sourced
    /// from the model.
    pub start_coordinates: String,
}

/// Generates a cosmetic coordinate string as two sexagesimal pairs,
/// e.g. `47°12'N, 3°55'E`.
pub fn random_start_coordinates<R: Rng>(rng: &mut R) -> String {
    format!(
        "{}°{}'N, {}°{}'E",
        rng.gen_range(0..99),
        rng.gen_range(0..60),
        rng.gen_range(0..99),
        rng.gen_range(0..60),
    )
}
