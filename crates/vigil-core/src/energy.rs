//! The observer's energy economy.
//!
//! A bounded resource couples narrative agency to a cost: directives are
//! expensive, passive observation replenishes. This prevents unbounded
//! directive spam without any backend-side rate limiting.

use serde::{Deserialize, Serialize};

use crate::error::{Result, VigilError};

/// Upper bound of the energy meter.
pub const MAX_ENERGY: u8 = 100;
/// Energy at session (re)start.
pub const STARTING_ENERGY: u8 = 50;
/// Cost of issuing a directive.
pub const DIRECTIVE_COST: u8 = 35;
/// Replenishment for one passive observation turn.
pub const OBSERVE_GAIN: u8 = 15;

/// An integer resource in `[0, 100]`.
///
/// The affordability gate is advisory: callers must check `can_afford`
/// before `spend`, which refuses (rather than clamps) an overdraw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnergyMeter(u8);

impl EnergyMeter {
    /// Creates a meter at the session starting level.
    pub fn new() -> Self {
        Self(STARTING_ENERGY)
    }

    /// Current level.
    pub fn value(&self) -> u8 {
        self.0
    }

    /// True iff the current level covers `cost`.
    pub fn can_afford(&self, cost: u8) -> bool {
        self.0 >= cost
    }

    /// Deducts `cost`. Only legal after `can_afford` passed; an overdraw
    /// is rejected without mutating the meter.
    pub fn spend(&mut self, cost: u8) -> Result<()> {
        if !self.can_afford(cost) {
            return Err(VigilError::rejected(format!(
                "insufficient energy: have {}, need {}",
                self.0, cost
            )));
        }
        self.0 -= cost;
        Ok(())
    }

    /// Adds `amount`, clamped to the ceiling.
    pub fn gain(&mut self, amount: u8) {
        self.0 = self.0.saturating_add(amount).min(MAX_ENERGY);
    }
}

impl Default for EnergyMeter {
    fn default() -> Self {
        Self::new()
    }
}
