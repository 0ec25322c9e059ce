//! Session aggregate.
//!
//! This is the "pure" model the lifecycle state machine operates on: the
//! enumerated status, the append-only message log, the current hero, and
//! the energy meter. It is mutated only through named transitions on the
//! game session, never through ad-hoc field writes from presentation
//! code.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::energy::EnergyMeter;
use crate::hero::HeroProfile;
use crate::message::{Message, Sender};

/// Lifecycle status of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    /// No session yet; waiting for config and a start request.
    Menu,
    /// Hero generation in progress.
    Searching,
    /// Hero generated; waiting for the observer to confirm the location.
    LocationPreview,
    /// Turns may be taken.
    Active,
    /// Terminal for interaction, except for the restart escape.
    HeroDead,
}

/// The aggregate root for one session.
///
/// Exactly one instance is live at a time; it is replaced wholesale on
/// restart. The log and hero are only ever reset together, keeping the
/// pair consistent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub status: SessionStatus,
    pub messages: Vec<Message>,
    pub current_hero: Option<HeroProfile>,
    pub energy: EnergyMeter,
}

impl SessionState {
    /// A fresh menu-stage session: empty log, no hero, starting energy.
    pub fn new() -> Self {
        Self {
            status: SessionStatus::Menu,
            messages: Vec::new(),
            current_hero: None,
            energy: EnergyMeter::new(),
        }
    }

    /// Resets for a (re)start: clears the log, drops the hero, resets
    /// energy, and enters `Searching`. The only way log and hero are
    /// replaced, and they are always replaced together.
    pub fn reset_for_search(&mut self) {
        self.status = SessionStatus::Searching;
        self.messages.clear();
        self.current_hero = None;
        self.energy = EnergyMeter::new();
    }

    /// Appends a log entry and returns its id.
    pub fn push(&mut self, sender: Sender, content: impl Into<String>) -> Uuid {
        let message = Message::new(sender, content);
        let id = message.id;
        self.messages.push(message);
        id
    }

    /// The hero, if the current status requires one.
    pub fn hero(&self) -> Option<&HeroProfile> {
        self.current_hero.as_ref()
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
