//! Application layer for the Vigil narrative engine.
//!
//! Hosts the game lifecycle state machine that orchestrates hero
//! generation, continuation turns, the energy economy, and the message
//! log into one session.

pub mod game;
mod game_test;

pub use game::{GameSession, TransportFactory, TurnOutcome};
