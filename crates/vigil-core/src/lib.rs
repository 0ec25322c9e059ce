//! Core domain layer for the Vigil narrative engine.
//!
//! Holds the data model (hero, messages, turns, session aggregate), the
//! energy economy, the defensive schema validator for backend output,
//! the transport seam, and the shared error type. No IO happens in this
//! crate; the interaction and infrastructure layers implement its traits.

pub mod config;
pub mod energy;
pub mod error;
pub mod hero;
pub mod message;
pub mod schema;
pub mod session;
pub mod transport;
pub mod turn;

pub use config::ApiConfig;
pub use energy::{EnergyMeter, DIRECTIVE_COST, MAX_ENERGY, OBSERVE_GAIN, STARTING_ENERGY};
pub use error::{Result, VigilError};
pub use hero::{HeroProfile, Theme};
pub use message::{Message, Sender};
pub use session::{SessionState, SessionStatus};
pub use transport::{GenerationRequest, GenerationTransport, ResponseShape};
pub use turn::TurnResult;
