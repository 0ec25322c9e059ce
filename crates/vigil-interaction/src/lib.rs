//! Interaction layer for the Vigil narrative engine.
//!
//! Implements the transport seam against the Gemini REST API (directly
//! or through a forwarding relay) and the two generators built on it:
//! one-shot hero creation and per-turn story continuation.

pub mod continuation;
pub mod gemini;
pub mod hero_generator;
pub mod relay;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

use std::sync::Arc;

use vigil_core::config::ApiConfig;
use vigil_core::transport::GenerationTransport;

pub use continuation::{ContinuationEngine, HISTORY_WINDOW, TURN_TEMPERATURE};
pub use gemini::GeminiTransport;
pub use hero_generator::HeroGenerator;
pub use relay::{RelayTransport, DEFAULT_RELAY_ENDPOINT};

/// Model used when the caller does not pick one.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Builds the transport the config asks for: relayed when `use_proxy`
/// is set, direct otherwise. Both hide behind the same trait; callers
/// never branch on the mode again.
pub fn transport_for(config: &ApiConfig) -> Arc<dyn GenerationTransport> {
    if config.use_proxy {
        Arc::new(RelayTransport::new(config.api_key.clone()))
    } else {
        Arc::new(GeminiTransport::new(config.api_key.clone()))
    }
}
