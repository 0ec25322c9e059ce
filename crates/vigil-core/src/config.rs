//! Transport configuration.

use serde::{Deserialize, Serialize};

/// Credentials and mode for the generation transport.
///
/// Supplied by the persistent config store at menu load, written back on
/// session start, and immutable for the duration of a session. Every
/// transport invocation requires one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Opaque API key, forwarded to the provider (direct mode) or to the
    /// relay (relayed mode).
    pub api_key: String,
    /// Selects the relayed transport instead of the direct one.
    #[serde(default)]
    pub use_proxy: bool,
}

impl ApiConfig {
    pub fn new(api_key: impl Into<String>, use_proxy: bool) -> Self {
        Self {
            api_key: api_key.into(),
            use_proxy,
        }
    }
}
