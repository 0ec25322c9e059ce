//! Error types for the Vigil engine.
//!
//! Provides typed, structured error variants shared by every layer, with
//! automatic conversion from common error types via the `From` trait.

use thiserror::Error;

/// A shared error type for the entire Vigil engine.
#[derive(Error, Debug, Clone)]
pub enum VigilError {
    /// The generation backend could not produce text: network failure,
    /// non-success HTTP status, or an empty/missing text payload.
    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    /// The backend returned text, but it did not satisfy the expected
    /// response shape. Names the exact field that failed validation.
    #[error("Schema violation in {shape}: field '{field}' {reason}")]
    SchemaViolation {
        shape: &'static str,
        field: &'static str,
        reason: String,
    },

    /// A caller-side policy rejection: insufficient energy, an action
    /// attempted while a turn is in flight, or a transition that is not
    /// legal in the current session status. Never a backend error.
    #[error("Action rejected: {0}")]
    ActionRejected(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl VigilError {
    /// Creates a GenerationFailed error
    pub fn generation_failed(message: impl Into<String>) -> Self {
        Self::GenerationFailed(message.into())
    }

    /// Creates a SchemaViolation error for a named field
    pub fn schema_violation(
        shape: &'static str,
        field: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        Self::SchemaViolation {
            shape,
            field,
            reason: reason.into(),
        }
    }

    /// Creates an ActionRejected error
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::ActionRejected(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this is a GenerationFailed error
    pub fn is_generation_failed(&self) -> bool {
        matches!(self, Self::GenerationFailed(_))
    }

    /// Check if this is a SchemaViolation error
    pub fn is_schema_violation(&self) -> bool {
        matches!(self, Self::SchemaViolation { .. })
    }

    /// Check if this is an ActionRejected error
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::ActionRejected(_))
    }

    /// True for errors produced by a generation attempt, whether the
    /// transport or the validator caught them. These degrade a turn,
    /// they never crash the session.
    pub fn is_turn_failure(&self) -> bool {
        self.is_generation_failed() || self.is_schema_violation()
    }
}

impl From<std::io::Error> for VigilError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for VigilError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for VigilError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for VigilError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, VigilError>`.
pub type Result<T> = std::result::Result<T, VigilError>;
