//! Error types for the simulator layer

use qexec_core::CoreError;
use qexec_state::StateError;
use thiserror::Error;

/// Errors that can occur while configuring or running a simulation
#[derive(Debug, Error)]
pub enum SimError {
    /// Malformed instruction
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Register rejected an operation
    #[error(transparent)]
    State(#[from] StateError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Circuit cannot be executed as given
    #[error("Invalid circuit: {0}")]
    InvalidCircuit(String),

    /// Observed circuits could not be split into ansatz and observables
    #[error("Cannot decompose observed circuits: {0}")]
    Decomposition(String),

    /// JSON encoding or decoding failed
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SimError {
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}

/// Result type for simulator operations
pub type Result<T> = std::result::Result<T, SimError>;
