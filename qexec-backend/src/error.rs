//! Error types for backend operations

use qexec_core::CoreError;
use qexec_sim::SimError;
use qexec_state::StateError;
use thiserror::Error;

/// Result type for backend operations
pub type Result<T> = std::result::Result<T, BackendError>;

/// Errors that can occur while selecting a backend or executing on it
#[derive(Error, Debug)]
pub enum BackendError {
    /// Failure inside the execution layer
    #[error(transparent)]
    Sim(#[from] SimError),

    /// Registry has nothing to hand out
    #[error("No simulation backends are registered")]
    EmptyRegistry,

    /// Named backend does not exist
    #[error("Backend '{0}' not found")]
    BackendNotFound(String),

    /// Buffer and shared register disagree on qubit count
    #[error("Shared register holds {expected} qubits but the buffer has {actual}")]
    SharedRegisterMismatch { expected: usize, actual: usize },
}

impl From<StateError> for BackendError {
    fn from(err: StateError) -> Self {
        BackendError::Sim(err.into())
    }
}

impl From<CoreError> for BackendError {
    fn from(err: CoreError) -> Self {
        BackendError::Sim(err.into())
    }
}
