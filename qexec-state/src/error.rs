//! Error types for register operations

use thiserror::Error;

/// Errors that can occur while manipulating a register
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StateError {
    /// Invalid qubit index
    #[error("Invalid qubit index {index} for {num_qubits}-qubit register")]
    InvalidQubitIndex { index: usize, num_qubits: usize },

    /// Two-qubit gate addressed the same qubit twice
    #[error("Qubit {qubit} used as both operands of a two-qubit gate")]
    DuplicateQubit { qubit: usize },

    /// Invalid state dimension
    #[error("Invalid state dimension {dimension}, expected a power of 2 of at least 2")]
    InvalidDimension { dimension: usize },

    /// Dimension mismatch
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Register would not fit in memory
    #[error("Register of {num_qubits} qubits exceeds the supported maximum of {max}")]
    TooManyQubits { num_qubits: usize, max: usize },
}

impl StateError {
    pub fn invalid_qubit(index: usize, num_qubits: usize) -> Self {
        Self::InvalidQubitIndex { index, num_qubits }
    }
}

/// Result type for register operations
pub type Result<T> = std::result::Result<T, StateError>;
