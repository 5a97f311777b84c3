//! Error types for the instruction model

use crate::QubitId;
use thiserror::Error;

/// Errors raised while building or validating instructions
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    /// Qubit index outside the register
    #[error("Invalid qubit index {0}: register has only {1} qubits")]
    InvalidQubit(usize, usize),

    /// Gate applied to wrong number of qubits
    #[error("Gate '{gate}' requires {expected} qubits, but {actual} were provided")]
    InvalidQubitCount {
        gate: String,
        expected: usize,
        actual: usize,
    },

    /// Gate given the wrong number of parameters
    #[error("Gate '{gate}' requires {expected} parameters, but {actual} were provided")]
    InvalidParameterCount {
        gate: String,
        expected: usize,
        actual: usize,
    },

    /// A string parameter where an angle was required
    #[error("Gate '{gate}' parameter {index} is not numeric: {value:?}")]
    NonNumericParameter {
        gate: String,
        index: usize,
        value: String,
    },

    /// Duplicate qubit in gate operation
    #[error("Duplicate qubit {0} in gate operation")]
    DuplicateQubit(QubitId),

    /// Gate name not part of the supported set
    #[error("Unknown gate '{0}'")]
    UnknownGate(String),
}

impl CoreError {
    /// Create an invalid qubit error
    pub fn invalid_qubit(qubit: usize, num_qubits: usize) -> Self {
        Self::InvalidQubit(qubit, num_qubits)
    }

    /// Create an invalid qubit count error
    pub fn invalid_qubit_count(gate: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::InvalidQubitCount {
            gate: gate.into(),
            expected,
            actual,
        }
    }

    /// Create an invalid parameter count error
    pub fn invalid_parameter_count(
        gate: impl Into<String>,
        expected: usize,
        actual: usize,
    ) -> Self {
        Self::InvalidParameterCount {
            gate: gate.into(),
            expected,
            actual,
        }
    }
}
