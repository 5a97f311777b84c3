//! The closed gate set and gate parameters

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Every operation the engine knows how to apply
///
/// The set is closed: dispatch over it is an exhaustive `match`, so adding
/// a variant forces every consumer to handle it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateKind {
    Identity,
    Hadamard,
    PauliX,
    PauliY,
    PauliZ,
    RotationX,
    RotationY,
    RotationZ,
    /// Generic single-qubit unitary U(theta, phi, lambda)
    GenericUnitary,
    ControlledNot,
    /// Controlled-Z
    ControlledPhaseFlip,
    /// Controlled phase shift by an angle
    ControlledPhaseShift,
    Swap,
    Measure,
}

impl GateKind {
    /// All supported gate kinds
    pub const ALL: [GateKind; 14] = [
        GateKind::Identity,
        GateKind::Hadamard,
        GateKind::PauliX,
        GateKind::PauliY,
        GateKind::PauliZ,
        GateKind::RotationX,
        GateKind::RotationY,
        GateKind::RotationZ,
        GateKind::GenericUnitary,
        GateKind::ControlledNot,
        GateKind::ControlledPhaseFlip,
        GateKind::ControlledPhaseShift,
        GateKind::Swap,
        GateKind::Measure,
    ];

    /// Short conventional name
    pub const fn name(self) -> &'static str {
        match self {
            GateKind::Identity => "I",
            GateKind::Hadamard => "H",
            GateKind::PauliX => "X",
            GateKind::PauliY => "Y",
            GateKind::PauliZ => "Z",
            GateKind::RotationX => "Rx",
            GateKind::RotationY => "Ry",
            GateKind::RotationZ => "Rz",
            GateKind::GenericUnitary => "U",
            GateKind::ControlledNot => "CNOT",
            GateKind::ControlledPhaseFlip => "CZ",
            GateKind::ControlledPhaseShift => "CPhase",
            GateKind::Swap => "Swap",
            GateKind::Measure => "Measure",
        }
    }

    /// Number of qubits the gate acts on
    pub const fn num_qubits(self) -> usize {
        match self {
            GateKind::ControlledNot
            | GateKind::ControlledPhaseFlip
            | GateKind::ControlledPhaseShift
            | GateKind::Swap => 2,
            _ => 1,
        }
    }

    /// Number of angle parameters the gate takes
    pub const fn num_parameters(self) -> usize {
        match self {
            GateKind::RotationX
            | GateKind::RotationY
            | GateKind::RotationZ
            | GateKind::ControlledPhaseShift => 1,
            GateKind::GenericUnitary => 3,
            _ => 0,
        }
    }

    /// Whether the gate is a measurement rather than a unitary
    pub const fn is_measurement(self) -> bool {
        matches!(self, GateKind::Measure)
    }

    /// Look up a gate by name, ignoring case
    ///
    /// Accepts the names returned by [`GateKind::name`] plus a few
    /// common aliases (`CX`, `CPHASE`, `MEASZ`).
    ///
    /// # Example
    /// ```
    /// use qexec_core::GateKind;
    /// assert_eq!(GateKind::from_name("cx"), Some(GateKind::ControlledNot));
    /// assert_eq!(GateKind::from_name("toffoli"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Self> {
        let upper = name.to_ascii_uppercase();
        let kind = match upper.as_str() {
            "I" | "ID" | "IDENTITY" => GateKind::Identity,
            "H" | "HADAMARD" => GateKind::Hadamard,
            "X" => GateKind::PauliX,
            "Y" => GateKind::PauliY,
            "Z" => GateKind::PauliZ,
            "RX" => GateKind::RotationX,
            "RY" => GateKind::RotationY,
            "RZ" => GateKind::RotationZ,
            "U" | "U3" => GateKind::GenericUnitary,
            "CNOT" | "CX" => GateKind::ControlledNot,
            "CZ" => GateKind::ControlledPhaseFlip,
            "CPHASE" | "CP" => GateKind::ControlledPhaseShift,
            "SWAP" => GateKind::Swap,
            "MEASURE" | "MEASZ" => GateKind::Measure,
            _ => return None,
        };
        Some(kind)
    }
}

impl FromStr for GateKind {
    type Err = CoreError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::from_name(name).ok_or_else(|| CoreError::UnknownGate(name.to_string()))
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A gate argument as it arrives from the caller
///
/// Integers and doubles are both accepted as angles. Strings are carried
/// through the tree but cannot be applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Parameter {
    Int(i64),
    Double(f64),
    Str(String),
}

impl Parameter {
    /// Numeric value, if the parameter has one
    ///
    /// # Example
    /// ```
    /// use qexec_core::Parameter;
    /// assert_eq!(Parameter::Int(2).as_f64(), Some(2.0));
    /// assert_eq!(Parameter::from("theta").as_f64(), None);
    /// ```
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Parameter::Int(value) => Some(*value as f64),
            Parameter::Double(value) => Some(*value),
            Parameter::Str(_) => None,
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parameter::Int(value) => write!(f, "{}", value),
            Parameter::Double(value) => write!(f, "{:.4}", value),
            Parameter::Str(value) => f.write_str(value),
        }
    }
}

impl From<f64> for Parameter {
    fn from(value: f64) -> Self {
        Parameter::Double(value)
    }
}

impl From<i64> for Parameter {
    fn from(value: i64) -> Self {
        Parameter::Int(value)
    }
}

impl From<i32> for Parameter {
    fn from(value: i32) -> Self {
        Parameter::Int(i64::from(value))
    }
}

impl From<&str> for Parameter {
    fn from(value: &str) -> Self {
        Parameter::Str(value.to_string())
    }
}

impl From<String> for Parameter {
    fn from(value: String) -> Self {
        Parameter::Str(value)
    }
}
