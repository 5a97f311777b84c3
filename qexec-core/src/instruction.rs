//! Instruction tree: gate leaves and named composites

use crate::walker::{InstructionIter, WalkMode};
use crate::{CoreError, GateKind, Parameter, QubitId, Result};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

fn enabled_by_default() -> bool {
    true
}

/// A single gate application: the leaf of an instruction tree
///
/// # Example
/// ```
/// use qexec_core::{GateInstruction, GateKind, Parameter};
///
/// let rx = GateInstruction::new(GateKind::RotationX, &[0], vec![Parameter::from(0.5)]).unwrap();
/// assert_eq!(rx.angle(0).unwrap(), 0.5);
///
/// // Wrong arity is rejected up front
/// assert!(GateInstruction::new(GateKind::ControlledNot, &[0], vec![]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateInstruction {
    kind: GateKind,
    qubits: SmallVec<[QubitId; 2]>,
    #[serde(default)]
    parameters: Vec<Parameter>,
    #[serde(default = "enabled_by_default")]
    enabled: bool,
}

impl GateInstruction {
    /// Create a gate, checking qubit count, parameter count and distinctness
    pub fn new(kind: GateKind, qubits: &[usize], parameters: Vec<Parameter>) -> Result<Self> {
        let gate = Self {
            kind,
            qubits: qubits.iter().copied().map(QubitId::new).collect(),
            parameters,
            enabled: true,
        };
        gate.check_shape()?;
        Ok(gate)
    }

    /// Gate kind
    #[inline]
    pub fn kind(&self) -> GateKind {
        self.kind
    }

    /// Qubits in gate order (control first for controlled gates)
    #[inline]
    pub fn qubits(&self) -> &[QubitId] {
        &self.qubits
    }

    /// Raw parameters
    #[inline]
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Whether the walker will visit this gate
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Parameter `index` coerced to an angle
    pub fn angle(&self, index: usize) -> Result<f64> {
        let parameter = self.parameters.get(index).ok_or_else(|| {
            CoreError::invalid_parameter_count(
                self.kind.name(),
                self.kind.num_parameters(),
                self.parameters.len(),
            )
        })?;
        parameter.as_f64().ok_or_else(|| CoreError::NonNumericParameter {
            gate: self.kind.name().to_string(),
            index,
            value: parameter.to_string(),
        })
    }

    /// Check arity and qubit distinctness, independent of any register
    pub fn check_shape(&self) -> Result<()> {
        let expected = self.kind.num_qubits();
        if self.qubits.len() != expected {
            return Err(CoreError::invalid_qubit_count(
                self.kind.name(),
                expected,
                self.qubits.len(),
            ));
        }

        let expected = self.kind.num_parameters();
        if self.parameters.len() != expected {
            return Err(CoreError::invalid_parameter_count(
                self.kind.name(),
                expected,
                self.parameters.len(),
            ));
        }

        if let [a, b] = self.qubits.as_slice() {
            if a == b {
                return Err(CoreError::DuplicateQubit(*a));
            }
        }
        Ok(())
    }

    /// Full validation against a register of `num_qubits`
    pub fn validate(&self, num_qubits: usize) -> Result<()> {
        self.check_shape()?;
        self.qubits.iter().try_for_each(|q| q.check(num_qubits))
    }

    /// Highest qubit index touched by this gate
    pub fn max_qubit(&self) -> Option<usize> {
        self.qubits.iter().map(QubitId::index).max()
    }
}

impl fmt::Display for GateInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if !self.parameters.is_empty() {
            write!(f, "(")?;
            for (i, p) in self.parameters.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", p)?;
            }
            write!(f, ")")?;
        }
        for (i, q) in self.qubits.iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            write!(f, "{}{}", sep, q)?;
        }
        Ok(())
    }
}

/// A named, ordered group of instructions
///
/// Composites nest arbitrarily. A disabled composite hides its whole
/// subtree from the walker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Composite {
    name: String,
    #[serde(default)]
    children: Vec<Instruction>,
    #[serde(default = "enabled_by_default")]
    enabled: bool,
}

impl Composite {
    /// Create an empty, enabled composite
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
            enabled: true,
        }
    }

    /// Build a flat composite from a gate sequence
    pub fn from_gates(
        name: impl Into<String>,
        gates: impl IntoIterator<Item = GateInstruction>,
    ) -> Self {
        Self {
            name: name.into(),
            children: gates.into_iter().map(Instruction::Gate).collect(),
            enabled: true,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Direct children
    #[inline]
    pub fn children(&self) -> &[Instruction] {
        &self.children
    }

    #[inline]
    pub fn children_mut(&mut self) -> &mut [Instruction] {
        &mut self.children
    }

    /// Number of direct children
    #[inline]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Append a gate or nested composite
    pub fn push(&mut self, instruction: impl Into<Instruction>) -> &mut Self {
        self.children.push(instruction.into());
        self
    }

    /// Append a gate with numeric parameters
    pub fn add_gate(
        &mut self,
        kind: GateKind,
        qubits: &[usize],
        parameters: &[f64],
    ) -> Result<&mut Self> {
        let parameters = parameters.iter().copied().map(Parameter::Double).collect();
        let gate = GateInstruction::new(kind, qubits, parameters)?;
        Ok(self.push(gate))
    }

    fn push_single(&mut self, kind: GateKind, qubit: usize, parameters: &[f64]) -> &mut Self {
        self.push(GateInstruction {
            kind,
            qubits: smallvec::smallvec![QubitId::new(qubit)],
            parameters: parameters.iter().copied().map(Parameter::Double).collect(),
            enabled: true,
        })
    }

    pub fn identity(&mut self, qubit: usize) -> &mut Self {
        self.push_single(GateKind::Identity, qubit, &[])
    }

    pub fn h(&mut self, qubit: usize) -> &mut Self {
        self.push_single(GateKind::Hadamard, qubit, &[])
    }

    pub fn x(&mut self, qubit: usize) -> &mut Self {
        self.push_single(GateKind::PauliX, qubit, &[])
    }

    pub fn y(&mut self, qubit: usize) -> &mut Self {
        self.push_single(GateKind::PauliY, qubit, &[])
    }

    pub fn z(&mut self, qubit: usize) -> &mut Self {
        self.push_single(GateKind::PauliZ, qubit, &[])
    }

    pub fn rx(&mut self, qubit: usize, theta: f64) -> &mut Self {
        self.push_single(GateKind::RotationX, qubit, &[theta])
    }

    pub fn ry(&mut self, qubit: usize, theta: f64) -> &mut Self {
        self.push_single(GateKind::RotationY, qubit, &[theta])
    }

    pub fn rz(&mut self, qubit: usize, theta: f64) -> &mut Self {
        self.push_single(GateKind::RotationZ, qubit, &[theta])
    }

    /// Generic unitary U(theta, phi, lambda)
    pub fn u(&mut self, qubit: usize, theta: f64, phi: f64, lambda: f64) -> &mut Self {
        self.push_single(GateKind::GenericUnitary, qubit, &[theta, phi, lambda])
    }

    pub fn measure(&mut self, qubit: usize) -> &mut Self {
        self.push_single(GateKind::Measure, qubit, &[])
    }

    pub fn cnot(&mut self, control: usize, target: usize) -> Result<&mut Self> {
        self.add_gate(GateKind::ControlledNot, &[control, target], &[])
    }

    pub fn cz(&mut self, a: usize, b: usize) -> Result<&mut Self> {
        self.add_gate(GateKind::ControlledPhaseFlip, &[a, b], &[])
    }

    pub fn cphase(&mut self, a: usize, b: usize, theta: f64) -> Result<&mut Self> {
        self.add_gate(GateKind::ControlledPhaseShift, &[a, b], &[theta])
    }

    pub fn swap(&mut self, a: usize, b: usize) -> Result<&mut Self> {
        self.add_gate(GateKind::Swap, &[a, b], &[])
    }

    /// Depth-first traversal of the enabled subtree
    pub fn walk(&self, mode: WalkMode) -> InstructionIter<'_> {
        InstructionIter::new(self, mode)
    }

    /// Enabled gate leaves in execution order
    pub fn leaves(&self) -> impl Iterator<Item = &GateInstruction> + '_ {
        self.walk(WalkMode::Leaves).filter_map(Instruction::as_gate)
    }

    /// Owned copy of the enabled leaf sequence
    pub fn flatten(&self) -> Vec<GateInstruction> {
        self.leaves().cloned().collect()
    }

    /// Number of qubits needed to run the enabled leaves
    pub fn required_qubits(&self) -> usize {
        self.leaves()
            .filter_map(GateInstruction::max_qubit)
            .max()
            .map_or(0, |q| q + 1)
    }
}

impl fmt::Display for Composite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}:", self.name)?;
        for gate in self.leaves() {
            writeln!(f, "  {}", gate)?;
        }
        Ok(())
    }
}

/// Node of an instruction tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Instruction {
    Gate(GateInstruction),
    Composite(Composite),
}

impl Instruction {
    pub fn is_enabled(&self) -> bool {
        match self {
            Instruction::Gate(gate) => gate.is_enabled(),
            Instruction::Composite(composite) => composite.is_enabled(),
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        match self {
            Instruction::Gate(gate) => gate.set_enabled(enabled),
            Instruction::Composite(composite) => composite.set_enabled(enabled),
        }
    }

    #[inline]
    pub fn is_composite(&self) -> bool {
        matches!(self, Instruction::Composite(_))
    }

    pub fn as_gate(&self) -> Option<&GateInstruction> {
        match self {
            Instruction::Gate(gate) => Some(gate),
            Instruction::Composite(_) => None,
        }
    }

    pub fn as_composite(&self) -> Option<&Composite> {
        match self {
            Instruction::Gate(_) => None,
            Instruction::Composite(composite) => Some(composite),
        }
    }

    /// Gate name for leaves, composite name otherwise
    pub fn name(&self) -> &str {
        match self {
            Instruction::Gate(gate) => gate.kind().name(),
            Instruction::Composite(composite) => composite.name(),
        }
    }
}

impl From<GateInstruction> for Instruction {
    fn from(gate: GateInstruction) -> Self {
        Instruction::Gate(gate)
    }
}

impl From<Composite> for Instruction {
    fn from(composite: Composite) -> Self {
        Instruction::Composite(composite)
    }
}
