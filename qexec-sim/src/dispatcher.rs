//! Gate dispatch onto a register
//!
//! The [`Dispatcher`] walks an instruction tree and applies each enabled
//! gate to its register. It also tracks which qubits have been measured in
//! the current execution, since expectation values are taken over exactly
//! that set.

use crate::buffer::{ResultBuffer, EXP_VAL_Z, STATEVECT_IMAG, STATEVECT_REAL};
use crate::config::ExecutionConfig;
use crate::error::{Result, SimError};
use qexec_core::{Composite, GateInstruction, GateKind, Instruction, WalkMode};
use qexec_state::QuantumRegister;
use rand::rngs::StdRng;
use std::collections::BTreeSet;
use tracing::{debug, info, trace};

/// Nominal cost of a single-qubit gate, in seconds
pub const SINGLE_QUBIT_GATE_TIME: f64 = 1e-8;
/// Nominal cost of a two-qubit gate, in seconds
pub const TWO_QUBIT_GATE_TIME: f64 = 1e-7;

/// Applies gates from an instruction tree to one register
pub struct Dispatcher<'a> {
    register: QuantumRegister<'a>,
    rng: StdRng,
    measured: BTreeSet<usize>,
    verbose: bool,
    diagnostics: bool,
    record_expectation: bool,
    exec_time: f64,
}

impl<'a> Dispatcher<'a> {
    /// Start a fresh execution on `register`
    ///
    /// Per-measurement expectation values are recorded unless `config`
    /// asks for shot sampling.
    pub fn new(register: QuantumRegister<'a>, config: &ExecutionConfig, rng: StdRng) -> Self {
        Self {
            register,
            rng,
            measured: BTreeSet::new(),
            verbose: config.verbose,
            diagnostics: config.diagnostics,
            record_expectation: config.shots.is_none(),
            exec_time: 0.0,
        }
    }

    pub fn register(&self) -> &QuantumRegister<'a> {
        &self.register
    }

    /// Qubits measured so far in this execution
    pub fn measured_qubits(&self) -> &BTreeSet<usize> {
        &self.measured
    }

    /// Accumulated nominal gate time in seconds
    pub fn exec_time(&self) -> f64 {
        self.exec_time
    }

    /// Hand back the random source for the next execution
    pub fn into_rng(self) -> StdRng {
        self.rng
    }

    pub fn into_register(self) -> QuantumRegister<'a> {
        self.register
    }

    /// Execute every enabled leaf of `kernel` in order
    pub fn run(&mut self, kernel: &Composite, buffer: &mut ResultBuffer) -> Result<()> {
        debug!(
            kernel = kernel.name(),
            qubits = self.register.num_qubits(),
            shared = self.register.is_shared(),
            "executing kernel"
        );
        for instruction in kernel.walk(WalkMode::All) {
            match instruction {
                Instruction::Composite(composite) => {
                    trace!(composite = composite.name(), "entering composite")
                }
                Instruction::Gate(gate) => self.apply(gate, buffer)?,
            }
        }
        Ok(())
    }

    /// Apply one gate, measurements included
    pub fn apply(&mut self, gate: &GateInstruction, buffer: &mut ResultBuffer) -> Result<()> {
        if gate.kind().is_measurement() {
            self.measure(gate, buffer)?;
        } else {
            self.apply_unitary(gate)?;
        }

        if self.diagnostics {
            buffer.add_extra_info(STATEVECT_REAL, self.register.real_parts());
            buffer.add_extra_info(STATEVECT_IMAG, self.register.imag_parts());
        }
        Ok(())
    }

    fn measure(&mut self, gate: &GateInstruction, buffer: &mut ResultBuffer) -> Result<()> {
        gate.validate(self.register.num_qubits())?;
        let qubit = gate.qubits()[0].index();
        self.measured.insert(qubit);

        // Taken before collapse, over every qubit measured so far
        if self.record_expectation {
            let value = self.register.expectation_z(self.measured.iter().copied())?;
            buffer.add_extra_info(EXP_VAL_Z, value);
        }

        let outcome = self.register.measure(qubit, &mut self.rng)?;
        buffer.measure(qubit, outcome);
        self.log_gate(gate);
        Ok(())
    }

    /// Apply a non-measurement gate
    ///
    /// The gate is validated against the register before any amplitude is
    /// touched.
    pub fn apply_unitary(&mut self, gate: &GateInstruction) -> Result<()> {
        gate.validate(self.register.num_qubits())?;
        let q = |i: usize| gate.qubits()[i].index();
        let reg = &mut self.register;

        match gate.kind() {
            GateKind::Identity => {}
            GateKind::Hadamard => reg.hadamard(q(0))?,
            GateKind::PauliX => reg.pauli_x(q(0))?,
            GateKind::PauliY => reg.pauli_y(q(0))?,
            GateKind::PauliZ => reg.pauli_z(q(0))?,
            GateKind::RotationX => reg.rotate_x(q(0), gate.angle(0)?)?,
            GateKind::RotationY => reg.rotate_y(q(0), gate.angle(0)?)?,
            GateKind::RotationZ => reg.rotate_z(q(0), gate.angle(0)?)?,
            GateKind::GenericUnitary => {
                reg.unitary(q(0), gate.angle(0)?, gate.angle(1)?, gate.angle(2)?)?
            }
            GateKind::ControlledNot => reg.controlled_not(q(0), q(1))?,
            GateKind::ControlledPhaseFlip => reg.controlled_phase_flip(q(0), q(1))?,
            GateKind::ControlledPhaseShift => {
                reg.controlled_phase_shift(q(0), q(1), gate.angle(0)?)?
            }
            GateKind::Swap => reg.swap(q(0), q(1))?,
            GateKind::Measure => {
                return Err(SimError::InvalidCircuit(format!(
                    "'{}' cannot be applied as a unitary",
                    gate
                )))
            }
        }

        self.exec_time += match gate.kind() {
            GateKind::Identity => 0.0,
            kind if kind.num_qubits() == 2 => TWO_QUBIT_GATE_TIME,
            _ => SINGLE_QUBIT_GATE_TIME,
        };
        self.log_gate(gate);
        Ok(())
    }

    fn log_gate(&self, gate: &GateInstruction) {
        if self.verbose {
            info!(gate = %gate, "applied gate");
        } else {
            trace!(gate = %gate, "applied gate");
        }
    }

    /// `<Z...Z>` after running `observable` on top of the current state
    ///
    /// Non-measurement gates of `observable` are applied and its measured
    /// qubits form the parity set. The register is restored afterwards,
    /// also when the observable fails part way.
    pub fn expectation_value_z(&mut self, observable: &Composite) -> Result<f64> {
        let snapshot = self.register.snapshot();
        let outcome = self.observe(observable);
        self.register.restore(&snapshot)?;
        outcome
    }

    fn observe(&mut self, observable: &Composite) -> Result<f64> {
        let mut measured = BTreeSet::new();
        for gate in observable.leaves() {
            if gate.kind().is_measurement() {
                gate.validate(self.register.num_qubits())?;
                measured.insert(gate.qubits()[0].index());
            } else {
                self.apply_unitary(gate)?;
            }
        }
        Ok(self.register.expectation_z(measured)?)
    }
}
