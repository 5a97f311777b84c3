//! Observed-ansatz decomposition
//!
//! Variational workloads submit many circuits that share a long state
//! preparation (the ansatz) and differ only in a short measurement tail
//! (basis changes followed by measurements). Running the shared prefix once
//! and evaluating each tail against a saved copy of the state avoids
//! repeating the expensive part.

use crate::buffer::{ResultBuffer, EXP_VAL_Z};
use crate::dispatcher::Dispatcher;
use crate::error::{Result, SimError};
use qexec_core::{Composite, GateInstruction};
use tracing::debug;

/// Shared ansatz plus one observable tail per submitted circuit
#[derive(Debug, Clone, PartialEq)]
pub struct ObservedAnsatz {
    base: Composite,
    observed: Vec<Composite>,
}

/// Length of the longest measurement-free prefix shared by every sequence
fn common_prefix_len(sequences: &[Vec<GateInstruction>]) -> usize {
    let Some((first, rest)) = sequences.split_first() else {
        return 0;
    };
    first
        .iter()
        .enumerate()
        .take_while(|(i, gate)| {
            !gate.kind().is_measurement() && rest.iter().all(|seq| seq.get(*i) == Some(*gate))
        })
        .count()
}

impl ObservedAnsatz {
    /// Split `circuits` into the shared ansatz and per-circuit observables
    ///
    /// The ansatz is the longest common prefix of the enabled leaf sequences,
    /// stopping before the first measurement. Each observable keeps the name
    /// of the circuit it came from.
    ///
    /// # Errors
    /// Returns error if `circuits` is empty
    ///
    /// # Example
    /// ```
    /// use qexec_core::Composite;
    /// use qexec_sim::ObservedAnsatz;
    ///
    /// let mut z = Composite::new("z");
    /// z.ry(0, 0.5).measure(0);
    /// let mut x = Composite::new("x");
    /// x.ry(0, 0.5).h(0).measure(0);
    ///
    /// let circuits = [z, x];
    /// let ansatz = ObservedAnsatz::from_observed_circuits(&circuits).unwrap();
    /// assert_eq!(ansatz.base().leaves().count(), 1);
    /// assert_eq!(ansatz.observed()[1].leaves().count(), 2);
    /// assert!(ansatz.validate(&circuits));
    /// ```
    pub fn from_observed_circuits(circuits: &[Composite]) -> Result<Self> {
        let first = circuits
            .first()
            .ok_or_else(|| SimError::Decomposition("no circuits to decompose".to_string()))?;

        let sequences: Vec<Vec<GateInstruction>> =
            circuits.iter().map(Composite::flatten).collect();
        let prefix = common_prefix_len(&sequences);

        let base = Composite::from_gates(
            format!("{}-ansatz", first.name()),
            sequences[0][..prefix].iter().cloned(),
        );
        let observed = circuits
            .iter()
            .zip(&sequences)
            .map(|(circuit, seq)| {
                Composite::from_gates(circuit.name(), seq[prefix..].iter().cloned())
            })
            .collect();

        debug!(
            circuits = circuits.len(),
            shared_gates = prefix,
            "decomposed observed circuits"
        );
        Ok(Self { base, observed })
    }

    /// Assemble from explicit parts without any checks
    pub fn from_parts(base: Composite, observed: Vec<Composite>) -> Self {
        Self { base, observed }
    }

    /// The shared preparation
    pub fn base(&self) -> &Composite {
        &self.base
    }

    /// Observable tails, in submission order
    pub fn observed(&self) -> &[Composite] {
        &self.observed
    }

    /// Whether `base` followed by each tail reproduces the matching circuit
    pub fn validate(&self, circuits: &[Composite]) -> bool {
        if circuits.len() != self.observed.len() {
            return false;
        }
        let base = self.base.flatten();
        circuits.iter().zip(&self.observed).all(|(circuit, tail)| {
            let mut rebuilt = base.clone();
            rebuilt.extend(tail.flatten());
            rebuilt == circuit.flatten()
        })
    }

    /// Run the ansatz once and evaluate every observable against it
    ///
    /// Each observable result lands in a child of `parent` named after the
    /// observable, under `exp-val-z`. The register is left in the post-ansatz
    /// state. Returns the values in submission order.
    pub fn execute(
        &self,
        dispatcher: &mut Dispatcher<'_>,
        parent: &mut ResultBuffer,
    ) -> Result<Vec<f64>> {
        dispatcher.run(&self.base, parent)?;

        let mut values = Vec::with_capacity(self.observed.len());
        for observable in &self.observed {
            let value = dispatcher.expectation_value_z(observable)?;
            debug!(observable = observable.name(), value, "evaluated observable");

            let mut child = ResultBuffer::new(observable.name(), parent.size());
            child.add_extra_info(EXP_VAL_Z, value);
            parent.append_child(child);
            values.push(value);
        }
        Ok(values)
    }
}
