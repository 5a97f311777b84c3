//! Quantum register over a dense amplitude vector
//!
//! A [`QuantumRegister`] either owns its amplitudes or borrows a buffer that
//! outlives it. Borrowing lets a caller keep one state alive across several
//! executions without copying it in and out.

use crate::error::{Result, StateError};
use crate::expectation;
use crate::kernels::{self, KernelConfig};
use crate::matrices::{self, Matrix2x2};
use crate::measurement;
use num_complex::Complex64;
use rand::Rng;
use std::fmt;

/// Where the amplitudes of a register live
#[derive(Debug)]
pub enum Amplitudes<'a> {
    /// Allocated and freed with the register
    Exclusive(Vec<Complex64>),
    /// Owned elsewhere; changes persist after the register is dropped
    Shared(&'a mut [Complex64]),
}

impl Amplitudes<'_> {
    #[inline]
    fn as_slice(&self) -> &[Complex64] {
        match self {
            Amplitudes::Exclusive(v) => v,
            Amplitudes::Shared(s) => s,
        }
    }

    #[inline]
    fn as_mut_slice(&mut self) -> &mut [Complex64] {
        match self {
            Amplitudes::Exclusive(v) => v,
            Amplitudes::Shared(s) => s,
        }
    }
}

/// Saved copy of a register's amplitudes
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    amplitudes: Vec<Complex64>,
}

impl Snapshot {
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }
}

fn zero_state(dimension: usize) -> Vec<Complex64> {
    let mut amplitudes = vec![Complex64::new(0.0, 0.0); dimension];
    amplitudes[0] = Complex64::new(1.0, 0.0);
    amplitudes
}

fn qubits_for_dimension(dimension: usize) -> Result<usize> {
    if dimension < 2 || !dimension.is_power_of_two() {
        return Err(StateError::InvalidDimension { dimension });
    }
    Ok(dimension.trailing_zeros() as usize)
}

/// Dense state vector of `2^n` amplitudes
///
/// Bit `k` of an amplitude index is the value of qubit `k`.
///
/// # Example
///
/// ```
/// use qexec_state::QuantumRegister;
///
/// let mut reg = QuantumRegister::new(2).unwrap();
/// reg.hadamard(0).unwrap();
/// reg.controlled_not(0, 1).unwrap();
///
/// // Bell state: perfectly correlated parity
/// assert!((reg.expectation_z([0, 1]).unwrap() - 1.0).abs() < 1e-12);
/// assert!(reg.expectation_z([0]).unwrap().abs() < 1e-12);
/// ```
pub struct QuantumRegister<'a> {
    num_qubits: usize,
    amplitudes: Amplitudes<'a>,
    kernels: KernelConfig,
}

impl QuantumRegister<'static> {
    /// Largest register that can be allocated
    pub const MAX_QUBITS: usize = 30;

    /// Create an exclusive register initialized to |0...0⟩
    ///
    /// # Errors
    /// Returns error if `num_qubits` is zero or above [`Self::MAX_QUBITS`]
    ///
    /// # Example
    /// ```
    /// use qexec_state::QuantumRegister;
    ///
    /// let reg = QuantumRegister::new(3).unwrap();
    /// assert_eq!(reg.dimension(), 8);
    /// assert!(!reg.is_shared());
    /// ```
    pub fn new(num_qubits: usize) -> Result<Self> {
        if num_qubits == 0 {
            return Err(StateError::InvalidDimension { dimension: 1 });
        }
        if num_qubits > Self::MAX_QUBITS {
            return Err(StateError::TooManyQubits {
                num_qubits,
                max: Self::MAX_QUBITS,
            });
        }
        Ok(Self {
            num_qubits,
            amplitudes: Amplitudes::Exclusive(zero_state(1 << num_qubits)),
            kernels: KernelConfig::default(),
        })
    }

    /// Create an exclusive register from explicit amplitudes
    ///
    /// The amplitudes are taken as given; no normalization is applied.
    ///
    /// # Errors
    /// Returns error if the length is not a power of two of at least 2
    pub fn from_amplitudes(amplitudes: Vec<Complex64>) -> Result<Self> {
        let num_qubits = qubits_for_dimension(amplitudes.len())?;
        Ok(Self {
            num_qubits,
            amplitudes: Amplitudes::Exclusive(amplitudes),
            kernels: KernelConfig::default(),
        })
    }
}

impl<'a> QuantumRegister<'a> {
    /// Operate in place on a caller-owned buffer
    ///
    /// Every gate and measurement writes straight into `storage`.
    ///
    /// # Example
    /// ```
    /// use num_complex::Complex64;
    /// use qexec_state::QuantumRegister;
    ///
    /// let mut storage = vec![Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)];
    /// {
    ///     let mut reg = QuantumRegister::shared(&mut storage).unwrap();
    ///     reg.pauli_x(0).unwrap();
    /// }
    /// assert_eq!(storage[1], Complex64::new(1.0, 0.0));
    /// ```
    pub fn shared(storage: &'a mut [Complex64]) -> Result<Self> {
        let num_qubits = qubits_for_dimension(storage.len())?;
        Ok(Self {
            num_qubits,
            amplitudes: Amplitudes::Shared(storage),
            kernels: KernelConfig::default(),
        })
    }

    /// Select sequential or parallel kernels
    pub fn with_kernels(mut self, kernels: KernelConfig) -> Self {
        self.kernels = kernels;
        self
    }

    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Number of amplitudes (2^num_qubits)
    #[inline]
    pub fn dimension(&self) -> usize {
        1 << self.num_qubits
    }

    #[inline]
    pub fn kernels(&self) -> KernelConfig {
        self.kernels
    }

    #[inline]
    pub fn is_shared(&self) -> bool {
        matches!(self.amplitudes, Amplitudes::Shared(_))
    }

    #[inline]
    pub fn amplitudes(&self) -> &[Complex64] {
        self.amplitudes.as_slice()
    }

    #[inline]
    pub fn amplitudes_mut(&mut self) -> &mut [Complex64] {
        self.amplitudes.as_mut_slice()
    }

    /// Owned, independent copy of this register
    pub fn to_exclusive(&self) -> QuantumRegister<'static> {
        QuantumRegister {
            num_qubits: self.num_qubits,
            amplitudes: Amplitudes::Exclusive(self.amplitudes().to_vec()),
            kernels: self.kernels,
        }
    }

    /// Consume the register, returning its amplitudes
    ///
    /// A shared register is copied out; the borrowed buffer is left as is.
    pub fn into_amplitudes(self) -> Vec<Complex64> {
        match self.amplitudes {
            Amplitudes::Exclusive(v) => v,
            Amplitudes::Shared(s) => s.to_vec(),
        }
    }

    /// Sum of squared magnitudes
    pub fn total_probability(&self) -> f64 {
        self.amplitudes().iter().map(|a| a.norm_sqr()).sum()
    }

    /// Whether the total probability is within `epsilon` of 1
    pub fn is_normalized(&self, epsilon: f64) -> bool {
        (self.total_probability() - 1.0).abs() < epsilon
    }

    /// Return to |0...0⟩ without reallocating
    pub fn reset(&mut self) {
        let amplitudes = self.amplitudes_mut();
        amplitudes.fill(Complex64::new(0.0, 0.0));
        amplitudes[0] = Complex64::new(1.0, 0.0);
    }

    /// Overwrite every amplitude
    ///
    /// # Errors
    /// Returns error if `amplitudes` has the wrong length
    pub fn load(&mut self, amplitudes: &[Complex64]) -> Result<()> {
        self.check_dimension(amplitudes.len())?;
        self.amplitudes_mut().copy_from_slice(amplitudes);
        Ok(())
    }

    /// Copy the current amplitudes
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            amplitudes: self.amplitudes().to_vec(),
        }
    }

    /// Write a snapshot back in place
    ///
    /// # Errors
    /// Returns error if the snapshot came from a register of another size
    pub fn restore(&mut self, snapshot: &Snapshot) -> Result<()> {
        self.load(&snapshot.amplitudes)
    }

    fn check_dimension(&self, actual: usize) -> Result<()> {
        if actual != self.dimension() {
            return Err(StateError::DimensionMismatch {
                expected: self.dimension(),
                actual,
            });
        }
        Ok(())
    }

    /// Fail unless `qubit` exists in this register
    pub fn check_qubit(&self, qubit: usize) -> Result<()> {
        if qubit >= self.num_qubits {
            return Err(StateError::invalid_qubit(qubit, self.num_qubits));
        }
        Ok(())
    }

    fn check_pair(&self, a: usize, b: usize) -> Result<()> {
        self.check_qubit(a)?;
        self.check_qubit(b)?;
        if a == b {
            return Err(StateError::DuplicateQubit { qubit: a });
        }
        Ok(())
    }

    // Single-qubit gates

    /// Apply an arbitrary 2x2 matrix to `qubit`
    pub fn apply_single_qubit(&mut self, qubit: usize, matrix: &Matrix2x2) -> Result<()> {
        self.check_qubit(qubit)?;
        let kernels = self.kernels;
        kernels::apply_single_qubit(self.amplitudes_mut(), matrix, qubit, &kernels);
        Ok(())
    }

    pub fn hadamard(&mut self, qubit: usize) -> Result<()> {
        self.apply_single_qubit(qubit, &matrices::HADAMARD)
    }

    pub fn pauli_x(&mut self, qubit: usize) -> Result<()> {
        self.apply_single_qubit(qubit, &matrices::PAULI_X)
    }

    pub fn pauli_y(&mut self, qubit: usize) -> Result<()> {
        self.apply_single_qubit(qubit, &matrices::PAULI_Y)
    }

    pub fn pauli_z(&mut self, qubit: usize) -> Result<()> {
        self.apply_single_qubit(qubit, &matrices::PAULI_Z)
    }

    pub fn rotate_x(&mut self, qubit: usize, theta: f64) -> Result<()> {
        self.apply_single_qubit(qubit, &matrices::rotation_x(theta))
    }

    pub fn rotate_y(&mut self, qubit: usize, theta: f64) -> Result<()> {
        self.apply_single_qubit(qubit, &matrices::rotation_y(theta))
    }

    pub fn rotate_z(&mut self, qubit: usize, theta: f64) -> Result<()> {
        self.apply_single_qubit(qubit, &matrices::rotation_z(theta))
    }

    /// Generic unitary `U(theta, phi, lambda)`
    pub fn unitary(&mut self, qubit: usize, theta: f64, phi: f64, lambda: f64) -> Result<()> {
        self.apply_single_qubit(qubit, &matrices::generic_unitary(theta, phi, lambda))
    }

    // Two-qubit gates

    /// Apply `matrix` to `target` where `control` is |1⟩
    pub fn apply_controlled(
        &mut self,
        control: usize,
        target: usize,
        matrix: &Matrix2x2,
    ) -> Result<()> {
        self.check_pair(control, target)?;
        let kernels = self.kernels;
        kernels::apply_controlled(self.amplitudes_mut(), control, target, matrix, &kernels);
        Ok(())
    }

    pub fn controlled_not(&mut self, control: usize, target: usize) -> Result<()> {
        self.check_pair(control, target)?;
        let kernels = self.kernels;
        kernels::apply_cnot(self.amplitudes_mut(), control, target, &kernels);
        Ok(())
    }

    /// Controlled-Z
    pub fn controlled_phase_flip(&mut self, a: usize, b: usize) -> Result<()> {
        self.check_pair(a, b)?;
        let kernels = self.kernels;
        kernels::apply_controlled_phase_flip(self.amplitudes_mut(), a, b, &kernels);
        Ok(())
    }

    /// Multiply the |11⟩ subspace of `(a, b)` by `e^{i theta}`
    pub fn controlled_phase_shift(&mut self, a: usize, b: usize, theta: f64) -> Result<()> {
        self.check_pair(a, b)?;
        let kernels = self.kernels;
        let phase = matrices::phase(theta);
        kernels::apply_controlled_phase(self.amplitudes_mut(), a, b, phase, &kernels);
        Ok(())
    }

    pub fn swap(&mut self, a: usize, b: usize) -> Result<()> {
        self.check_pair(a, b)?;
        let kernels = self.kernels;
        kernels::apply_swap(self.amplitudes_mut(), a, b, &kernels);
        Ok(())
    }

    // Measurement and observables

    /// Probability that `qubit` reads 1
    pub fn probability_of_one(&self, qubit: usize) -> Result<f64> {
        self.check_qubit(qubit)?;
        Ok(measurement::probability_of_one(self.amplitudes(), qubit))
    }

    /// Measure `qubit` in the computational basis, collapsing the state
    ///
    /// Draws one uniform sample from `rng`. The surviving amplitudes are
    /// renormalized so the register stays a unit vector.
    ///
    /// # Example
    /// ```
    /// use qexec_state::QuantumRegister;
    /// use rand::{rngs::StdRng, SeedableRng};
    ///
    /// let mut rng = StdRng::seed_from_u64(7);
    /// let mut reg = QuantumRegister::new(1).unwrap();
    /// reg.pauli_x(0).unwrap();
    /// assert_eq!(reg.measure(0, &mut rng).unwrap(), 1);
    /// ```
    pub fn measure<R: Rng>(&mut self, qubit: usize, rng: &mut R) -> Result<u8> {
        self.check_qubit(qubit)?;
        let p_one = measurement::probability_of_one(self.amplitudes(), qubit);
        let draw: f64 = rng.gen();
        let (outcome, probability) = measurement::select_outcome(p_one, draw);
        measurement::collapse(self.amplitudes_mut(), qubit, outcome, probability);
        tracing::trace!(qubit, outcome, probability, "collapsed qubit");
        Ok(outcome)
    }

    /// `<Z_{q1} ... Z_{qk}>` over the given qubit set
    ///
    /// Does not modify the register.
    ///
    /// # Errors
    /// Returns error if any qubit is out of range
    pub fn expectation_z(&self, qubits: impl IntoIterator<Item = usize>) -> Result<f64> {
        let qubits: Vec<usize> = qubits.into_iter().collect();
        for &q in &qubits {
            self.check_qubit(q)?;
        }
        Ok(expectation::expectation_z(self.amplitudes(), qubits))
    }

    /// Real parts, index order
    pub fn real_parts(&self) -> Vec<f64> {
        self.amplitudes().iter().map(|a| a.re).collect()
    }

    /// Imaginary parts, index order
    pub fn imag_parts(&self) -> Vec<f64> {
        self.amplitudes().iter().map(|a| a.im).collect()
    }
}

impl fmt::Debug for QuantumRegister<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuantumRegister")
            .field("num_qubits", &self.num_qubits)
            .field("shared", &self.is_shared())
            .field("kernels", &self.kernels)
            .finish()
    }
}

impl fmt::Display for QuantumRegister<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "QuantumRegister({} qubits):", self.num_qubits)?;
        for (i, amp) in self.amplitudes().iter().enumerate() {
            if amp.norm_sqr() > 1e-12 {
                writeln!(
                    f,
                    "  |{:0width$b}⟩: {:.6} + {:.6}i",
                    i,
                    amp.re,
                    amp.im,
                    width = self.num_qubits
                )?;
            }
        }
        Ok(())
    }
}
