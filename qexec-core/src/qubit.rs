//! Qubit addressing

use serde::{Deserialize, Serialize};
use std::fmt;

/// Type-safe identifier for a qubit
///
/// Qubit `k` corresponds to bit `k` of a state-vector index, so qubit 0 is
/// the least significant bit.
///
/// # Example
/// ```
/// use qexec_core::QubitId;
///
/// let q2 = QubitId::new(2);
/// assert_eq!(q2.mask(), 0b100);
/// assert!(q2.check(3).is_ok());
/// assert!(q2.check(2).is_err());
/// ```
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QubitId(usize);

impl QubitId {
    /// Create a new qubit identifier
    #[inline]
    pub const fn new(id: usize) -> Self {
        Self(id)
    }

    /// Get the underlying index
    #[inline]
    pub const fn index(&self) -> usize {
        self.0
    }

    /// Bit mask selecting this qubit in a basis-state index
    #[inline]
    pub const fn mask(&self) -> usize {
        1 << self.0
    }

    /// Fail unless this qubit exists in a register of `num_qubits`
    pub fn check(&self, num_qubits: usize) -> crate::Result<()> {
        if self.0 < num_qubits {
            Ok(())
        } else {
            Err(crate::CoreError::invalid_qubit(self.0, num_qubits))
        }
    }
}

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<usize> for QubitId {
    #[inline]
    fn from(id: usize) -> Self {
        Self::new(id)
    }
}

impl From<QubitId> for usize {
    #[inline]
    fn from(qid: QubitId) -> Self {
        qid.index()
    }
}
