//! Z-parity expectation values

use num_complex::Complex64;

/// OR of the bit masks of `qubits`
#[inline]
pub(crate) fn parity_mask(qubits: impl IntoIterator<Item = usize>) -> usize {
    qubits.into_iter().fold(0, |mask, q| mask | (1 << q))
}

/// `<Z_{q1} ... Z_{qk}>` for the given qubit set
///
/// Each basis state contributes `+|amp|^2` when an even number of the
/// selected qubits are set and `-|amp|^2` otherwise. The sum runs
/// sequentially in index order, so the result is reproducible. An empty
/// set gives exactly 1.
///
/// Every qubit must address a bit of `state`'s index range. Use
/// [`QuantumRegister::expectation_z`](crate::QuantumRegister::expectation_z)
/// for a checked version.
pub fn expectation_z(state: &[Complex64], qubits: impl IntoIterator<Item = usize>) -> f64 {
    let mask = parity_mask(qubits);
    if mask == 0 {
        return 1.0;
    }
    state
        .iter()
        .enumerate()
        .map(|(i, amp)| {
            let p = amp.norm_sqr();
            if (i & mask).count_ones() % 2 == 0 {
                p
            } else {
                -p
            }
        })
        .sum()
}
