//! Single-qubit gate kernel

use super::{for_each_pair, KernelConfig};
use crate::matrices::Matrix2x2;
use num_complex::Complex64;

/// Apply a 2x2 unitary to `qubit`
pub fn apply_single_qubit(
    state: &mut [Complex64],
    matrix: &Matrix2x2,
    qubit: usize,
    config: &KernelConfig,
) {
    let m = *matrix;
    for_each_pair(state, qubit, 0, config, move |a, b| {
        let (x, y) = (*a, *b);
        *a = m[0][0] * x + m[0][1] * y;
        *b = m[1][0] * x + m[1][1] * y;
    });
}
