//! Controlled gate kernels

use super::{for_each_pair, KernelConfig};
use crate::matrices::Matrix2x2;
use num_complex::Complex64;

/// Apply `matrix` to `target` on the subspace where `control` is |1⟩
pub fn apply_controlled(
    state: &mut [Complex64],
    control: usize,
    target: usize,
    matrix: &Matrix2x2,
    config: &KernelConfig,
) {
    let m = *matrix;
    for_each_pair(state, target, 1 << control, config, move |a, b| {
        let (x, y) = (*a, *b);
        *a = m[0][0] * x + m[0][1] * y;
        *b = m[1][0] * x + m[1][1] * y;
    });
}

/// Controlled-NOT as a pure amplitude exchange
pub fn apply_cnot(state: &mut [Complex64], control: usize, target: usize, config: &KernelConfig) {
    for_each_pair(state, target, 1 << control, config, std::mem::swap);
}
