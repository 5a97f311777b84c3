//! Diagonal two-qubit kernels

use super::KernelConfig;
use num_complex::Complex64;
use rayon::prelude::*;

fn for_each_both_set<F>(state: &mut [Complex64], a: usize, b: usize, config: &KernelConfig, op: F)
where
    F: Fn(&mut Complex64) + Send + Sync,
{
    let mask = (1usize << a) | (1usize << b);

    if config.should_parallelize(state.len()) {
        state
            .par_iter_mut()
            .enumerate()
            .filter(|(i, _)| i & mask == mask)
            .for_each(|(_, amp)| op(amp));
    } else {
        state
            .iter_mut()
            .enumerate()
            .filter(|(i, _)| i & mask == mask)
            .for_each(|(_, amp)| op(amp));
    }
}

/// Controlled-Z: negate amplitudes with both qubits set
pub fn apply_controlled_phase_flip(
    state: &mut [Complex64],
    a: usize,
    b: usize,
    config: &KernelConfig,
) {
    for_each_both_set(state, a, b, config, |amp| *amp = -*amp);
}

/// Multiply amplitudes with both qubits set by `phase`
pub fn apply_controlled_phase(
    state: &mut [Complex64],
    a: usize,
    b: usize,
    phase: Complex64,
    config: &KernelConfig,
) {
    for_each_both_set(state, a, b, config, move |amp| *amp *= phase);
}
