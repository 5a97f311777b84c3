//! Qubit exchange kernel

use super::KernelConfig;
use num_complex::Complex64;
use rayon::prelude::*;

/// Exchange qubits `a` and `b`
///
/// Swaps each amplitude whose bits `(a, b)` read `(1, 0)` with its `(0, 1)`
/// partner. No arithmetic is performed.
pub fn apply_swap(state: &mut [Complex64], a: usize, b: usize, config: &KernelConfig) {
    let (lo, hi) = if a < b { (a, b) } else { (b, a) };
    let lo_mask = 1usize << lo;
    let hi_stride = 1usize << hi;

    // Within a chunk of 2 * hi_stride, `low` has bit hi clear and `high` has
    // it set. low[k] with bit lo set pairs with high[k - lo_stride].
    let swap_in_chunk = |(chunk_idx, chunk): (usize, &mut [Complex64])| {
        let base = chunk_idx * hi_stride * 2;
        let (low, high) = chunk.split_at_mut(hi_stride);
        for offset in 0..hi_stride {
            if (base + offset) & lo_mask != 0 {
                std::mem::swap(&mut low[offset], &mut high[offset - lo_mask]);
            }
        }
    };

    if config.should_parallelize(state.len()) {
        state
            .par_chunks_mut(hi_stride * 2)
            .enumerate()
            .for_each(swap_in_chunk);
    } else {
        state
            .chunks_mut(hi_stride * 2)
            .enumerate()
            .for_each(swap_in_chunk);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::test_support::scrambled_state;

    #[test]
    fn test_swap_moves_basis_state() {
        let mut state = vec![Complex64::new(0.0, 0.0); 8];
        state[0b001] = Complex64::new(1.0, 0.0);
        apply_swap(&mut state, 0, 2, &KernelConfig::sequential());
        assert_eq!(state[0b100], Complex64::new(1.0, 0.0));
        assert_eq!(state[0b001], Complex64::new(0.0, 0.0));
    }

    #[test]
    fn test_swap_is_involution() {
        let original = scrambled_state(4);
        let mut state = original.clone();
        apply_swap(&mut state, 3, 1, &KernelConfig::sequential());
        assert_ne!(state, original);
        apply_swap(&mut state, 1, 3, &KernelConfig::sequential());
        assert_eq!(state, original);
    }

    #[test]
    fn test_parallel_swap_matches_sequential() {
        let mut seq = scrambled_state(5);
        let mut par = seq.clone();
        apply_swap(&mut seq, 0, 4, &KernelConfig::sequential());
        apply_swap(&mut par, 0, 4, &KernelConfig::parallel(1));
        assert_eq!(seq, par);
    }
}
