//! Amplitude update kernels
//!
//! Each kernel has a sequential and a rayon-parallel rendition. The two
//! perform identical arithmetic per amplitude, so results match bit for bit.
//! Kernels assume their qubit arguments were validated by the caller.

pub mod controlled;
pub mod diagonal;
pub mod single_qubit;
pub mod swap;

use num_complex::Complex64;
use rayon::prelude::*;

pub use controlled::{apply_cnot, apply_controlled};
pub use diagonal::{apply_controlled_phase, apply_controlled_phase_flip};
pub use single_qubit::apply_single_qubit;
pub use swap::apply_swap;

/// Default amplitude count above which parallel kernels engage (2^14)
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 1 << 14;

/// Selects between sequential and parallel kernels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernelConfig {
    pub use_parallel: bool,
    /// Minimum number of amplitudes for the parallel path
    pub parallel_threshold: usize,
}

impl KernelConfig {
    /// Always sequential
    pub const fn sequential() -> Self {
        Self {
            use_parallel: false,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }

    /// Parallel for states of at least `parallel_threshold` amplitudes
    pub const fn parallel(parallel_threshold: usize) -> Self {
        Self {
            use_parallel: true,
            parallel_threshold,
        }
    }

    #[inline]
    pub fn should_parallelize(&self, len: usize) -> bool {
        self.use_parallel && len >= self.parallel_threshold
    }
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self::sequential()
    }
}

/// Visit every amplitude pair `(i, i | 1 << target)` with bit `target`
/// clear in `i` and all `control_mask` bits set.
///
/// `control_mask == 0` visits every pair.
pub(crate) fn for_each_pair<F>(
    state: &mut [Complex64],
    target: usize,
    control_mask: usize,
    config: &KernelConfig,
    op: F,
) where
    F: Fn(&mut Complex64, &mut Complex64) + Send + Sync,
{
    let stride = 1usize << target;

    if config.should_parallelize(state.len()) {
        state
            .par_chunks_mut(stride * 2)
            .enumerate()
            .for_each(|(chunk_idx, chunk)| {
                let base = chunk_idx * stride * 2;
                let (low, high) = chunk.split_at_mut(stride);
                for (offset, (a, b)) in low.iter_mut().zip(high.iter_mut()).enumerate() {
                    if (base + offset) & control_mask == control_mask {
                        op(a, b);
                    }
                }
            });
    } else {
        for (chunk_idx, chunk) in state.chunks_mut(stride * 2).enumerate() {
            let base = chunk_idx * stride * 2;
            let (low, high) = chunk.split_at_mut(stride);
            for (offset, (a, b)) in low.iter_mut().zip(high.iter_mut()).enumerate() {
                if (base + offset) & control_mask == control_mask {
                    op(a, b);
                }
            }
        }
    }
}
