//! Simulation backend trait and built-in state-vector backends

use qexec_sim::ExecutionConfig;
use qexec_state::KernelConfig;
use std::fmt;

/// A way of running kernels on a state vector
///
/// Backends are looked up by name in a [`BackendRegistry`](crate::BackendRegistry).
/// They decide how gates are applied (kernel selection) and whether batched
/// observed-circuit execution is available.
pub trait SimulationBackend: Send + Sync {
    /// Registry key
    fn name(&self) -> &str;

    /// Human-readable summary
    fn description(&self) -> &str;

    /// Whether observed circuits may be run as a shared ansatz plus tails
    fn supports_batching(&self) -> bool {
        true
    }

    /// Kernel selection for a run under `config`
    fn kernel_config(&self, config: &ExecutionConfig) -> KernelConfig;
}

impl fmt::Debug for dyn SimulationBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulationBackend")
            .field("name", &self.name())
            .field("batching", &self.supports_batching())
            .finish()
    }
}

/// Dense state-vector backend
#[derive(Debug, Clone)]
pub struct StateVectorBackend {
    name: String,
    description: String,
    parallel: bool,
    batching: bool,
}

impl StateVectorBackend {
    /// Registry name of the sequential backend
    pub const SEQUENTIAL: &'static str = "statevector";
    /// Registry name of the rayon-parallel backend
    pub const PARALLEL: &'static str = "statevector-parallel";

    pub fn new(name: impl Into<String>, description: impl Into<String>, parallel: bool) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parallel,
            batching: true,
        }
    }

    /// Single-threaded kernels
    pub fn sequential() -> Self {
        Self::new(
            Self::SEQUENTIAL,
            "Dense state vector with sequential kernels",
            false,
        )
    }

    /// Parallel kernels above the configured threshold
    pub fn parallel() -> Self {
        Self::new(
            Self::PARALLEL,
            "Dense state vector with rayon-parallel kernels",
            true,
        )
    }

    /// Disable batched observed-circuit execution
    pub fn without_batching(mut self) -> Self {
        self.batching = false;
        self
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }
}

impl SimulationBackend for StateVectorBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn supports_batching(&self) -> bool {
        self.batching
    }

    fn kernel_config(&self, config: &ExecutionConfig) -> KernelConfig {
        config.kernel_config(self.parallel)
    }
}
