//! Accelerator front end
//!
//! The [`Accelerator`] is what callers talk to. It owns the configuration,
//! the selected backend and, optionally, a persistent register shared
//! across executions. It decides per call whether to run kernels one by one
//! or as a batch of observed circuits over a shared ansatz.

use crate::backend::SimulationBackend;
use crate::registry::BackendRegistry;
use crate::{BackendError, Result};
use num_complex::Complex64;
use qexec_core::Composite;
use qexec_sim::{
    keys, Dispatcher, ExecutionConfig, ExtraInfo, ObservedAnsatz, Options, ResultBuffer,
};
use qexec_state::{KernelConfig, QuantumRegister};
use rand::rngs::StdRng;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Key of the backend name in [`Accelerator::execution_info`]
pub const INFO_BACKEND: &str = "backend";
/// Key of the nominal execution time in [`Accelerator::execution_info`]
pub const INFO_EXEC_TIME: &str = "exec-time";

fn zero_state(num_qubits: usize) -> Result<Vec<Complex64>> {
    Ok(QuantumRegister::new(num_qubits)?.into_amplitudes())
}

/// Register for one execution
///
/// With a shared register configured, runs in place on it (or on a copy in
/// repeated-measurement mode). Otherwise allocates a fresh |0...0⟩.
fn acquire_register<'s>(
    shared: &'s mut Option<Vec<Complex64>>,
    config: &ExecutionConfig,
    num_qubits: usize,
    kernels: KernelConfig,
) -> Result<QuantumRegister<'s>> {
    let register = match shared.as_mut() {
        Some(storage) => {
            let expected = storage.len().trailing_zeros() as usize;
            if expected != num_qubits {
                return Err(BackendError::SharedRegisterMismatch {
                    expected,
                    actual: num_qubits,
                });
            }
            if config.repeated_measurement {
                QuantumRegister::from_amplitudes(storage.clone())?
            } else {
                QuantumRegister::shared(storage)?
            }
        }
        None => QuantumRegister::new(num_qubits)?,
    };
    Ok(register.with_kernels(kernels))
}

/// Entry point for running kernels
///
/// # Example
/// ```
/// use qexec_backend::Accelerator;
/// use qexec_core::Composite;
/// use qexec_sim::{Options, ResultBuffer};
///
/// let mut acc = Accelerator::new().unwrap();
/// acc.initialize(&Options::new().with("seed", 3)).unwrap();
///
/// let mut kernel = Composite::new("flip");
/// kernel.x(1).measure(1);
///
/// let mut buffer = ResultBuffer::new("run", 2);
/// acc.execute(&mut buffer, &kernel).unwrap();
/// assert_eq!(buffer.measurement(1), Some(1));
/// assert_eq!(buffer.expectation_value_z(), Some(-1.0));
/// ```
pub struct Accelerator {
    registry: Arc<BackendRegistry>,
    backend: Arc<dyn SimulationBackend>,
    config: ExecutionConfig,
    shared: Option<Vec<Complex64>>,
    exec_time: f64,
}

impl Accelerator {
    /// Accelerator over the built-in backends with default configuration
    pub fn new() -> Result<Self> {
        Self::with_registry(Arc::new(BackendRegistry::with_defaults()))
    }

    /// Accelerator over a caller-supplied registry
    pub fn with_registry(registry: Arc<BackendRegistry>) -> Result<Self> {
        let backend = registry.default_backend()?;
        Ok(Self {
            registry,
            backend,
            config: ExecutionConfig::default(),
            shared: None,
            exec_time: 0.0,
        })
    }

    /// Replace the whole configuration
    ///
    /// Starts from defaults, applies `options` and drops any shared register
    /// unless `options` sets `qubit-count`.
    pub fn initialize(&mut self, options: &Options) -> Result<()> {
        let config = ExecutionConfig::from_options(options)?;
        self.apply_config(config)
    }

    /// Overlay `options` on the current configuration
    ///
    /// Setting `qubit-count` (re)allocates the shared register in |0...0⟩.
    pub fn update_configuration(&mut self, options: &Options) -> Result<()> {
        let mut config = self.config.clone();
        config.merge_options(options)?;
        let reallocate = options.contains_key(keys::QUBIT_COUNT);
        self.switch_config(config, reallocate)
    }

    /// Use an already validated configuration
    pub fn apply_config(&mut self, config: ExecutionConfig) -> Result<()> {
        config.validate()?;
        self.switch_config(config, true)
    }

    fn switch_config(&mut self, config: ExecutionConfig, reallocate: bool) -> Result<()> {
        let backend = match config.backend.as_deref() {
            Some(name) => self.registry.resolve(name)?,
            None => self.registry.default_backend()?,
        };
        let shared = match config.qubit_count {
            Some(n) if reallocate => Some(zero_state(n)?),
            Some(_) => self.shared.take(),
            None => None,
        };

        debug!(
            backend = backend.name(),
            shots = ?config.shots,
            vqe_mode = config.vqe_mode,
            shared_qubits = ?config.qubit_count,
            "configured accelerator"
        );
        self.backend = backend;
        self.config = config;
        self.shared = shared;
        Ok(())
    }

    pub fn config(&self) -> &ExecutionConfig {
        &self.config
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Amplitudes of the shared register, if one is configured
    pub fn shared_state(&self) -> Option<&[Complex64]> {
        self.shared.as_deref()
    }

    /// Install `amplitudes` as the shared register
    ///
    /// Sets `qubit-count` to match. The amplitudes are used as given.
    pub fn set_shared_state(&mut self, amplitudes: Vec<Complex64>) -> Result<()> {
        let register = QuantumRegister::from_amplitudes(amplitudes)?;
        self.config.qubit_count = Some(register.num_qubits());
        self.shared = Some(register.into_amplitudes());
        Ok(())
    }

    /// Return the shared register to |0...0⟩
    pub fn reset_shared_state(&mut self) {
        if let Some(storage) = self.shared.as_mut() {
            storage.fill(Complex64::new(0.0, 0.0));
            if let Some(first) = storage.first_mut() {
                *first = Complex64::new(1.0, 0.0);
            }
        }
    }

    /// Drop the shared register; later runs allocate fresh registers
    pub fn release_shared_state(&mut self) {
        self.shared = None;
        self.config.qubit_count = None;
    }

    /// Run one kernel into `buffer`
    ///
    /// Without shots the kernel runs once and each measurement records the
    /// current `exp-val-z`. With shots the kernel is re-run per shot on a
    /// fresh copy of the initial state and bitstring counts are accumulated.
    pub fn execute(&mut self, buffer: &mut ResultBuffer, kernel: &Composite) -> Result<()> {
        let rng = self.config.make_rng();
        let (exec_time, _) = self.run_kernel(buffer, kernel, rng)?;
        self.exec_time = exec_time;
        Ok(())
    }

    /// Run several kernels into children of `buffer`
    ///
    /// When vqe-mode is on, no shots are requested, more than one kernel is
    /// given and the backend supports it, the kernels are treated as
    /// observed circuits over a shared ansatz: the ansatz runs once and each
    /// observable is evaluated against it. Otherwise every kernel runs
    /// independently. Either way each kernel gets a child buffer named after
    /// it.
    ///
    /// One random source is seeded per call and shared by all kernels.
    pub fn execute_batch(
        &mut self,
        buffer: &mut ResultBuffer,
        kernels: &[Composite],
    ) -> Result<()> {
        let mut rng = self.config.make_rng();
        let batched = self.config.vqe_mode
            && self.config.shots.is_none()
            && kernels.len() > 1
            && self.backend.supports_batching();

        if batched {
            let ansatz = ObservedAnsatz::from_observed_circuits(kernels)?;
            if ansatz.validate(kernels) {
                info!(
                    kernels = kernels.len(),
                    shared_gates = ansatz.base().len(),
                    "running observed circuits over shared ansatz"
                );
                self.exec_time = self.run_observed(buffer, &ansatz, rng)?;
                return Ok(());
            }
            warn!(
                "observed circuits do not decompose into ansatz and observables, \
                 running independently"
            );
        }

        let mut total = 0.0;
        for kernel in kernels {
            let mut child = ResultBuffer::new(kernel.name(), buffer.size());
            let (exec_time, next) = self.run_kernel(&mut child, kernel, rng)?;
            total += exec_time;
            rng = next;
            buffer.append_child(child);
        }
        self.exec_time = total;
        Ok(())
    }

    /// Backend name and nominal time of the last execution
    pub fn execution_info(&self) -> BTreeMap<String, ExtraInfo> {
        let mut info = BTreeMap::new();
        info.insert(INFO_BACKEND.to_string(), ExtraInfo::from(self.backend.name()));
        info.insert(INFO_EXEC_TIME.to_string(), ExtraInfo::from(self.exec_time));
        info
    }

    /// Returns the nominal gate time and the random source for the next kernel
    fn run_kernel(
        &mut self,
        buffer: &mut ResultBuffer,
        kernel: &Composite,
        rng: StdRng,
    ) -> Result<(f64, StdRng)> {
        match self.config.shots {
            Some(shots) => self.run_shots(buffer, kernel, shots, rng),
            None => self.run_once(buffer, kernel, rng),
        }
    }

    fn run_once(
        &mut self,
        buffer: &mut ResultBuffer,
        kernel: &Composite,
        rng: StdRng,
    ) -> Result<(f64, StdRng)> {
        let kernels = self.backend.kernel_config(&self.config);
        let register = acquire_register(&mut self.shared, &self.config, buffer.size(), kernels)?;
        let mut dispatcher = Dispatcher::new(register, &self.config, rng);
        dispatcher.run(kernel, buffer)?;
        let exec_time = dispatcher.exec_time();
        Ok((exec_time, dispatcher.into_rng()))
    }

    fn run_shots(
        &mut self,
        buffer: &mut ResultBuffer,
        kernel: &Composite,
        shots: usize,
        mut rng: StdRng,
    ) -> Result<(f64, StdRng)> {
        let kernels = self.backend.kernel_config(&self.config);
        let num_qubits = buffer.size();
        let initial = match &self.shared {
            Some(storage) => storage.clone(),
            None => zero_state(num_qubits)?,
        };
        let initial_qubits = initial.len().trailing_zeros() as usize;
        if initial_qubits != num_qubits {
            return Err(BackendError::SharedRegisterMismatch {
                expected: initial_qubits,
                actual: num_qubits,
            });
        }

        debug!(kernel = kernel.name(), shots, "sampling kernel");
        let mut exec_time = 0.0;
        for _ in 0..shots {
            let register = QuantumRegister::from_amplitudes(initial.clone())?.with_kernels(kernels);
            let mut shot = ResultBuffer::new(buffer.name(), num_qubits);
            let mut dispatcher = Dispatcher::new(register, &self.config, rng);
            dispatcher.run(kernel, &mut shot)?;
            exec_time += dispatcher.exec_time();
            rng = dispatcher.into_rng();

            buffer.append_measurement(shot.measured_bitstring());
        }
        Ok((exec_time, rng))
    }

    fn run_observed(
        &mut self,
        buffer: &mut ResultBuffer,
        ansatz: &ObservedAnsatz,
        rng: StdRng,
    ) -> Result<f64> {
        let kernels = self.backend.kernel_config(&self.config);
        let register = acquire_register(&mut self.shared, &self.config, buffer.size(), kernels)?;
        let mut dispatcher = Dispatcher::new(register, &self.config, rng);
        ansatz.execute(&mut dispatcher, buffer)?;
        Ok(dispatcher.exec_time())
    }
}

impl std::fmt::Debug for Accelerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Accelerator")
            .field("backend", &self.backend.name())
            .field("config", &self.config)
            .field("shared_qubits", &self.config.qubit_count)
            .finish()
    }
}
