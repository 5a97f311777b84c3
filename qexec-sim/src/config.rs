//! Execution configuration
//!
//! Callers pass loosely typed [`Options`] (a string-keyed map, typically
//! parsed from JSON). [`ExecutionConfig`] is the validated, strongly typed
//! view the engine runs on. Unknown keys are ignored; recognized keys with
//! the wrong type or an out-of-range value are rejected.

use crate::error::{Result, SimError};
use qexec_state::{KernelConfig, QuantumRegister};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Recognized option keys
pub mod keys {
    pub const SHOTS: &str = "shots";
    pub const VQE_MODE: &str = "vqe-mode";
    pub const VERBOSE: &str = "verbose";
    pub const BACKEND: &str = "backend";
    pub const QUBIT_COUNT: &str = "qubit-count";
    pub const SEED: &str = "seed";
    pub const DIAGNOSTICS: &str = "diagnostics";
    pub const REPEATED_MEASUREMENT: &str = "repeated-measurement";
    pub const PARALLEL_THRESHOLD: &str = "parallel-threshold";
}

/// A single option value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl OptionValue {
    fn type_name(&self) -> &'static str {
        match self {
            OptionValue::Bool(_) => "bool",
            OptionValue::Int(_) => "integer",
            OptionValue::Float(_) => "float",
            OptionValue::Str(_) => "string",
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(v) => write!(f, "{}", v),
            OptionValue::Int(v) => write!(f, "{}", v),
            OptionValue::Float(v) => write!(f, "{}", v),
            OptionValue::Str(v) => write!(f, "{:?}", v),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(v: bool) -> Self {
        OptionValue::Bool(v)
    }
}

impl From<i64> for OptionValue {
    fn from(v: i64) -> Self {
        OptionValue::Int(v)
    }
}

impl From<i32> for OptionValue {
    fn from(v: i32) -> Self {
        OptionValue::Int(i64::from(v))
    }
}

impl From<f64> for OptionValue {
    fn from(v: f64) -> Self {
        OptionValue::Float(v)
    }
}

impl From<&str> for OptionValue {
    fn from(v: &str) -> Self {
        OptionValue::Str(v.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(v: String) -> Self {
        OptionValue::Str(v)
    }
}

/// String-keyed option map
///
/// # Example
/// ```
/// use qexec_sim::Options;
///
/// let options = Options::from_json(r#"{"shots": 100, "vqe-mode": false}"#).unwrap();
/// assert_eq!(options.len(), 2);
///
/// let same = Options::new().with("shots", 100).with("vqe-mode", false);
/// assert_eq!(options, same);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Options {
    values: BTreeMap<String, OptionValue>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a flat JSON object
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<OptionValue>,
    ) -> Option<OptionValue> {
        self.values.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.values.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Overlay `other` on top of `self`
    pub fn merge(&mut self, other: &Options) {
        for (key, value) in &other.values {
            self.values.insert(key.clone(), value.clone());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn mistyped(key: &str, expected: &str, value: &OptionValue) -> SimError {
        SimError::invalid_config(format!(
            "option '{}' expects {}, got {} {}",
            key,
            expected,
            value.type_name(),
            value
        ))
    }

    /// Integer value of `key`, if present
    pub fn get_int(&self, key: &str) -> Result<Option<i64>> {
        match self.get(key) {
            None => Ok(None),
            Some(OptionValue::Int(v)) => Ok(Some(*v)),
            Some(other) => Err(Self::mistyped(key, "an integer", other)),
        }
    }

    /// Boolean value of `key`, if present
    pub fn get_bool(&self, key: &str) -> Result<Option<bool>> {
        match self.get(key) {
            None => Ok(None),
            Some(OptionValue::Bool(v)) => Ok(Some(*v)),
            Some(other) => Err(Self::mistyped(key, "a bool", other)),
        }
    }

    /// String value of `key`, if present
    pub fn get_str(&self, key: &str) -> Result<Option<&str>> {
        match self.get(key) {
            None => Ok(None),
            Some(OptionValue::Str(v)) => Ok(Some(v.as_str())),
            Some(other) => Err(Self::mistyped(key, "a string", other)),
        }
    }

    fn get_count(&self, key: &str) -> Result<Option<usize>> {
        match self.get_int(key)? {
            None => Ok(None),
            Some(v) => usize::try_from(v)
                .map(Some)
                .map_err(|_| {
                    SimError::invalid_config(format!(
                        "option '{}' must be non-negative, got {}",
                        key, v
                    ))
                }),
        }
    }
}

/// Validated configuration for one accelerator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ExecutionConfig {
    /// Number of shots to sample
    ///
    /// `None` runs each circuit once and reports expectation values
    /// directly from the state. `Some(n)` re-executes the circuit `n` times
    /// and accumulates bitstring counts instead.
    ///
    /// Default: None
    pub shots: Option<usize>,

    /// Allow batched execution of observed circuits that share an ansatz
    ///
    /// Default: true
    pub vqe_mode: bool,

    /// Log every applied gate at info level instead of trace
    ///
    /// Default: false
    pub verbose: bool,

    /// Name of the simulation backend to use
    ///
    /// `None` selects the registry default.
    ///
    /// Default: None
    pub backend: Option<String>,

    /// Size of a persistent register shared between executions
    ///
    /// When set, every execution operates in place on one register of this
    /// many qubits, and its state carries over from run to run.
    ///
    /// Default: None (fresh register per execution)
    pub qubit_count: Option<usize>,

    /// Seed for measurement sampling
    ///
    /// If None, the generator is seeded from system entropy.
    ///
    /// Default: None
    pub seed: Option<u64>,

    /// Record the full state vector into the result buffer after every gate
    ///
    /// Default: false
    pub diagnostics: bool,

    /// Run against a copy of the shared register, leaving it untouched
    ///
    /// Default: false
    pub repeated_measurement: bool,

    /// Minimum amplitude count for parallel kernels
    ///
    /// Only consulted by backends that support parallel execution.
    ///
    /// Default: 16384 (14 qubits)
    pub parallel_threshold: usize,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            shots: None,
            vqe_mode: true,
            verbose: false,
            backend: None,
            qubit_count: None,
            seed: None,
            diagnostics: false,
            repeated_measurement: false,
            parallel_threshold: qexec_state::kernels::DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl ExecutionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from defaults overlaid with `options`
    ///
    /// # Example
    /// ```
    /// use qexec_sim::{ExecutionConfig, Options};
    ///
    /// let options = Options::new().with("shots", 512).with("seed", 7).with("unused", "ignored");
    /// let config = ExecutionConfig::from_options(&options).unwrap();
    /// assert_eq!(config.shots, Some(512));
    /// assert_eq!(config.seed, Some(7));
    /// assert!(config.vqe_mode);
    ///
    /// let bad = Options::new().with("shots", "many");
    /// assert!(ExecutionConfig::from_options(&bad).is_err());
    /// ```
    pub fn from_options(options: &Options) -> Result<Self> {
        let mut config = Self::default();
        config.merge_options(options)?;
        Ok(config)
    }

    /// Overlay recognized keys from `options`
    ///
    /// Either every recognized key is applied or, on error, none are.
    /// A `shots` value of -1 clears sampling.
    pub fn merge_options(&mut self, options: &Options) -> Result<()> {
        let mut next = self.clone();

        if let Some(shots) = options.get_int(keys::SHOTS)? {
            next.shots = match shots {
                -1 => None,
                n if n >= 1 => Some(n as usize),
                n => {
                    return Err(SimError::invalid_config(format!(
                        "shots must be at least 1 (or -1 to disable), got {}",
                        n
                    )))
                }
            };
        }
        if let Some(v) = options.get_bool(keys::VQE_MODE)? {
            next.vqe_mode = v;
        }
        if let Some(v) = options.get_bool(keys::VERBOSE)? {
            next.verbose = v;
        }
        if let Some(v) = options.get_str(keys::BACKEND)? {
            next.backend = Some(v.to_string());
        }
        if let Some(v) = options.get_count(keys::QUBIT_COUNT)? {
            next.qubit_count = Some(v);
        }
        if let Some(v) = options.get_int(keys::SEED)? {
            let seed = u64::try_from(v).map_err(|_| {
                SimError::invalid_config(format!("seed must be non-negative, got {}", v))
            })?;
            next.seed = Some(seed);
        }
        if let Some(v) = options.get_bool(keys::DIAGNOSTICS)? {
            next.diagnostics = v;
        }
        if let Some(v) = options.get_bool(keys::REPEATED_MEASUREMENT)? {
            next.repeated_measurement = v;
        }
        if let Some(v) = options.get_count(keys::PARALLEL_THRESHOLD)? {
            next.parallel_threshold = v;
        }

        next.validate()?;
        *self = next;
        Ok(())
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.shots == Some(0) {
            return Err(SimError::invalid_config("shots must be at least 1"));
        }
        if let Some(n) = self.qubit_count {
            if n == 0 || n > QuantumRegister::MAX_QUBITS {
                return Err(SimError::invalid_config(format!(
                    "qubit-count must be between 1 and {}, got {}",
                    QuantumRegister::MAX_QUBITS,
                    n
                )));
            }
        }
        if matches!(self.backend.as_deref(), Some("")) {
            return Err(SimError::invalid_config("backend name must not be empty"));
        }
        Ok(())
    }

    pub fn with_shots(mut self, shots: usize) -> Self {
        self.shots = Some(shots);
        self
    }

    pub fn with_vqe_mode(mut self, enabled: bool) -> Self {
        self.vqe_mode = enabled;
        self
    }

    pub fn with_verbose(mut self, enabled: bool) -> Self {
        self.verbose = enabled;
        self
    }

    pub fn with_backend(mut self, name: impl Into<String>) -> Self {
        self.backend = Some(name.into());
        self
    }

    pub fn with_qubit_count(mut self, num_qubits: usize) -> Self {
        self.qubit_count = Some(num_qubits);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_diagnostics(mut self, enabled: bool) -> Self {
        self.diagnostics = enabled;
        self
    }

    pub fn with_repeated_measurement(mut self, enabled: bool) -> Self {
        self.repeated_measurement = enabled;
        self
    }

    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Random source for one execution
    pub fn make_rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Kernel selection for a backend that may or may not run in parallel
    pub fn kernel_config(&self, parallel: bool) -> KernelConfig {
        if parallel {
            KernelConfig::parallel(self.parallel_threshold)
        } else {
            KernelConfig::sequential()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ExecutionConfig::default();
        assert_eq!(config.shots, None);
        assert!(config.vqe_mode);
        assert!(!config.verbose);
        assert!(!config.diagnostics);
        assert_eq!(config.parallel_threshold, 1 << 14);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builders() {
        let config = ExecutionConfig::new()
            .with_shots(10)
            .with_vqe_mode(false)
            .with_backend("statevector-parallel")
            .with_qubit_count(3)
            .with_seed(11);
        assert_eq!(config.shots, Some(10));
        assert!(!config.vqe_mode);
        assert_eq!(config.backend.as_deref(), Some("statevector-parallel"));
        assert_eq!(config.qubit_count, Some(3));
        assert_eq!(config.seed, Some(11));
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let options = Options::new().with("accelerator", "qpp").with("verbose", true);
        let config = ExecutionConfig::from_options(&options).unwrap();
        assert!(config.verbose);
    }

    #[test]
    fn test_mistyped_values_rejected() {
        for options in [
            Options::new().with("vqe-mode", 1),
            Options::new().with("shots", 1.5),
            Options::new().with("backend", false),
            Options::new().with("qubit-count", -2),
        ] {
            assert!(
                matches!(
                    ExecutionConfig::from_options(&options),
                    Err(SimError::InvalidConfig(_))
                ),
                "{:?}",
                options
            );
        }
    }

    #[test]
    fn test_shots_range() {
        assert!(ExecutionConfig::from_options(&Options::new().with("shots", 0)).is_err());
        assert!(ExecutionConfig::from_options(&Options::new().with("shots", -3)).is_err());

        let mut config = ExecutionConfig::new().with_shots(5);
        config.merge_options(&Options::new().with("shots", -1)).unwrap();
        assert_eq!(config.shots, None);
    }

    #[test]
    fn test_negative_seed_rejected() {
        let options = Options::new().with("seed", -1);
        assert!(matches!(
            ExecutionConfig::from_options(&options),
            Err(SimError::InvalidConfig(_))
        ));

        let mut config = ExecutionConfig::new().with_seed(8);
        assert!(config.merge_options(&options).is_err());
        assert_eq!(config.seed, Some(8));
    }

    #[test]
    fn test_failed_merge_leaves_config_untouched() {
        let mut config = ExecutionConfig::new().with_seed(3);
        let options = Options::new().with("seed", 99).with("qubit-count", 0);
        assert!(config.merge_options(&options).is_err());
        assert_eq!(config.seed, Some(3));
        assert_eq!(config.qubit_count, None);
    }

    #[test]
    fn test_json_options() {
        let json = r#"{"shots": 64, "vqe-mode": false, "backend": "statevector",
            "seed": 5, "diagnostics": true}"#;
        let options = Options::from_json(json).unwrap();
        let config = ExecutionConfig::from_options(&options).unwrap();
        assert_eq!(config.shots, Some(64));
        assert!(!config.vqe_mode);
        assert!(config.diagnostics);
        assert_eq!(config.backend.as_deref(), Some("statevector"));

        assert!(Options::from_json("[1, 2]").is_err());
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        use rand::Rng;
        let config = ExecutionConfig::new().with_seed(17);
        let a: f64 = config.make_rng().gen();
        let b: f64 = config.make_rng().gen();
        assert_eq!(a, b);
    }

    #[test]
    fn test_kernel_config_selection() {
        let config = ExecutionConfig::new().with_parallel_threshold(64);
        assert_eq!(config.kernel_config(true), KernelConfig::parallel(64));
        assert_eq!(config.kernel_config(false), KernelConfig::sequential());
    }
}
