//! End-to-end accelerator behaviour

use approx::assert_relative_eq;
use qexec_backend::{Accelerator, BackendError, BackendRegistry, SimulationBackend, INFO_EXEC_TIME};
use qexec_core::Composite;
use qexec_sim::{ExecutionConfig, Options, ResultBuffer, SimError, EXP_VAL_Z};
use qexec_state::{Complex64, KernelConfig, StateError};
use std::sync::Arc;

const EPSILON: f64 = 1e-10;
const THETA: f64 = 0.7;

fn accelerator(options: Options) -> Accelerator {
    let mut acc = Accelerator::new().unwrap();
    acc.initialize(&options).unwrap();
    acc
}

/// cos(t/2)|00> + sin(t/2)|11>
fn prepared(name: &str) -> Composite {
    let mut c = Composite::new(name);
    c.ry(0, THETA);
    c.cnot(0, 1).unwrap();
    c
}

fn observed_circuits() -> Vec<Composite> {
    let mut zz = prepared("zz");
    zz.measure(0).measure(1);
    let mut xx = prepared("xx");
    xx.h(0).h(1).measure(0).measure(1);
    let mut z0 = prepared("z0");
    z0.measure(0);
    vec![zz, xx, z0]
}

struct NonBatchingBackend;

impl SimulationBackend for NonBatchingBackend {
    fn name(&self) -> &str {
        "non-batching"
    }

    fn description(&self) -> &str {
        "Runs every kernel on its own"
    }

    fn supports_batching(&self) -> bool {
        false
    }

    fn kernel_config(&self, _config: &ExecutionConfig) -> KernelConfig {
        KernelConfig::sequential()
    }
}

#[test]
fn test_single_kernel_with_diagnostics() {
    let mut acc = accelerator(Options::new().with("diagnostics", true));
    let mut kernel = Composite::new("hadamards");
    kernel.x(1).h(0).h(1);

    let mut buffer = ResultBuffer::new("hadamards", 2);
    acc.execute(&mut buffer, &kernel).unwrap();

    let state = buffer.state_vector().unwrap();
    for (amp, expected) in state.iter().zip([0.5, 0.5, -0.5, -0.5]) {
        assert_relative_eq!(amp.re, expected, epsilon = EPSILON);
        assert_relative_eq!(amp.im, 0.0, epsilon = EPSILON);
    }
}

#[test]
fn test_batch_mode_evaluates_every_observable() {
    let mut acc = accelerator(Options::new());
    let mut buffer = ResultBuffer::new("vqe", 2);
    acc.execute_batch(&mut buffer, &observed_circuits()).unwrap();

    let value = |name: &str| buffer.child(name).unwrap().expectation_value_z().unwrap();
    assert_relative_eq!(value("zz"), 1.0, epsilon = EPSILON);
    assert_relative_eq!(value("xx"), THETA.sin(), epsilon = EPSILON);
    assert_relative_eq!(value("z0"), THETA.cos(), epsilon = EPSILON);

    let exec_time = acc.execution_info()[INFO_EXEC_TIME].as_f64().unwrap();
    assert!(exec_time > 0.0);
}

#[test]
fn test_vqe_mode_off_runs_independently() {
    let mut acc = accelerator(Options::new().with("vqe-mode", false).with("seed", 21));
    let mut buffer = ResultBuffer::new("vqe", 2);
    acc.execute_batch(&mut buffer, &observed_circuits()).unwrap();

    assert_eq!(buffer.children().len(), 3);
    // Deterministic cases: perfect ZZ correlation, and <Z0> taken before collapse
    let zz = buffer.child("zz").unwrap();
    assert_relative_eq!(zz.expectation_value_z().unwrap(), 1.0, epsilon = EPSILON);
    assert_eq!(zz.measurement(0), zz.measurement(1));

    let z0 = buffer.child("z0").unwrap();
    assert_relative_eq!(z0.expectation_value_z().unwrap(), THETA.cos(), epsilon = EPSILON);
    assert!(z0.measurement(0).is_some());
}

#[test]
fn test_non_batching_backend_runs_independently() {
    let mut registry = BackendRegistry::with_defaults();
    registry.register(Arc::new(NonBatchingBackend));

    let mut acc = Accelerator::with_registry(Arc::new(registry)).unwrap();
    acc.initialize(&Options::new().with("backend", "non-batching")).unwrap();
    assert_eq!(acc.backend_name(), "non-batching");

    let mut buffer = ResultBuffer::new("vqe", 2);
    acc.execute_batch(&mut buffer, &observed_circuits()).unwrap();

    // Independent runs record per-qubit outcomes; batched runs never do
    assert!(buffer.children().iter().all(|c| !c.measurements().is_empty()));
}

#[test]
fn test_single_circuit_batch_runs_directly() {
    let mut acc = accelerator(Options::new());
    let mut buffer = ResultBuffer::new("one", 2);
    acc.execute_batch(&mut buffer, &observed_circuits()[2..]).unwrap();

    let child = buffer.child("z0").unwrap();
    assert!(child.measurement(0).is_some());
    assert_relative_eq!(child.expectation_value_z().unwrap(), THETA.cos(), epsilon = EPSILON);
}

#[test]
fn test_unknown_backend_falls_back_to_default() {
    let acc = accelerator(Options::new().with("backend", "does-not-exist"));
    assert_eq!(acc.backend_name(), "statevector");
}

#[test]
fn test_parallel_backend_gives_same_values() {
    let mut acc = accelerator(
        Options::new()
            .with("backend", "statevector-parallel")
            .with("parallel-threshold", 1),
    );
    let mut buffer = ResultBuffer::new("vqe", 2);
    acc.execute_batch(&mut buffer, &observed_circuits()).unwrap();
    assert_relative_eq!(
        buffer.child("xx").unwrap().expectation_value_z().unwrap(),
        THETA.sin(),
        epsilon = EPSILON
    );
}

#[test]
fn test_shots_accumulate_counts() {
    let mut acc = accelerator(Options::new().with("shots", 50).with("seed", 1));
    let mut kernel = Composite::new("flip");
    kernel.x(0).measure(0).measure(1);

    let mut buffer = ResultBuffer::new("flip", 2);
    acc.execute(&mut buffer, &kernel).unwrap();

    // Lowest qubit leftmost
    assert_eq!(buffer.counts().get("10"), Some(&50));
    assert_eq!(buffer.total_shots(), 50);
    assert!(!buffer.has_extra_info(EXP_VAL_Z));
    assert_eq!(buffer.expectation_value_z(), Some(-1.0));
}

#[test]
fn test_shots_sample_superposition() {
    let mut acc = accelerator(Options::new().with("shots", 2000).with("seed", 77));
    let mut kernel = Composite::new("plus");
    kernel.h(0).measure(0);

    let mut buffer = ResultBuffer::new("plus", 1);
    acc.execute(&mut buffer, &kernel).unwrap();

    let ones = buffer.counts().get("1").copied().unwrap_or(0);
    let freq = ones as f64 / 2000.0;
    assert!((freq - 0.5).abs() < 0.05, "observed frequency {}", freq);
}

#[test]
fn test_seeded_shots_are_reproducible() {
    let run = || {
        let mut acc = accelerator(Options::new().with("shots", 100).with("seed", 5));
        let mut kernel = Composite::new("k");
        kernel.ry(0, 1.0).measure(0);
        let mut buffer = ResultBuffer::new("k", 1);
        acc.execute(&mut buffer, &kernel).unwrap();
        buffer.counts().clone()
    };
    assert_eq!(run(), run());
}

#[test]
fn test_independent_kernels_draw_independent_outcomes() {
    let coin = |name: &str| {
        let mut c = Composite::new(name);
        c.h(0).measure(0);
        c
    };
    let kernels = [coin("a"), coin("b")];

    let runs: i64 = 64;
    let agreements = (0..runs)
        .filter(|&seed| {
            let mut acc = accelerator(Options::new().with("vqe-mode", false).with("seed", seed));
            let mut buffer = ResultBuffer::new("coins", 1);
            acc.execute_batch(&mut buffer, &kernels).unwrap();
            let a = buffer.child("a").unwrap().measurement(0);
            let b = buffer.child("b").unwrap().measurement(0);
            a == b
        })
        .count();
    assert!(agreements > 10 && agreements < 54, "{} of {} runs agreed", agreements, runs);
}

#[test]
fn test_independent_kernels_sample_different_counts() {
    let coin = |name: &str| {
        let mut c = Composite::new(name);
        c.h(0).h(1).measure(0).measure(1);
        c
    };
    let mut acc = accelerator(Options::new().with("shots", 64).with("seed", 9));
    let mut buffer = ResultBuffer::new("coins", 2);
    acc.execute_batch(&mut buffer, &[coin("a"), coin("b")]).unwrap();

    assert_ne!(
        buffer.child("a").unwrap().counts(),
        buffer.child("b").unwrap().counts()
    );
}

#[test]
fn test_shots_disable_batching() {
    let mut acc = accelerator(Options::new().with("shots", 20).with("seed", 3));
    let mut buffer = ResultBuffer::new("vqe", 2);
    acc.execute_batch(&mut buffer, &observed_circuits()).unwrap();

    for child in buffer.children() {
        assert_eq!(child.total_shots(), 20);
    }
    // ZZ parity is always even for this state
    assert_eq!(buffer.child("zz").unwrap().expectation_value_z(), Some(1.0));
}

#[test]
fn test_shared_register_persists_between_runs() {
    let mut acc = accelerator(Options::new().with("qubit-count", 1));
    let mut flip = Composite::new("flip");
    flip.x(0);

    let mut buffer = ResultBuffer::new("flip", 1);
    acc.execute(&mut buffer, &flip).unwrap();
    assert_eq!(acc.shared_state().unwrap()[1], Complex64::new(1.0, 0.0));

    acc.execute(&mut buffer, &flip).unwrap();
    assert_eq!(acc.shared_state().unwrap()[0], Complex64::new(1.0, 0.0));

    acc.execute(&mut buffer, &flip).unwrap();
    acc.reset_shared_state();
    assert_eq!(acc.shared_state().unwrap()[0], Complex64::new(1.0, 0.0));
}

#[test]
fn test_repeated_measurement_leaves_shared_register_alone() {
    let mut acc = accelerator(Options::new().with("qubit-count", 2).with("seed", 4));
    let mut prep = Composite::new("prep");
    prep.h(0);
    acc.execute(&mut ResultBuffer::new("prep", 2), &prep).unwrap();
    let prepared = acc.shared_state().unwrap().to_vec();

    acc.update_configuration(&Options::new().with("repeated-measurement", true))
        .unwrap();
    let mut measure = Composite::new("measure");
    measure.measure(0);
    for _ in 0..5 {
        let mut buffer = ResultBuffer::new("measure", 2);
        acc.execute(&mut buffer, &measure).unwrap();
        assert_relative_eq!(buffer.expectation_value_z().unwrap(), 0.0, epsilon = EPSILON);
    }
    assert_eq!(acc.shared_state().unwrap(), prepared.as_slice());
}

#[test]
fn test_custom_initial_state() {
    let mut acc = Accelerator::new().unwrap();
    acc.set_shared_state(vec![Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0)])
        .unwrap();

    let mut kernel = Composite::new("read");
    kernel.measure(0);
    let mut buffer = ResultBuffer::new("read", 1);
    acc.execute(&mut buffer, &kernel).unwrap();

    assert_eq!(buffer.measurement(0), Some(1));
    assert_eq!(buffer.expectation_value_z(), Some(-1.0));
}

#[test]
fn test_shared_register_size_mismatch() {
    let mut acc = accelerator(Options::new().with("qubit-count", 2));
    let mut kernel = Composite::new("k");
    kernel.x(0);

    let err = acc.execute(&mut ResultBuffer::new("k", 3), &kernel).unwrap_err();
    assert!(matches!(
        err,
        BackendError::SharedRegisterMismatch { expected: 2, actual: 3 }
    ));
}

#[test]
fn test_out_of_range_qubit_is_an_error() {
    let mut acc = accelerator(Options::new());
    let mut kernel = Composite::new("k");
    kernel.h(4);

    let err = acc.execute(&mut ResultBuffer::new("k", 2), &kernel).unwrap_err();
    assert!(matches!(err, BackendError::Sim(SimError::Core(_))));
}

#[test]
fn test_state_errors_surface() {
    // Registers over 30 qubits are refused before allocation
    let mut acc = accelerator(Options::new());
    let kernel = Composite::new("empty");
    let err = acc.execute(&mut ResultBuffer::new("huge", 40), &kernel).unwrap_err();
    assert!(matches!(
        err,
        BackendError::Sim(SimError::State(StateError::TooManyQubits { .. }))
    ));
}
