//! Execution layer of the qexec state-vector engine
//!
//! This crate turns instruction trees into register updates:
//!
//! - [`ExecutionConfig`] / [`Options`]: validated settings parsed from a
//!   loosely typed option map
//! - [`Dispatcher`]: walks a kernel and applies each gate, recording
//!   measurements and expectation values into a [`ResultBuffer`]
//! - [`ObservedAnsatz`]: splits a batch of observed circuits into a shared
//!   preparation and per-circuit observables, so the preparation runs once
//!
//! # Example
//!
//! ```
//! use qexec_core::Composite;
//! use qexec_sim::{Dispatcher, ExecutionConfig, ResultBuffer};
//! use qexec_state::QuantumRegister;
//!
//! let config = ExecutionConfig::default().with_seed(1);
//! let mut kernel = Composite::new("flip");
//! kernel.x(0).measure(0);
//!
//! let mut buffer = ResultBuffer::new("flip", 1);
//! let register = QuantumRegister::new(1).unwrap();
//! let mut dispatcher = Dispatcher::new(register, &config, config.make_rng());
//! dispatcher.run(&kernel, &mut buffer).unwrap();
//!
//! assert_eq!(buffer.measurement(0), Some(1));
//! assert_eq!(buffer.expectation_value_z(), Some(-1.0));
//! ```

pub mod ansatz;
pub mod buffer;
pub mod config;
pub mod dispatcher;
pub mod error;

pub use ansatz::ObservedAnsatz;
pub use buffer::{ExtraInfo, ResultBuffer, EXP_VAL_Z, STATEVECT_IMAG, STATEVECT_REAL};
pub use config::{keys, ExecutionConfig, OptionValue, Options};
pub use dispatcher::Dispatcher;
pub use error::{Result, SimError};
