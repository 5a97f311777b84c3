//! Backend registry and accelerator front end for qexec
//!
//! This crate is the outer surface of the engine:
//!
//! - [`SimulationBackend`]: pluggable strategy for running kernels, with
//!   built-in sequential and parallel state-vector backends
//! - [`BackendRegistry`]: name-keyed lookup with fallback to a default
//! - [`Accelerator`]: configuration, shared-register ownership, single and
//!   batched execution
//!
//! # Example
//!
//! ```
//! use qexec_backend::Accelerator;
//! use qexec_core::Composite;
//! use qexec_sim::ResultBuffer;
//!
//! // Two observed circuits over the same Bell preparation
//! let mut zz = Composite::new("zz");
//! zz.h(0).cnot(0, 1).unwrap();
//! zz.measure(0).measure(1);
//!
//! let mut xx = Composite::new("xx");
//! xx.h(0).cnot(0, 1).unwrap();
//! xx.h(0).h(1).measure(0).measure(1);
//!
//! let mut acc = Accelerator::new().unwrap();
//! let mut buffer = ResultBuffer::new("bell", 2);
//! acc.execute_batch(&mut buffer, &[zz, xx]).unwrap();
//!
//! for name in ["zz", "xx"] {
//!     let value = buffer.child(name).unwrap().expectation_value_z().unwrap();
//!     assert!((value - 1.0).abs() < 1e-12);
//! }
//! ```

pub mod accelerator;
pub mod backend;
pub mod error;
pub mod registry;

pub use accelerator::{Accelerator, INFO_BACKEND, INFO_EXEC_TIME};
pub use backend::{SimulationBackend, StateVectorBackend};
pub use error::{BackendError, Result};
pub use registry::{BackendRegistry, DEFAULT_BACKEND};
