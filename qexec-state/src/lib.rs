//! Dense state-vector register for the qexec engine
//!
//! This crate owns the numerical core: a register of `2^n` complex
//! amplitudes, the gate kernels that update it, computational-basis
//! measurement and Z-parity expectation values.
//!
//! # Conventions
//!
//! - Qubit `k` is bit `k` of an amplitude index (qubit 0 is least significant)
//! - Kernels come in sequential and rayon-parallel flavours selected by
//!   [`KernelConfig`]; both give identical results
//! - The register may own its amplitudes or borrow a caller's buffer
//!   (see [`Amplitudes`])
//!
//! # Example
//!
//! ```
//! use qexec_state::{KernelConfig, QuantumRegister};
//!
//! let mut reg = QuantumRegister::new(3)
//!     .unwrap()
//!     .with_kernels(KernelConfig::parallel(1 << 14));
//! reg.pauli_x(1).unwrap();
//! reg.controlled_not(1, 2).unwrap();
//!
//! assert_eq!(reg.amplitudes()[0b110].re, 1.0);
//! assert_eq!(reg.expectation_z([2]).unwrap(), -1.0);
//! ```

pub mod error;
pub mod expectation;
pub mod kernels;
pub mod matrices;
pub mod measurement;
pub mod register;

pub use error::{Result, StateError};
pub use kernels::KernelConfig;
pub use matrices::Matrix2x2;
pub use num_complex::Complex64;
pub use register::{Amplitudes, QuantumRegister, Snapshot};
