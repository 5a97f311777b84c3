//! Core types for the qexec state-vector engine
//!
//! This crate provides the instruction model consumed by the simulator:
//! - [`QubitId`]: Type-safe qubit addressing
//! - [`GateKind`] and [`Parameter`]: The closed gate set and its arguments
//! - [`GateInstruction`] and [`Composite`]: Leaves and inner nodes of a kernel tree
//! - [`InstructionIter`]: Depth-first traversal honouring enabled flags
//!
//! # Example
//! ```
//! use qexec_core::{Composite, GateKind, WalkMode};
//!
//! let mut bell = Composite::new("bell");
//! bell.h(0).cnot(0, 1).unwrap();
//! bell.measure(0).measure(1);
//!
//! let kinds: Vec<GateKind> = bell.leaves().map(|g| g.kind()).collect();
//! assert_eq!(
//!     kinds,
//!     vec![GateKind::Hadamard, GateKind::ControlledNot, GateKind::Measure, GateKind::Measure]
//! );
//! assert_eq!(bell.walk(WalkMode::All).count(), 4);
//! ```

pub mod error;
pub mod gate;
pub mod instruction;
pub mod qubit;
pub mod walker;

// Re-exports for convenience
pub use error::CoreError;
pub use gate::{GateKind, Parameter};
pub use instruction::{Composite, GateInstruction, Instruction};
pub use qubit::QubitId;
pub use walker::{InstructionIter, WalkMode};

/// Type alias for results in qexec-core
pub type Result<T> = std::result::Result<T, CoreError>;
