//! CPU core implementation.
//!
//! The 5-stage in-order pipeline, its architectural state and the
//! execution units it dispatches to.

/// Architectural register files.
pub mod arch;

/// The processor state and its two-phase clock.
pub mod cpu;

/// Pipeline latches, hazards, control signals and stages.
pub mod pipeline;

/// Execution units (ALU, LSU).
pub mod units;

pub use cpu::Cpu;
