//! Simulation harness and image loading.

/// Program image loader.
pub mod loader;

/// Run-state machine around the CPU.
pub mod simulator;

pub use simulator::{RunOutcome, SimState, Simulator};
