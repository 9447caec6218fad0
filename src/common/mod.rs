//! Common types shared across the simulator.
//!
//! Currently this is the library error type and its `Result` alias.

/// Simulator error type.
pub mod error;

pub use error::{SimError, SimResult};
