//! Execution units used by the Execute and Memory stages.

/// Integer arithmetic, shifts, multiply/divide and branch comparison.
pub mod alu;

/// Load/store handlers.
pub mod lsu;
