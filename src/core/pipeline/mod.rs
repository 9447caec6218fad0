//! The five-stage pipeline.
//!
//! Latches carry one instruction each between stages. Decode consults the
//! hazard table to choose a forwarding source or interlock; the stages
//! themselves follow the compute/commit split in `traits`.

/// Ready and forward-ready counters, source resolution, operand forwarding.
pub mod hazards;

/// IF/ID, ID/EX, EX/MEM and MEM/WB latches.
pub mod latches;

/// Decoded operation selectors and control flags.
pub mod signals;

/// Fetch, Decode, Execute, Memory and Writeback.
pub mod stages;

/// Stage and latch traits.
pub mod traits;
