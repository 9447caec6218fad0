//! Cycle-accurate 5-stage MIPS pipeline simulator.
//!
//! Models a classic scalar in-order MIPS pipeline (Fetch, Decode, Execute,
//! Memory, Writeback) with explicit pipeline registers, per-register hazard
//! counters, a multi-source forwarding network, branch delay slots and a
//! syscall boundary that stalls the pipeline while the host emulates the
//! service.
//!
//! # Modules
//!
//! * `common`: Error types.
//! * `config`: Configuration loading and parsing.
//! * `core`: CPU core, pipeline and execution units.
//! * `isa`: MIPS instruction definitions and the decode table.
//! * `sim`: Image loading and the run loop.
//! * `stats`: Performance statistics collection.
//! * `system`: Guest memory and syscall emulation.

/// Shared error types.
pub mod common;

/// Configuration system for boot addresses, memory layout and tracing.
///
/// Loads and parses TOML configuration files.
pub mod config;

/// CPU core implementation including pipeline stages and execution units.
pub mod core;

/// MIPS instruction definitions and decoder.
pub mod isa;

/// Simulation harness, image loader and run loop.
pub mod sim;

/// Performance statistics collection and reporting.
pub mod stats;

/// Guest memory and the syscall layer.
pub mod system;

pub use common::{SimError, SimResult};
pub use config::Config;
pub use core::Cpu;
pub use sim::{RunOutcome, SimState, Simulator};
pub use stats::SimStats;
