//! The system around the core.
//!
//! Guest memory and the syscall layer that stands in for an operating
//! system.

/// Sparse big-endian guest memory.
pub mod memory;

/// Syscall emulation.
pub mod syscall;

pub use memory::Memory;
pub use syscall::{SpimSyscalls, SyscallContext, SyscallHandler, SyscallOutcome};
