//! Pipeline stage implementations.
//!
//! Contains the five stages of the instruction pipeline:
//! - Fetch: Retrieves instructions from memory
//! - Decode: Decodes instructions, resolves hazards, claims destinations
//! - Execute: Performs ALU operations and branch resolution
//! - Memory: Handles load/store operations and the forwarded register image
//! - Writeback: Commits results and runs syscalls

/// Instruction decode stage implementation.
pub mod decode;

/// Instruction execute stage implementation.
pub mod execute;

/// Instruction fetch stage implementation.
pub mod fetch;

/// Memory access stage implementation.
pub mod memory;

/// Writeback stage implementation.
pub mod writeback;

pub use decode::Decode;
pub use execute::Execute;
pub use fetch::Fetch;
pub use memory::MemoryAccess;
pub use writeback::Writeback;
