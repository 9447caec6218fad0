//! MIPS Instruction Set Architecture definitions.
//!
//! Covers the MIPS I integer subset executed by the pipeline together with
//! the COP1 register moves and floating-point loads/stores. COP1 arithmetic
//! is not modelled.

/// Register ABI names and indices.
pub mod abi;

/// Decode table turning an instruction word into pipeline operands.
pub mod decode;

/// Instruction field extraction.
pub mod instruction;

/// Primary opcode, SPECIAL function and REGIMM constants.
pub mod opcodes;
