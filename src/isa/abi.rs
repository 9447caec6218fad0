//! MIPS o32 ABI register name constants.
//!
//! Defines the conventional register names used by the syscall layer and by
//! the loader when it seeds the stack and global pointers.

/// Register $0 (hardwired zero).
pub const REG_ZERO: usize = 0;
/// Register $1 (assembler temporary, at).
pub const REG_AT: usize = 1;
/// Register $2 (return value / syscall number, v0).
pub const REG_V0: usize = 2;
/// Register $3 (second return value, v1).
pub const REG_V1: usize = 3;
/// Register $4 (first argument, a0).
pub const REG_A0: usize = 4;
/// Register $5 (second argument, a1).
pub const REG_A1: usize = 5;
/// Register $6 (third argument, a2).
pub const REG_A2: usize = 6;
/// Register $7 (fourth argument, a3).
pub const REG_A3: usize = 7;
/// Register $28 (global pointer, gp).
pub const REG_GP: usize = 28;
/// Register $29 (stack pointer, sp).
pub const REG_SP: usize = 29;
/// Register $30 (frame pointer, fp).
pub const REG_FP: usize = 30;
/// Register $31 (return address, ra).
pub const REG_RA: usize = 31;

/// Pseudo-index of the HI multiply/divide register in the hazard table.
pub const REG_HI: usize = 32;
/// Pseudo-index of the LO multiply/divide register in the hazard table.
pub const REG_LO: usize = 33;

/// Conventional names of the 32 general-purpose registers.
pub const GPR_NAMES: [&str; 32] = [
    "zero", "at", "v0", "v1", "a0", "a1", "a2", "a3", "t0", "t1", "t2", "t3", "t4", "t5", "t6",
    "t7", "s0", "s1", "s2", "s3", "s4", "s5", "s6", "s7", "t8", "t9", "k0", "k1", "gp", "sp", "fp",
    "ra",
];
