//! MIPS architectural state.
//!
//! Register files visible to software: the general-purpose file (with HI
//! and LO) and the COP1 floating-point file.

/// Floating-Point Register file implementation.
pub mod fpr;

/// General-Purpose Register file implementation.
pub mod gpr;
