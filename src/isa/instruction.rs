//! Instruction encoding and decoding utilities.
//!
//! Provides bit extraction for the three MIPS instruction formats:
//!
//! ```text
//! R: | op:6 | rs:5 | rt:5 | rd:5 | shamt:5 | funct:6 |
//! I: | op:6 | rs:5 | rt:5 |        imm:16            |
//! J: | op:6 |             target:26                 |
//! ```

/// Mask for the 5-bit register fields.
pub const REG_MASK: u32 = 0x1F;
/// Mask for the 6-bit function field.
pub const FUNCT_MASK: u32 = 0x3F;
/// Mask for the 26-bit jump target.
pub const TARGET_MASK: u32 = 0x03FF_FFFF;

/// Trait for extracting instruction fields from encoded instructions.
pub trait InstructionBits {
    /// Primary opcode (bits 31-26).
    fn opcode(&self) -> u32;

    /// First source register (bits 25-21). Also the COP1 sub-opcode.
    fn rs(&self) -> usize;

    /// Second source register (bits 20-16). Also the REGIMM selector.
    fn rt(&self) -> usize;

    /// Destination register of R-type instructions (bits 15-11).
    fn rd(&self) -> usize;

    /// Shift amount (bits 10-6).
    fn shamt(&self) -> u32;

    /// SPECIAL function code (bits 5-0).
    fn funct(&self) -> u32;

    /// Raw 16-bit immediate.
    fn imm16(&self) -> u16;

    /// Immediate sign-extended to 32 bits.
    fn simm(&self) -> i32 {
        self.imm16() as i16 as i32
    }

    /// Raw 26-bit jump target.
    fn target(&self) -> u32;
}

impl InstructionBits for u32 {
    #[inline(always)]
    fn opcode(&self) -> u32 {
        self >> 26
    }

    #[inline(always)]
    fn rs(&self) -> usize {
        ((self >> 21) & REG_MASK) as usize
    }

    #[inline(always)]
    fn rt(&self) -> usize {
        ((self >> 16) & REG_MASK) as usize
    }

    #[inline(always)]
    fn rd(&self) -> usize {
        ((self >> 11) & REG_MASK) as usize
    }

    #[inline(always)]
    fn shamt(&self) -> u32 {
        (self >> 6) & REG_MASK
    }

    #[inline(always)]
    fn funct(&self) -> u32 {
        self & FUNCT_MASK
    }

    #[inline(always)]
    fn imm16(&self) -> u16 {
        (self & 0xFFFF) as u16
    }

    #[inline(always)]
    fn target(&self) -> u32 {
        self & TARGET_MASK
    }
}
