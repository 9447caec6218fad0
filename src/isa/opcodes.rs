//! MIPS opcode constants.
//!
//! Primary opcodes (bits 31-26), SPECIAL function codes (bits 5-0),
//! REGIMM selectors (bits 20-16) and COP1 sub-opcodes (bits 25-21).

pub const OP_SPECIAL: u32 = 0x00;
pub const OP_REGIMM: u32 = 0x01;
pub const OP_J: u32 = 0x02;
pub const OP_JAL: u32 = 0x03;
pub const OP_BEQ: u32 = 0x04;
pub const OP_BNE: u32 = 0x05;
pub const OP_BLEZ: u32 = 0x06;
pub const OP_BGTZ: u32 = 0x07;
pub const OP_ADDI: u32 = 0x08;
pub const OP_ADDIU: u32 = 0x09;
pub const OP_SLTI: u32 = 0x0A;
pub const OP_SLTIU: u32 = 0x0B;
pub const OP_ANDI: u32 = 0x0C;
pub const OP_ORI: u32 = 0x0D;
pub const OP_XORI: u32 = 0x0E;
pub const OP_LUI: u32 = 0x0F;
pub const OP_COP1: u32 = 0x11;
pub const OP_LB: u32 = 0x20;
pub const OP_LH: u32 = 0x21;
pub const OP_LWL: u32 = 0x22;
pub const OP_LW: u32 = 0x23;
pub const OP_LBU: u32 = 0x24;
pub const OP_LHU: u32 = 0x25;
pub const OP_LWR: u32 = 0x26;
pub const OP_SB: u32 = 0x28;
pub const OP_SH: u32 = 0x29;
pub const OP_SWL: u32 = 0x2A;
pub const OP_SW: u32 = 0x2B;
pub const OP_SWR: u32 = 0x2E;
pub const OP_LWC1: u32 = 0x31;
pub const OP_SWC1: u32 = 0x39;

pub const FUNCT_SLL: u32 = 0x00;
pub const FUNCT_SRL: u32 = 0x02;
pub const FUNCT_SRA: u32 = 0x03;
pub const FUNCT_SLLV: u32 = 0x04;
pub const FUNCT_SRLV: u32 = 0x06;
pub const FUNCT_SRAV: u32 = 0x07;
pub const FUNCT_JR: u32 = 0x08;
pub const FUNCT_JALR: u32 = 0x09;
pub const FUNCT_SYSCALL: u32 = 0x0C;
pub const FUNCT_BREAK: u32 = 0x0D;
pub const FUNCT_MFHI: u32 = 0x10;
pub const FUNCT_MTHI: u32 = 0x11;
pub const FUNCT_MFLO: u32 = 0x12;
pub const FUNCT_MTLO: u32 = 0x13;
pub const FUNCT_MULT: u32 = 0x18;
pub const FUNCT_MULTU: u32 = 0x19;
pub const FUNCT_DIV: u32 = 0x1A;
pub const FUNCT_DIVU: u32 = 0x1B;
pub const FUNCT_ADD: u32 = 0x20;
pub const FUNCT_ADDU: u32 = 0x21;
pub const FUNCT_SUB: u32 = 0x22;
pub const FUNCT_SUBU: u32 = 0x23;
pub const FUNCT_AND: u32 = 0x24;
pub const FUNCT_OR: u32 = 0x25;
pub const FUNCT_XOR: u32 = 0x26;
pub const FUNCT_NOR: u32 = 0x27;
pub const FUNCT_SLT: u32 = 0x2A;
pub const FUNCT_SLTU: u32 = 0x2B;

pub const REGIMM_BLTZ: usize = 0x00;
pub const REGIMM_BGEZ: usize = 0x01;
pub const REGIMM_BLTZAL: usize = 0x10;
pub const REGIMM_BGEZAL: usize = 0x11;

pub const COP1_MFC1: usize = 0x00;
pub const COP1_MTC1: usize = 0x04;

/// Encoding of the `syscall` instruction with a zero code field.
pub const SYSCALL_WORD: u32 = FUNCT_SYSCALL;
