//! Pipeline control signals and operation types.
//!
//! Decode turns every instruction word into a closed `ExecOp` (what the
//! Execute stage computes), an optional `MemOp` (what the Memory stage does)
//! and a set of `ControlSignals` describing which architectural state the
//! instruction writes. Stages dispatch on these with exhaustive matches.

/// Integer ALU operations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AluOp {
    /// Wrapping addition. `add`/`addi` never trap on overflow.
    #[default]
    Add,
    /// Wrapping subtraction.
    Sub,
    /// Bitwise AND.
    And,
    /// Bitwise OR.
    Or,
    /// Bitwise XOR.
    Xor,
    /// Bitwise NOR.
    Nor,
    /// Set less than (signed).
    Slt,
    /// Set less than (unsigned).
    Sltu,
}

/// Source of the ALU's second operand.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OpBSrc {
    /// Value of the second source register.
    #[default]
    Reg,
    /// Sign-extended 16-bit immediate.
    SignedImm,
    /// Zero-extended 16-bit immediate.
    ZeroImm,
}

/// Shift operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShiftOp {
    Sll,
    Srl,
    Sra,
}

/// Multiply and divide operations writing HI/LO.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MulDivOp {
    Mult,
    Multu,
    Div,
    Divu,
}

/// Moves between HI/LO and the general-purpose registers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HiLoOp {
    Mfhi,
    Mflo,
    Mthi,
    Mtlo,
}

/// Conditional branch comparisons.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BranchCond {
    /// `rs == rt`
    Eq,
    /// `rs != rt`
    Ne,
    /// `rs <= 0`
    Lez,
    /// `rs > 0`
    Gtz,
    /// `rs < 0`
    Ltz,
    /// `rs >= 0`
    Gez,
}

/// Moves between the integer and floating-point register files.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cop1Move {
    /// FPR to GPR.
    Mfc1,
    /// GPR to FPR.
    Mtc1,
}

/// Work performed by the Execute stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExecOp {
    /// Bubble, illegal instruction, or an instruction with no Execute work.
    #[default]
    Nop,
    /// Register/immediate ALU operation.
    Alu { op: AluOp, b: OpBSrc },
    /// Load upper immediate.
    Lui,
    /// Shift of the second source; `variable` takes the amount from the first source.
    Shift { op: ShiftOp, variable: bool },
    /// Multiply/divide into HI and LO.
    MulDiv(MulDivOp),
    /// HI/LO transfer.
    HiLo(HiLoOp),
    /// PC-relative conditional branch, optionally linking `$ra`.
    Branch { cond: BranchCond, link: bool },
    /// Absolute region jump (`j`/`jal`).
    Jump { link: bool },
    /// Register-indirect jump (`jr`/`jalr`).
    JumpReg { link: bool },
    /// Effective address generation for loads and stores.
    AddrGen,
    /// COP1 register move.
    Cop1(Cop1Move),
    /// System call; the service runs at writeback.
    Syscall,
}

impl ExecOp {
    /// Returns `true` for instructions that have a branch delay slot.
    pub fn is_control_transfer(&self) -> bool {
        matches!(
            self,
            ExecOp::Branch { .. } | ExecOp::Jump { .. } | ExecOp::JumpReg { .. }
        )
    }
}

/// Memory stage operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemOp {
    Lb,
    Lbu,
    Lh,
    Lhu,
    Lw,
    /// Load word left (unaligned, merges into `rt`).
    Lwl,
    /// Load word right (unaligned, merges into `rt`).
    Lwr,
    /// Load word into an FPR.
    Lwc1,
    Sb,
    Sh,
    Sw,
    /// Store word left (unaligned).
    Swl,
    /// Store word right (unaligned).
    Swr,
    /// Store word from an FPR.
    Swc1,
}

impl MemOp {
    /// Returns `true` if the operation reads memory.
    pub fn is_load(&self) -> bool {
        matches!(
            self,
            MemOp::Lb
                | MemOp::Lbu
                | MemOp::Lh
                | MemOp::Lhu
                | MemOp::Lw
                | MemOp::Lwl
                | MemOp::Lwr
                | MemOp::Lwc1
        )
    }

    /// Returns `true` if the operation writes memory.
    pub fn is_store(&self) -> bool {
        !self.is_load()
    }
}

/// Where the Execute or Memory stage obtains a source operand.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ForwardSrc {
    /// Value read from the register file at decode.
    #[default]
    None,
    /// Execute/Memory boundary: the committed EX/MEM result.
    ExMem,
    /// Within Memory: the committed MEM/WB forwarded register image.
    Memory,
    /// Memory/Writeback boundary, used for store data and merge operands.
    MemWb,
}

/// Control signals generated by the decode stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ControlSignals {
    /// Writes the general-purpose destination register.
    pub reg_write: bool,
    /// Writes a floating-point register.
    pub fp_reg_write: bool,
    /// Writes HI.
    pub hi_write: bool,
    /// Writes LO.
    pub lo_write: bool,
    /// Instruction is `syscall`.
    pub is_syscall: bool,
    /// Opcode not recognized by the decode table.
    pub is_illegal: bool,
    /// Instruction sits in a branch delay slot.
    pub bdslot: bool,
    /// Instruction touches COP1 state.
    pub is_fp: bool,
}
