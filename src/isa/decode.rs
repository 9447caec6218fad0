//! Instruction decode table.
//!
//! Maps a raw instruction word onto the operand layout the pipeline works
//! with: up to three general-purpose sources (`src1`, `src2` consumed in
//! Execute, `src3` consumed in Memory), an optional FPR source, a single
//! destination, and the `ExecOp`/`MemOp` pair the later stages dispatch on.
//! HI and LO appear as sources and destinations through their pseudo-indices
//! 32 and 33. An index of 0 means "no register".

use crate::core::pipeline::signals::{
    AluOp, BranchCond, Cop1Move, ControlSignals, ExecOp, HiLoOp, MemOp, MulDivOp, OpBSrc,
    ShiftOp,
};
use crate::isa::abi::{REG_HI, REG_LO, REG_RA};
use crate::isa::instruction::InstructionBits;
use crate::isa::opcodes::*;

/// Cycles until an Execute-produced value is on the forwarding network.
pub const EXECUTE_FORWARD_LATENCY: u32 = 1;

/// Cycles until a Memory-produced (loaded) value is on the forwarding network.
pub const LOAD_FORWARD_LATENCY: u32 = 3;

/// Operands and handlers of a decoded instruction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Decoded {
    /// First source, consumed in Execute.
    pub src1: usize,
    /// Second source, consumed in Execute.
    pub src2: usize,
    /// Third source, consumed in Memory (store data, unaligned-load merge).
    pub src3: usize,
    /// Floating-point source register.
    pub fsrc: Option<usize>,
    /// Destination register: a GPR when `reg_write`, an FPR when `fp_reg_write`.
    pub dst: usize,
    /// Raw 16-bit immediate.
    pub imm: u16,
    /// Shift amount field.
    pub shamt: u32,
    pub exec: ExecOp,
    pub mem: Option<MemOp>,
    pub ctrl: ControlSignals,
}

impl Decoded {
    /// Cycles until the destination value can be forwarded.
    pub fn forward_latency(&self) -> u32 {
        match self.mem {
            Some(op) if op.is_load() => LOAD_FORWARD_LATENCY,
            _ => EXECUTE_FORWARD_LATENCY,
        }
    }

    fn illegal() -> Self {
        Self {
            ctrl: ControlSignals {
                is_illegal: true,
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

/// Returns `true` if `inst` is a `syscall` (any code field).
pub fn is_syscall(inst: u32) -> bool {
    inst.opcode() == OP_SPECIAL && inst.funct() == FUNCT_SYSCALL
}

/// Decodes an instruction word.
///
/// Unknown encodings come back with `ctrl.is_illegal` set and no effect.
pub fn decode(inst: u32) -> Decoded {
    let rs = inst.rs();
    let rt = inst.rt();
    let rd = inst.rd();

    let base = Decoded {
        imm: inst.imm16(),
        shamt: inst.shamt(),
        ..Default::default()
    };
    let writes_gpr = ControlSignals {
        reg_write: true,
        ..Default::default()
    };

    match inst.opcode() {
        OP_SPECIAL => decode_special(inst, base),
        OP_REGIMM => {
            let (cond, link) = match rt {
                REGIMM_BLTZ => (BranchCond::Ltz, false),
                REGIMM_BGEZ => (BranchCond::Gez, false),
                REGIMM_BLTZAL => (BranchCond::Ltz, true),
                REGIMM_BGEZAL => (BranchCond::Gez, true),
                _ => return Decoded::illegal(),
            };
            Decoded {
                src1: rs,
                dst: if link { REG_RA } else { 0 },
                exec: ExecOp::Branch { cond, link },
                ctrl: ControlSignals {
                    reg_write: link,
                    ..Default::default()
                },
                ..base
            }
        }
        OP_J => Decoded {
            exec: ExecOp::Jump { link: false },
            ..base
        },
        OP_JAL => Decoded {
            dst: REG_RA,
            exec: ExecOp::Jump { link: true },
            ctrl: writes_gpr,
            ..base
        },
        OP_BEQ | OP_BNE => Decoded {
            src1: rs,
            src2: rt,
            exec: ExecOp::Branch {
                cond: if inst.opcode() == OP_BEQ {
                    BranchCond::Eq
                } else {
                    BranchCond::Ne
                },
                link: false,
            },
            ..base
        },
        OP_BLEZ | OP_BGTZ => Decoded {
            src1: rs,
            exec: ExecOp::Branch {
                cond: if inst.opcode() == OP_BLEZ {
                    BranchCond::Lez
                } else {
                    BranchCond::Gtz
                },
                link: false,
            },
            ..base
        },
        OP_ADDI | OP_ADDIU | OP_SLTI | OP_SLTIU | OP_ANDI | OP_ORI | OP_XORI => {
            let (op, b) = match inst.opcode() {
                OP_ADDI | OP_ADDIU => (AluOp::Add, OpBSrc::SignedImm),
                OP_SLTI => (AluOp::Slt, OpBSrc::SignedImm),
                OP_SLTIU => (AluOp::Sltu, OpBSrc::SignedImm),
                OP_ANDI => (AluOp::And, OpBSrc::ZeroImm),
                OP_ORI => (AluOp::Or, OpBSrc::ZeroImm),
                _ => (AluOp::Xor, OpBSrc::ZeroImm),
            };
            Decoded {
                src1: rs,
                dst: rt,
                exec: ExecOp::Alu { op, b },
                ctrl: writes_gpr,
                ..base
            }
        }
        OP_LUI => Decoded {
            dst: rt,
            exec: ExecOp::Lui,
            ctrl: writes_gpr,
            ..base
        },
        OP_COP1 => match rs {
            COP1_MFC1 => Decoded {
                fsrc: Some(rd),
                dst: rt,
                exec: ExecOp::Cop1(Cop1Move::Mfc1),
                ctrl: ControlSignals {
                    reg_write: true,
                    is_fp: true,
                    ..Default::default()
                },
                ..base
            },
            COP1_MTC1 => Decoded {
                src1: rt,
                dst: rd,
                exec: ExecOp::Cop1(Cop1Move::Mtc1),
                ctrl: ControlSignals {
                    fp_reg_write: true,
                    is_fp: true,
                    ..Default::default()
                },
                ..base
            },
            _ => Decoded::illegal(),
        },
        OP_LB | OP_LH | OP_LW | OP_LBU | OP_LHU => {
            let op = match inst.opcode() {
                OP_LB => MemOp::Lb,
                OP_LH => MemOp::Lh,
                OP_LW => MemOp::Lw,
                OP_LBU => MemOp::Lbu,
                _ => MemOp::Lhu,
            };
            Decoded {
                src1: rs,
                dst: rt,
                exec: ExecOp::AddrGen,
                mem: Some(op),
                ctrl: writes_gpr,
                ..base
            }
        }
        OP_LWL | OP_LWR => Decoded {
            src1: rs,
            src3: rt,
            dst: rt,
            exec: ExecOp::AddrGen,
            mem: Some(if inst.opcode() == OP_LWL {
                MemOp::Lwl
            } else {
                MemOp::Lwr
            }),
            ctrl: writes_gpr,
            ..base
        },
        OP_SB | OP_SH | OP_SW | OP_SWL | OP_SWR => {
            let op = match inst.opcode() {
                OP_SB => MemOp::Sb,
                OP_SH => MemOp::Sh,
                OP_SW => MemOp::Sw,
                OP_SWL => MemOp::Swl,
                _ => MemOp::Swr,
            };
            Decoded {
                src1: rs,
                src3: rt,
                exec: ExecOp::AddrGen,
                mem: Some(op),
                ..base
            }
        }
        OP_LWC1 => Decoded {
            src1: rs,
            dst: rt,
            exec: ExecOp::AddrGen,
            mem: Some(MemOp::Lwc1),
            ctrl: ControlSignals {
                fp_reg_write: true,
                is_fp: true,
                ..Default::default()
            },
            ..base
        },
        OP_SWC1 => Decoded {
            src1: rs,
            fsrc: Some(rt),
            exec: ExecOp::AddrGen,
            mem: Some(MemOp::Swc1),
            ctrl: ControlSignals {
                is_fp: true,
                ..Default::default()
            },
            ..base
        },
        _ => Decoded::illegal(),
    }
}

fn decode_special(inst: u32, base: Decoded) -> Decoded {
    let rs = inst.rs();
    let rt = inst.rt();
    let rd = inst.rd();
    let writes_gpr = ControlSignals {
        reg_write: true,
        ..Default::default()
    };
    let writes_hilo = ControlSignals {
        hi_write: true,
        lo_write: true,
        ..Default::default()
    };

    let alu = |op| Decoded {
        src1: rs,
        src2: rt,
        dst: rd,
        exec: ExecOp::Alu { op, b: OpBSrc::Reg },
        ctrl: writes_gpr,
        ..base
    };
    let shift = |op, variable| Decoded {
        src1: if variable { rs } else { 0 },
        src2: rt,
        dst: rd,
        exec: ExecOp::Shift { op, variable },
        ctrl: writes_gpr,
        ..base
    };
    let muldiv = |op| Decoded {
        src1: rs,
        src2: rt,
        exec: ExecOp::MulDiv(op),
        ctrl: writes_hilo,
        ..base
    };

    match inst.funct() {
        FUNCT_SLL => shift(ShiftOp::Sll, false),
        FUNCT_SRL => shift(ShiftOp::Srl, false),
        FUNCT_SRA => shift(ShiftOp::Sra, false),
        FUNCT_SLLV => shift(ShiftOp::Sll, true),
        FUNCT_SRLV => shift(ShiftOp::Srl, true),
        FUNCT_SRAV => shift(ShiftOp::Sra, true),
        FUNCT_JR => Decoded {
            src1: rs,
            exec: ExecOp::JumpReg { link: false },
            ..base
        },
        FUNCT_JALR => Decoded {
            src1: rs,
            dst: rd,
            exec: ExecOp::JumpReg { link: true },
            ctrl: writes_gpr,
            ..base
        },
        FUNCT_SYSCALL => Decoded {
            exec: ExecOp::Syscall,
            ctrl: ControlSignals {
                is_syscall: true,
                ..Default::default()
            },
            ..base
        },
        FUNCT_MFHI => Decoded {
            src1: REG_HI,
            dst: rd,
            exec: ExecOp::HiLo(HiLoOp::Mfhi),
            ctrl: writes_gpr,
            ..base
        },
        FUNCT_MFLO => Decoded {
            src1: REG_LO,
            dst: rd,
            exec: ExecOp::HiLo(HiLoOp::Mflo),
            ctrl: writes_gpr,
            ..base
        },
        FUNCT_MTHI => Decoded {
            src1: rs,
            exec: ExecOp::HiLo(HiLoOp::Mthi),
            ctrl: ControlSignals {
                hi_write: true,
                ..Default::default()
            },
            ..base
        },
        FUNCT_MTLO => Decoded {
            src1: rs,
            exec: ExecOp::HiLo(HiLoOp::Mtlo),
            ctrl: ControlSignals {
                lo_write: true,
                ..Default::default()
            },
            ..base
        },
        FUNCT_MULT => muldiv(MulDivOp::Mult),
        FUNCT_MULTU => muldiv(MulDivOp::Multu),
        FUNCT_DIV => muldiv(MulDivOp::Div),
        FUNCT_DIVU => muldiv(MulDivOp::Divu),
        FUNCT_ADD | FUNCT_ADDU => alu(AluOp::Add),
        FUNCT_SUB | FUNCT_SUBU => alu(AluOp::Sub),
        FUNCT_AND => alu(AluOp::And),
        FUNCT_OR => alu(AluOp::Or),
        FUNCT_XOR => alu(AluOp::Xor),
        FUNCT_NOR => alu(AluOp::Nor),
        FUNCT_SLT => alu(AluOp::Slt),
        FUNCT_SLTU => alu(AluOp::Sltu),
        // `break` and everything unlisted
        _ => Decoded::illegal(),
    }
}
