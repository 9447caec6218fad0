//! Arithmetic Logic Unit (ALU).
//!
//! Integer arithmetic, logic, shifts, multiply/divide and branch
//! comparison for the Execute stage. All arithmetic wraps; MIPS overflow
//! traps are not modelled.

use crate::core::pipeline::signals::{AluOp, BranchCond, MulDivOp, ShiftOp};

/// Shift amounts use the low five bits.
const SHAMT_MASK: u32 = 0x1F;

/// Arithmetic Logic Unit (ALU) for integer operations.
pub struct Alu;

impl Alu {
    /// Executes a two-operand ALU operation.
    pub fn execute(op: AluOp, a: u32, b: u32) -> u32 {
        match op {
            AluOp::Add => a.wrapping_add(b),
            AluOp::Sub => a.wrapping_sub(b),
            AluOp::And => a & b,
            AluOp::Or => a | b,
            AluOp::Xor => a ^ b,
            AluOp::Nor => !(a | b),
            AluOp::Slt => ((a as i32) < (b as i32)) as u32,
            AluOp::Sltu => (a < b) as u32,
        }
    }

    /// Shifts `value` by the low five bits of `amount`.
    pub fn shift(op: ShiftOp, value: u32, amount: u32) -> u32 {
        let sh = amount & SHAMT_MASK;
        match op {
            ShiftOp::Sll => value << sh,
            ShiftOp::Srl => value >> sh,
            ShiftOp::Sra => ((value as i32) >> sh) as u32,
        }
    }

    /// Multiplies or divides, returning `(hi, lo)`.
    ///
    /// Division by zero leaves LO all ones and HI equal to the dividend.
    /// `i32::MIN / -1` wraps.
    pub fn mul_div(op: MulDivOp, a: u32, b: u32) -> (u32, u32) {
        match op {
            MulDivOp::Mult => {
                let p = (a as i32 as i64).wrapping_mul(b as i32 as i64) as u64;
                ((p >> 32) as u32, p as u32)
            }
            MulDivOp::Multu => {
                let p = (a as u64) * (b as u64);
                ((p >> 32) as u32, p as u32)
            }
            MulDivOp::Div => {
                if b == 0 {
                    (a, u32::MAX)
                } else {
                    let (n, d) = (a as i32, b as i32);
                    (n.wrapping_rem(d) as u32, n.wrapping_div(d) as u32)
                }
            }
            MulDivOp::Divu => {
                if b == 0 {
                    (a, u32::MAX)
                } else {
                    (a % b, a / b)
                }
            }
        }
    }

    /// Evaluates a branch condition on `rs` (and `rt` for `Eq`/`Ne`).
    pub fn branch_taken(cond: BranchCond, rs: u32, rt: u32) -> bool {
        let s = rs as i32;
        match cond {
            BranchCond::Eq => rs == rt,
            BranchCond::Ne => rs != rt,
            BranchCond::Lez => s <= 0,
            BranchCond::Gtz => s > 0,
            BranchCond::Ltz => s < 0,
            BranchCond::Gez => s >= 0,
        }
    }
}
