//! Instruction Execute (EX) Stage.
//!
//! Resolves forwarded operands for the instruction in ID/EX and dispatches
//! its `ExecOp`: ALU and shift results, HI/LO, effective addresses, link
//! values and branch resolution. Taken branches and jumps publish their
//! target in EX/MEM, where fetch picks it up after the delay slot.

use tracing::trace;

use crate::core::pipeline::hazards::forward_operand;
use crate::core::pipeline::latches::{ExMem, IdEx};
use crate::core::pipeline::signals::{Cop1Move, ExecOp, HiLoOp, OpBSrc};
use crate::core::pipeline::traits::{PipelineLatch, PipelineStage};
use crate::core::units::alu::Alu;
use crate::core::Cpu;
use crate::isa::instruction::InstructionBits;

/// Instruction execute stage.
pub struct Execute;

#[derive(Clone, Copy, Debug)]
pub struct ExecuteOutput {
    pub ex_mem: ExMem,
    pub exec: ExecOp,
}

/// Computes the EX/MEM contents for `e` given its resolved operands.
pub fn execute(e: &IdEx, a: u32, b: u32) -> ExMem {
    let mut out = ExMem {
        pc: e.pc,
        inst: e.inst,
        dst: e.dst,
        src3: e.src3,
        rv3: e.rv3,
        fv: e.fv,
        mem: e.mem,
        ctrl: e.ctrl,
        fwd3: e.fwd3,
        ..Default::default()
    };
    let link = e.pc.wrapping_add(8);
    let simm = e.imm as i16 as i32 as u32;

    match e.exec {
        ExecOp::Nop | ExecOp::Syscall => {}
        ExecOp::Alu { op, b: src } => {
            let rhs = match src {
                OpBSrc::Reg => b,
                OpBSrc::SignedImm => simm,
                OpBSrc::ZeroImm => e.imm as u32,
            };
            out.result = Alu::execute(op, a, rhs);
        }
        ExecOp::Lui => out.result = (e.imm as u32) << 16,
        ExecOp::Shift { op, variable } => {
            let amount = if variable { a } else { e.shamt };
            out.result = Alu::shift(op, b, amount);
        }
        ExecOp::MulDiv(op) => (out.hi, out.lo) = Alu::mul_div(op, a, b),
        ExecOp::HiLo(op) => match op {
            HiLoOp::Mfhi | HiLoOp::Mflo => out.result = a,
            HiLoOp::Mthi => out.hi = a,
            HiLoOp::Mtlo => out.lo = a,
        },
        ExecOp::Branch { cond, link: links } => {
            out.branch_taken = Alu::branch_taken(cond, a, b);
            out.branch_target = e.pc.wrapping_add(4).wrapping_add(simm << 2);
            if links {
                out.result = link;
            }
        }
        ExecOp::Jump { link: links } => {
            out.branch_taken = true;
            out.branch_target = (e.pc.wrapping_add(4) & 0xF000_0000) | (e.inst.target() << 2);
            if links {
                out.result = link;
            }
        }
        ExecOp::JumpReg { link: links } => {
            out.branch_taken = true;
            out.branch_target = a;
            if links {
                out.result = link;
            }
        }
        ExecOp::AddrGen => out.result = a.wrapping_add(simm),
        ExecOp::Cop1(Cop1Move::Mfc1) => out.result = e.fv,
        ExecOp::Cop1(Cop1Move::Mtc1) => out.result = a,
    }
    out
}

impl PipelineStage for Execute {
    type Output = ExecuteOutput;

    fn compute(cpu: &Cpu) -> ExecuteOutput {
        let e = &cpu.id_ex;
        let a = forward_operand(e.fwd1, e.src1, e.rv1, &cpu.ex_mem, &cpu.mem_wb);
        let b = forward_operand(e.fwd2, e.src2, e.rv2, &cpu.ex_mem, &cpu.mem_wb);
        let ex_mem = execute(e, a, b);

        if cpu.trace && !e.is_bubble() {
            trace!(
                cycle = cpu.stats.cycles,
                stage = "EX",
                pc = %format!("{:#010x}", e.pc),
                a,
                b,
                result = ex_mem.result,
                taken = ex_mem.branch_taken,
                bdslot = e.ctrl.bdslot,
                "execute"
            );
        }

        ExecuteOutput {
            ex_mem,
            exec: e.exec,
        }
    }

    fn commit(cpu: &mut Cpu, out: ExecuteOutput) {
        cpu.ex_mem = out.ex_mem;
        match out.exec {
            ExecOp::Branch { .. } => cpu.stats.cond_branches += 1,
            ExecOp::Jump { link: true } => cpu.stats.jump_and_link += 1,
            ExecOp::JumpReg { link } => {
                cpu.stats.jump_register += 1;
                if link {
                    cpu.stats.jump_and_link += 1;
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::isa::decode::decode;

    fn issue(inst: u32, pc: u32) -> IdEx {
        let d = decode(inst);
        IdEx {
            pc,
            inst,
            src1: d.src1,
            src2: d.src2,
            src3: d.src3,
            dst: d.dst,
            imm: d.imm,
            shamt: d.shamt,
            exec: d.exec,
            mem: d.mem,
            ctrl: d.ctrl,
            ..Default::default()
        }
    }

    #[test]
    fn branch_target_is_relative_to_delay_slot() {
        // beq $0, $0, -1
        let out = execute(&issue(0x1000_FFFF, 0x0040_0010), 0, 0);
        assert!(out.branch_taken);
        assert_eq!(out.branch_target, 0x0040_0010);
    }

    #[test]
    fn jal_links_past_delay_slot() {
        // jal 0x00400100
        let out = execute(&issue(0x0C10_0040, 0x0040_0000), 0, 0);
        assert_eq!(out.branch_target, 0x0040_0100);
        assert_eq!(out.result, 0x0040_0008);
    }

    #[test]
    fn bltzal_links_even_when_not_taken() {
        // bltzal $4, 4
        let out = execute(&issue(0x0490_0004, 0x0040_0000), 5, 0);
        assert!(!out.branch_taken);
        assert_eq!(out.result, 0x0040_0008);
    }

    #[test]
    fn lui_and_ori_build_constant() {
        // lui $1, 0x1234
        assert_eq!(execute(&issue(0x3C01_1234, 0), 0, 0).result, 0x1234_0000);
        // ori $1, $1, 0xABCD
        assert_eq!(execute(&issue(0x3421_ABCD, 0), 0x1234_0000, 0).result, 0x1234_ABCD);
    }

    #[test]
    fn address_generation_sign_extends_offset() {
        // lw $2, -4($29)
        let out = execute(&issue(0x8FA2_FFFC, 0), 0x7FFF_F000, 0);
        assert_eq!(out.result, 0x7FFF_EFFC);
    }
}
