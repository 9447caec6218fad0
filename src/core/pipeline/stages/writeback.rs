//! Writeback (WB) Stage.
//!
//! Commits the MEM/WB result to the architectural register files and, for
//! a `syscall`, runs the syscall layer. The pipeline behind a syscall is
//! empty and stalled, so the handler sees fully committed state.

use tracing::{debug, trace};

use crate::core::pipeline::latches::MemWb;
use crate::core::pipeline::traits::{PipelineLatch, PipelineStage};
use crate::core::Cpu;
use crate::isa::abi::{REG_HI, REG_LO};
use crate::system::syscall::{SyscallContext, SyscallOutcome};

/// Writeback stage.
pub struct Writeback;

impl PipelineStage for Writeback {
    type Output = MemWb;

    fn compute(cpu: &Cpu) -> MemWb {
        cpu.mem_wb
    }

    fn commit(cpu: &mut Cpu, wb: MemWb) {
        if cpu.trace && !wb.is_bubble() {
            trace!(
                cycle = cpu.stats.cycles,
                stage = "WB",
                pc = %format!("{:#010x}", wb.pc),
                dst = wb.dst,
                result = wb.result,
                "retire"
            );
        }

        if wb.ctrl.reg_write {
            cpu.regs.write(wb.dst, wb.result);
        }
        if wb.ctrl.hi_write {
            cpu.regs.write(REG_HI, wb.hi);
        }
        if wb.ctrl.lo_write {
            cpu.regs.write(REG_LO, wb.lo);
        }
        if wb.ctrl.fp_reg_write {
            cpu.fregs.write(wb.dst, wb.result);
        }

        if wb.ctrl.is_syscall {
            let mut ctx = SyscallContext::new(&mut cpu.regs, &mut cpu.memory, cpu.stats.cycles);
            let outcome = cpu.syscalls.emulate(&mut ctx);
            cpu.stats.syscall_loads += ctx.loads;
            cpu.stats.syscall_stores += ctx.stores;

            match outcome {
                SyscallOutcome::Continue => cpu.stalled = false,
                SyscallOutcome::Exit(code) => {
                    debug!(cycle = cpu.stats.cycles, code, "guest exit");
                    cpu.sim_exit = true;
                    cpu.exit_code = Some(code);
                }
            }
        }
    }
}
