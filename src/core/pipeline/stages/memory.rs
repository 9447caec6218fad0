//! Memory Access (MEM) Stage.
//!
//! Runs the `MemOp` of the instruction in EX/MEM. Loads read memory in
//! phase 0; stores produce a `StoreRequest` that is applied in phase 1.
//! The stage also carries the forwarded register file forward: the new
//! MEM/WB image is the previous one overlaid with this instruction's
//! integer results, so it always holds the newest value of every register
//! that has passed Memory.

use tracing::trace;

use crate::core::pipeline::hazards::forward_operand;
use crate::core::pipeline::latches::MemWb;
use crate::core::pipeline::signals::MemOp;
use crate::core::pipeline::traits::PipelineStage;
use crate::core::units::lsu::{Lsu, StoreRequest};
use crate::core::Cpu;
use crate::isa::abi::{REG_HI, REG_LO};

/// Memory access stage.
pub struct MemoryAccess;

#[derive(Clone, Copy, Debug)]
pub struct MemoryOutput {
    pub mem_wb: MemWb,
    pub store: Option<StoreRequest>,
}

impl PipelineStage for MemoryAccess {
    type Output = MemoryOutput;

    fn compute(cpu: &Cpu) -> MemoryOutput {
        let x = &cpu.ex_mem;
        let data = forward_operand(x.fwd3, x.src3, x.rv3, x, &cpu.mem_wb);

        let mut result = x.result;
        let mut store = None;
        if let Some(op) = x.mem {
            let addr = x.result;
            if op.is_load() {
                result = Lsu::load(op, &cpu.memory, addr, data);
            } else {
                let value = if op == MemOp::Swc1 { x.fv } else { data };
                store = Lsu::store(op, &cpu.memory, addr, value);
            }
            if cpu.trace {
                trace!(
                    cycle = cpu.stats.cycles,
                    stage = "MEM",
                    pc = %format!("{:#010x}", x.pc),
                    op = ?op,
                    addr = %format!("{:#010x}", addr),
                    value = result,
                    "access"
                );
            }
        }

        let mut mem_wb = MemWb {
            pc: x.pc,
            inst: x.inst,
            dst: x.dst,
            result,
            hi: x.hi,
            lo: x.lo,
            mem: x.mem,
            ctrl: x.ctrl,
            bypass: cpu.mem_wb.bypass,
        };
        if x.ctrl.reg_write && x.dst != 0 {
            mem_wb.bypass[x.dst] = result;
        }
        if x.ctrl.hi_write {
            mem_wb.bypass[REG_HI] = x.hi;
        }
        if x.ctrl.lo_write {
            mem_wb.bypass[REG_LO] = x.lo;
        }

        MemoryOutput { mem_wb, store }
    }

    fn commit(cpu: &mut Cpu, out: MemoryOutput) {
        if let Some(op) = out.mem_wb.mem {
            if op.is_load() {
                cpu.stats.loads += 1;
            } else {
                cpu.stats.stores += 1;
            }
        }
        if let Some(req) = out.store {
            req.commit(&mut cpu.memory);
        }
        cpu.mem_wb = out.mem_wb;
    }
}
