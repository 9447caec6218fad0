//! Instruction Fetch (IF) Stage.
//!
//! Reads the next instruction word at the PC and publishes it to IF/ID
//! together with the entry decode is working on this cycle. Three things
//! change the normal `pc + 4` flow:
//!
//! * decode interlocked last cycle: the entry is presented again, so the
//!   word fetched behind it is discarded and refetched;
//! * the committed EX/MEM holds a taken branch or jump: its delay slot has
//!   already been fetched, so fetch continues at the target;
//! * decode is presented a `syscall`: fetch holds and publishes a bubble,
//!   and stays idle while the syscall stall is in effect.

use tracing::trace;

use crate::core::pipeline::latches::{IfId, IfIdEntry};
use crate::core::pipeline::traits::PipelineStage;
use crate::core::Cpu;
use crate::isa::decode::is_syscall;

/// Instruction fetch stage.
pub struct Fetch;

/// What fetch publishes at the end of the cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchOutput {
    pub pc: u32,
    /// New IF/ID contents; `None` leaves the latch untouched.
    pub if_id: Option<IfId>,
    /// A new instruction was fetched.
    pub fetched: bool,
    /// Last cycle's fetch is discarded in favour of a replay.
    pub discarded: bool,
}

impl PipelineStage for Fetch {
    type Output = FetchOutput;

    fn compute(cpu: &Cpu) -> FetchOutput {
        let presented = cpu.if_id.presented(cpu.interlocked);

        let mut next = if cpu.interlocked {
            cpu.if_id.current.pc
        } else {
            cpu.pc
        };
        if let Some(target) = cpu.ex_mem.redirect() {
            next = target;
        }

        let idle = FetchOutput {
            pc: next,
            if_id: None,
            fetched: false,
            discarded: cpu.interlocked,
        };

        if cpu.stalled {
            return idle;
        }

        if is_syscall(presented.inst) && !cpu.ex_mem.squashes(presented.pc) {
            if cpu.trace {
                trace!(cycle = cpu.stats.cycles, stage = "IF", pc = next, "hold behind syscall");
            }
            return FetchOutput {
                if_id: Some(IfId {
                    current: IfIdEntry::default(),
                    prev: presented,
                }),
                ..idle
            };
        }

        let inst = cpu.memory.read_word(next);
        if cpu.trace {
            trace!(
                cycle = cpu.stats.cycles,
                stage = "IF",
                pc = %format!("{:#010x}", next),
                inst = %format!("{:#010x}", inst),
                "fetch"
            );
        }

        FetchOutput {
            pc: next.wrapping_add(4),
            if_id: Some(IfId {
                current: IfIdEntry { pc: next, inst },
                prev: presented,
            }),
            fetched: true,
            ..idle
        }
    }

    fn commit(cpu: &mut Cpu, out: FetchOutput) {
        cpu.pc = out.pc;
        if let Some(if_id) = out.if_id {
            cpu.if_id = if_id;
        }
        if out.fetched {
            cpu.stats.instructions += 1;
        }
        if out.discarded {
            cpu.stats.instructions = cpu.stats.instructions.saturating_sub(1);
        }
    }
}
