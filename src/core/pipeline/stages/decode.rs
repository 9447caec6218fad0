//! Instruction Decode (ID) Stage.
//!
//! Decodes the entry presented by IF/ID, checks its sources against the
//! hazard table and either issues it into ID/EX with forwarding tags or
//! replaces it with a bubble. Accepted instructions claim hazard counters
//! for every register they will write.

use tracing::{trace, warn};

use crate::core::pipeline::hazards::{resolve_sources, Resolution};
use crate::core::pipeline::latches::{IdEx, IfIdEntry};
use crate::core::pipeline::traits::PipelineStage;
use crate::core::Cpu;
use crate::isa::abi::{REG_HI, REG_LO};
use crate::isa::decode::{decode, Decoded};

/// Instruction decode stage.
pub struct Decode;

/// Why decode produced what it did this cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodeOutcome {
    /// Instruction issued; claims its destinations.
    Issued(Decoded),
    /// `syscall` issued; the pipeline stalls until it completes.
    Syscall,
    /// A syscall is in flight.
    Stalled,
    /// A source is not yet available; the entry is presented again next cycle.
    Interlock,
    /// Wrong-path fetch behind a taken branch.
    Squashed { was_fetch: bool },
    /// Unrecognized encoding, dropped.
    Illegal,
}

#[derive(Clone, Copy, Debug)]
pub struct DecodeOutput {
    pub id_ex: IdEx,
    pub outcome: DecodeOutcome,
}

impl DecodeOutput {
    fn bubble(outcome: DecodeOutcome) -> Self {
        Self {
            id_ex: IdEx::bubble(),
            outcome,
        }
    }
}

/// Reads an integer register as it will be after this cycle's writeback.
fn read_gpr(cpu: &Cpu, reg: usize) -> u32 {
    cpu.mem_wb
        .writes(reg)
        .unwrap_or_else(|| cpu.regs.read(reg))
}

/// Reads an FPR as it will be after this cycle's writeback.
fn read_fpr(cpu: &Cpu, reg: usize) -> u32 {
    cpu.mem_wb
        .writes_fpr(reg)
        .unwrap_or_else(|| cpu.fregs.read(reg))
}

impl PipelineStage for Decode {
    type Output = DecodeOutput;

    fn compute(cpu: &Cpu) -> DecodeOutput {
        if cpu.stalled {
            return DecodeOutput::bubble(DecodeOutcome::Stalled);
        }

        let entry = cpu.if_id.presented(cpu.interlocked);
        if cpu.ex_mem.squashes(entry.pc) {
            return DecodeOutput::bubble(DecodeOutcome::Squashed {
                was_fetch: entry != IfIdEntry::default(),
            });
        }

        let d = decode(entry.inst);
        if d.ctrl.is_illegal {
            warn!(
                cycle = cpu.stats.cycles,
                pc = %format!("{:#010x}", entry.pc),
                inst = %format!("{:#010x}", entry.inst),
                "illegal instruction treated as nop"
            );
            return DecodeOutput::bubble(DecodeOutcome::Illegal);
        }

        let mut ctrl = d.ctrl;
        ctrl.bdslot = cpu.last_control_pc == Some(entry.pc.wrapping_sub(4));

        if ctrl.is_syscall {
            if cpu.trace {
                trace!(cycle = cpu.stats.cycles, stage = "ID", pc = entry.pc, "syscall, stalling");
            }
            return DecodeOutput {
                id_ex: IdEx {
                    pc: entry.pc,
                    inst: entry.inst,
                    exec: d.exec,
                    ctrl,
                    ..IdEx::bubble()
                },
                outcome: DecodeOutcome::Syscall,
            };
        }

        let [fwd1, fwd2, fwd3] = match resolve_sources(&cpu.hazards, &d) {
            Resolution::Ready(tags) => tags,
            Resolution::Interlock => {
                if cpu.trace {
                    trace!(cycle = cpu.stats.cycles, stage = "ID", pc = entry.pc, "interlock");
                }
                return DecodeOutput::bubble(DecodeOutcome::Interlock);
            }
        };

        if ctrl.bdslot && d.exec.is_control_transfer() {
            warn!(
                cycle = cpu.stats.cycles,
                pc = %format!("{:#010x}", entry.pc),
                "branch or jump in a delay slot"
            );
        }

        if cpu.trace {
            trace!(
                cycle = cpu.stats.cycles,
                stage = "ID",
                pc = %format!("{:#010x}", entry.pc),
                exec = ?d.exec,
                fwd = ?[fwd1, fwd2, fwd3],
                bdslot = ctrl.bdslot,
                "issue"
            );
        }

        DecodeOutput {
            id_ex: IdEx {
                pc: entry.pc,
                inst: entry.inst,
                src1: d.src1,
                src2: d.src2,
                src3: d.src3,
                rv1: read_gpr(cpu, d.src1),
                rv2: read_gpr(cpu, d.src2),
                rv3: read_gpr(cpu, d.src3),
                fv: d.fsrc.map_or(0, |f| read_fpr(cpu, f)),
                dst: d.dst,
                imm: d.imm,
                shamt: d.shamt,
                exec: d.exec,
                mem: d.mem,
                ctrl,
                fwd1,
                fwd2,
                fwd3,
            },
            outcome: DecodeOutcome::Issued(d),
        }
    }

    fn commit(cpu: &mut Cpu, out: DecodeOutput) {
        cpu.id_ex = out.id_ex;
        cpu.interlocked = out.outcome == DecodeOutcome::Interlock;

        match out.outcome {
            DecodeOutcome::Issued(d) => {
                let latency = d.forward_latency();
                if d.ctrl.reg_write {
                    cpu.hazards.claim_gpr(d.dst, latency);
                }
                if d.ctrl.hi_write {
                    cpu.hazards.claim_gpr(REG_HI, latency);
                }
                if d.ctrl.lo_write {
                    cpu.hazards.claim_gpr(REG_LO, latency);
                }
                if d.ctrl.fp_reg_write {
                    cpu.hazards.claim_fpr(d.dst);
                }
                if d.ctrl.is_fp {
                    cpu.stats.fp_instructions += 1;
                }
                cpu.last_control_pc = d.exec.is_control_transfer().then_some(out.id_ex.pc);
            }
            DecodeOutcome::Syscall => {
                cpu.stalled = true;
                cpu.stats.syscalls += 1;
                cpu.last_control_pc = None;
            }
            DecodeOutcome::Stalled => cpu.stats.syscall_stall_cycles += 1,
            DecodeOutcome::Interlock => cpu.stats.interlock_cycles += 1,
            DecodeOutcome::Squashed { was_fetch } => {
                if was_fetch {
                    cpu.stats.squashed += 1;
                    cpu.stats.instructions = cpu.stats.instructions.saturating_sub(1);
                }
            }
            DecodeOutcome::Illegal => cpu.stats.illegal_instructions += 1,
        }
    }
}
