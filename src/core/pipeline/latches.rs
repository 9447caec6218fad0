//! Pipeline latch structures for inter-stage communication.
//!
//! Each latch is a snapshot written once per cycle by the stage in front of
//! it (phase 1) and read by the stage behind it during the next cycle
//! (phase 0). A default latch is a bubble.

use crate::core::arch::gpr::NUM_INT_REGS;
use crate::core::pipeline::signals::{ControlSignals, ExecOp, ForwardSrc, MemOp};
use crate::core::pipeline::traits::PipelineLatch;
use crate::isa::abi::{REG_HI, REG_LO};

/// One fetched instruction.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct IfIdEntry {
    /// Program counter of the instruction.
    pub pc: u32,
    /// Raw instruction word (0 is a bubble/nop).
    pub inst: u32,
}

/// IF/ID latch (Fetch to Decode).
///
/// Keeps the entry presented to decode in the previous cycle so that an
/// interlocked instruction can be presented again while the fetch behind
/// it is discarded.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct IfId {
    /// Instruction fetched last cycle.
    pub current: IfIdEntry,
    /// Instruction that was presented to decode last cycle.
    pub prev: IfIdEntry,
}

impl IfId {
    /// The entry decode works on this cycle.
    pub fn presented(&self, interlocked: bool) -> IfIdEntry {
        if interlocked {
            self.prev
        } else {
            self.current
        }
    }
}

/// ID/EX latch (Decode to Execute).
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct IdEx {
    pub pc: u32,
    pub inst: u32,
    pub src1: usize,
    pub src2: usize,
    pub src3: usize,
    /// Values read from the register file at decode.
    pub rv1: u32,
    pub rv2: u32,
    pub rv3: u32,
    /// FPR source value (FPRs are never forwarded).
    pub fv: u32,
    pub dst: usize,
    pub imm: u16,
    pub shamt: u32,
    pub exec: ExecOp,
    pub mem: Option<MemOp>,
    pub ctrl: ControlSignals,
    pub fwd1: ForwardSrc,
    pub fwd2: ForwardSrc,
    pub fwd3: ForwardSrc,
}

impl IdEx {
    pub fn bubble() -> Self {
        Self::default()
    }
}

/// EX/MEM latch (Execute to Memory).
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct ExMem {
    pub pc: u32,
    pub inst: u32,
    pub dst: usize,
    pub src3: usize,
    /// Third operand as decoded; the Memory stage applies `fwd3` to it.
    pub rv3: u32,
    pub fv: u32,
    /// GPR/FPR result, link address or effective address.
    pub result: u32,
    pub hi: u32,
    pub lo: u32,
    pub mem: Option<MemOp>,
    pub ctrl: ControlSignals,
    pub fwd3: ForwardSrc,
    pub branch_taken: bool,
    pub branch_target: u32,
}

impl ExMem {
    /// Value this instruction produces for integer register `reg`, if it
    /// produced one in Execute.
    ///
    /// Loads have nothing to offer yet.
    pub fn forwarded(&self, reg: usize) -> Option<u32> {
        if reg == 0 {
            return None;
        }
        match reg {
            REG_HI if self.ctrl.hi_write => Some(self.hi),
            REG_LO if self.ctrl.lo_write => Some(self.lo),
            r if r < 32 && self.ctrl.reg_write && self.dst == r && !self.is_load() => {
                Some(self.result)
            }
            _ => None,
        }
    }

    /// Fetch redirect target once the delay slot has been fetched.
    pub fn redirect(&self) -> Option<u32> {
        self.branch_taken.then_some(self.branch_target)
    }

    /// Returns `true` if `pc` is on the wrong path behind this taken branch.
    pub fn squashes(&self, pc: u32) -> bool {
        self.branch_taken && pc != self.pc.wrapping_add(4)
    }

    fn is_load(&self) -> bool {
        self.mem.is_some_and(|op| op.is_load())
    }
}

/// MEM/WB latch (Memory to Writeback).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemWb {
    pub pc: u32,
    pub inst: u32,
    pub dst: usize,
    /// Final GPR/FPR result (loaded value for loads).
    pub result: u32,
    pub hi: u32,
    pub lo: u32,
    pub mem: Option<MemOp>,
    pub ctrl: ControlSignals,
    /// Forwarded register file: newest value of every GPR/HI/LO that has
    /// passed the Memory stage.
    pub bypass: [u32; NUM_INT_REGS],
}

impl Default for MemWb {
    fn default() -> Self {
        Self {
            pc: 0,
            inst: 0,
            dst: 0,
            result: 0,
            hi: 0,
            lo: 0,
            mem: None,
            ctrl: ControlSignals::default(),
            bypass: [0; NUM_INT_REGS],
        }
    }
}

impl MemWb {
    /// Value this instruction commits to integer register `reg`, if any.
    pub fn writes(&self, reg: usize) -> Option<u32> {
        if reg == 0 {
            return None;
        }
        match reg {
            REG_HI if self.ctrl.hi_write => Some(self.hi),
            REG_LO if self.ctrl.lo_write => Some(self.lo),
            r if r < 32 && self.ctrl.reg_write && self.dst == r => Some(self.result),
            _ => None,
        }
    }

    /// Value this instruction commits to FPR `reg`, if any.
    pub fn writes_fpr(&self, reg: usize) -> Option<u32> {
        (self.ctrl.fp_reg_write && self.dst == reg).then_some(self.result)
    }
}

impl PipelineLatch for IfIdEntry {
    fn is_bubble(&self) -> bool {
        self.inst == 0
    }
}

impl PipelineLatch for IdEx {
    fn is_bubble(&self) -> bool {
        self.inst == 0
    }
}

impl PipelineLatch for ExMem {
    fn is_bubble(&self) -> bool {
        self.inst == 0
    }
}

impl PipelineLatch for MemWb {
    fn is_bubble(&self) -> bool {
        self.inst == 0
    }
}
