//! Data Hazard Detection and Forwarding.
//!
//! Every register carries two countdowns. `ready` is the number of cycles
//! until the newest in-flight value is committed to the register file;
//! `forward_ready` is the number of cycles until it appears on the
//! forwarding network. Decode claims both for each destination it accepts
//! and consults them for each source to pick a forwarding path or
//! interlock. Counters tick down once at the start of every cycle.

use tracing::debug;

use crate::core::arch::gpr::NUM_INT_REGS;
use crate::core::pipeline::latches::{ExMem, MemWb};
use crate::core::pipeline::signals::ForwardSrc;
use crate::isa::decode::Decoded;

/// Cycles between decode and architectural writeback.
pub const WRITE_LATENCY: u32 = 3;

/// Number of tracked FPR pairs.
pub const NUM_FPR_PAIRS: usize = 16;

/// Per-register ready/forward-ready counters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HazardTable {
    gpr_ready: [u32; NUM_INT_REGS],
    gpr_forward_ready: [u32; NUM_INT_REGS],
    fpr_ready: [u32; NUM_FPR_PAIRS],
}

impl Default for HazardTable {
    fn default() -> Self {
        Self {
            gpr_ready: [0; NUM_INT_REGS],
            gpr_forward_ready: [0; NUM_INT_REGS],
            fpr_ready: [0; NUM_FPR_PAIRS],
        }
    }
}

impl HazardTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decrements every non-zero counter by one.
    pub fn tick(&mut self) {
        for c in self
            .gpr_ready
            .iter_mut()
            .chain(self.gpr_forward_ready.iter_mut())
            .chain(self.fpr_ready.iter_mut())
        {
            *c = c.saturating_sub(1);
        }
    }

    /// Marks integer register `reg` as produced by a newly accepted instruction.
    pub fn claim_gpr(&mut self, reg: usize, forward_latency: u32) {
        if reg != 0 {
            self.gpr_ready[reg] = WRITE_LATENCY;
            self.gpr_forward_ready[reg] = forward_latency;
        }
    }

    /// Marks FPR `reg` (and its pair) as pending.
    pub fn claim_fpr(&mut self, reg: usize) {
        self.fpr_ready[reg >> 1] = WRITE_LATENCY;
    }

    pub fn gpr_ready(&self, reg: usize) -> u32 {
        self.gpr_ready[reg]
    }

    pub fn gpr_forward_ready(&self, reg: usize) -> u32 {
        self.gpr_forward_ready[reg]
    }

    pub fn fpr_ready(&self, reg: usize) -> u32 {
        self.fpr_ready[reg >> 1]
    }

    /// Forwarding path for a source consumed in Execute (`src1`, `src2`).
    ///
    /// `None` means the value cannot be obtained this cycle.
    fn execute_path(&self, reg: usize) -> Option<ForwardSrc> {
        if reg == 0 || self.gpr_ready[reg] == 0 {
            return Some(ForwardSrc::None);
        }
        match self.gpr_forward_ready[reg] {
            0 => Some(ForwardSrc::ExMem),
            1 => Some(ForwardSrc::Memory),
            _ => None,
        }
    }

    /// Forwarding path for a source consumed in Memory (`src3`).
    fn memory_path(&self, reg: usize) -> Option<ForwardSrc> {
        if reg == 0 || self.gpr_ready[reg] == 0 {
            return Some(ForwardSrc::None);
        }
        (self.gpr_forward_ready[reg] <= 1).then_some(ForwardSrc::MemWb)
    }
}

/// Outcome of checking an instruction's sources against the hazard table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Every source is available; forwarding tags for `src1..src3`.
    Ready([ForwardSrc; 3]),
    /// At least one source is not yet available.
    Interlock,
}

/// Decides forward-vs-stall for every source of `decoded`.
pub fn resolve_sources(table: &HazardTable, decoded: &Decoded) -> Resolution {
    let fwd1 = table.execute_path(decoded.src1);
    let fwd2 = table.execute_path(decoded.src2);
    let fwd3 = table.memory_path(decoded.src3);
    let fp_clear = decoded.fsrc.map_or(true, |f| table.fpr_ready(f) == 0);

    match (fwd1, fwd2, fwd3) {
        (Some(a), Some(b), Some(c)) if fp_clear => Resolution::Ready([a, b, c]),
        _ => {
            debug!(
                src1 = decoded.src1,
                src2 = decoded.src2,
                src3 = decoded.src3,
                fsrc = ?decoded.fsrc,
                "unresolved source hazard"
            );
            Resolution::Interlock
        }
    }
}

/// Produces the operand value for `reg` according to its forwarding tag.
///
/// `decoded` is the value read from the register file at decode. `ex_mem`
/// and `mem_wb` are the latches committed at the end of the previous cycle.
pub fn forward_operand(
    tag: ForwardSrc,
    reg: usize,
    decoded: u32,
    ex_mem: &ExMem,
    mem_wb: &MemWb,
) -> u32 {
    match tag {
        ForwardSrc::None => decoded,
        ForwardSrc::ExMem => ex_mem.forwarded(reg).unwrap_or(mem_wb.bypass[reg]),
        ForwardSrc::Memory | ForwardSrc::MemWb => mem_wb.bypass[reg],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::isa::decode::{decode, EXECUTE_FORWARD_LATENCY, LOAD_FORWARD_LATENCY};

    // add $3, $1, $2
    const ADD: u32 = 0x0022_1820;

    #[test]
    fn new_table_has_no_pending_writes() {
        let t = HazardTable::default();
        assert_eq!(t, HazardTable::new());
        for reg in 0..NUM_INT_REGS {
            assert_eq!((t.gpr_ready(reg), t.gpr_forward_ready(reg)), (0, 0));
        }
        for reg in (0..32).step_by(2) {
            assert_eq!(t.fpr_ready(reg), 0);
        }
    }

    #[test]
    fn register_zero_is_never_claimed() {
        let mut t = HazardTable::new();
        t.claim_gpr(0, LOAD_FORWARD_LATENCY);
        assert_eq!(t.gpr_ready(0), 0);
    }

    #[test]
    fn counters_saturate_at_zero() {
        let mut t = HazardTable::new();
        t.claim_gpr(5, EXECUTE_FORWARD_LATENCY);
        for _ in 0..5 {
            t.tick();
        }
        assert_eq!((t.gpr_ready(5), t.gpr_forward_ready(5)), (0, 0));
    }

    #[test]
    fn alu_result_forwards_next_cycle() {
        let mut t = HazardTable::new();
        t.claim_gpr(1, EXECUTE_FORWARD_LATENCY);
        t.tick();
        assert_eq!(
            resolve_sources(&t, &decode(ADD)),
            Resolution::Ready([ForwardSrc::ExMem, ForwardSrc::None, ForwardSrc::None])
        );
    }

    #[test]
    fn load_use_interlocks_once() {
        let mut t = HazardTable::new();
        t.claim_gpr(2, LOAD_FORWARD_LATENCY);
        t.tick();
        assert_eq!(resolve_sources(&t, &decode(ADD)), Resolution::Interlock);
        t.tick();
        assert_eq!(
            resolve_sources(&t, &decode(ADD)),
            Resolution::Ready([ForwardSrc::None, ForwardSrc::Memory, ForwardSrc::None])
        );
    }

    #[test]
    fn store_data_after_load_forwards_at_writeback() {
        // sw $2, 0($1)
        let sw = decode(0xAC22_0000);
        let mut t = HazardTable::new();
        t.claim_gpr(2, LOAD_FORWARD_LATENCY);
        t.tick();
        assert_eq!(resolve_sources(&t, &sw), Resolution::Interlock);
        t.tick();
        assert_eq!(
            resolve_sources(&t, &sw),
            Resolution::Ready([ForwardSrc::None, ForwardSrc::None, ForwardSrc::MemWb])
        );
    }

    #[test]
    fn fpr_sources_wait_for_commit() {
        // mfc1 $2, $f5 reads the pair tracked at index 2
        let mfc1 = decode(0x4402_2800);
        let mut t = HazardTable::new();
        t.claim_fpr(4);
        for _ in 0..2 {
            t.tick();
            assert_eq!(resolve_sources(&t, &mfc1), Resolution::Interlock);
        }
        t.tick();
        assert!(matches!(resolve_sources(&t, &mfc1), Resolution::Ready(_)));
    }

    #[test]
    fn ex_mem_tap_falls_back_to_bypass_image() {
        let mut mem_wb = MemWb::default();
        mem_wb.bypass[1] = 42;
        let ex_mem = ExMem::default();
        assert_eq!(forward_operand(ForwardSrc::ExMem, 1, 0, &ex_mem, &mem_wb), 42);
        assert_eq!(forward_operand(ForwardSrc::None, 1, 7, &ex_mem, &mem_wb), 7);
    }
}
