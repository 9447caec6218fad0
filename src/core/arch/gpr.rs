//! MIPS General-Purpose Register File.
//!
//! Holds the 32 general-purpose registers together with HI and LO, which
//! are addressed through the pseudo-indices 32 and 33 so that hazard
//! tracking and forwarding treat all three classes uniformly. Register $0
//! is hardwired to zero.

use crate::isa::abi::{GPR_NAMES, REG_HI, REG_LO};

/// Number of tracked integer registers: 32 GPRs plus HI and LO.
pub const NUM_INT_REGS: usize = 34;

/// General-purpose register file with HI/LO.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Gpr {
    regs: [u32; NUM_INT_REGS],
}

impl Default for Gpr {
    fn default() -> Self {
        Self::new()
    }
}

impl Gpr {
    /// Creates a register file with every register zeroed.
    pub fn new() -> Self {
        Self {
            regs: [0; NUM_INT_REGS],
        }
    }

    /// Reads a register. Index 0 always returns 0.
    pub fn read(&self, idx: usize) -> u32 {
        if idx == 0 {
            0
        } else {
            self.regs[idx]
        }
    }

    /// Writes a register. Writes to index 0 are discarded.
    pub fn write(&mut self, idx: usize, val: u32) {
        if idx != 0 {
            self.regs[idx] = val;
        }
    }

    pub fn hi(&self) -> u32 {
        self.regs[REG_HI]
    }

    pub fn lo(&self) -> u32 {
        self.regs[REG_LO]
    }

    /// Dumps all registers to stdout, four per line, then HI and LO.
    pub fn dump(&self) {
        for i in (0..32).step_by(4) {
            let line: Vec<String> = (i..i + 4)
                .map(|r| format!("${:<2} {:<4}={:#010x}", r, GPR_NAMES[r], self.regs[r]))
                .collect();
            println!("{}", line.join("  "));
        }
        println!("hi={:#010x}  lo={:#010x}", self.hi(), self.lo());
    }
}
