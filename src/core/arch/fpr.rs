//! Floating-Point Register File.
//!
//! Thirty-two 32-bit COP1 registers holding raw bit patterns. Only moves,
//! loads and stores touch them; no arithmetic is modelled. Even/odd pairs
//! form the double-precision registers, which is why hazard tracking works
//! on `index >> 1`.

/// Number of single-precision floating-point registers.
pub const NUM_FPRS: usize = 32;

/// Floating-point register file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Fpr {
    regs: [u32; NUM_FPRS],
}

impl Fpr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read(&self, idx: usize) -> u32 {
        self.regs[idx]
    }

    pub fn write(&mut self, idx: usize, val: u32) {
        self.regs[idx] = val;
    }

    /// Reads the even/odd pair containing `idx` as a double-precision value.
    ///
    /// The even register holds the low word.
    pub fn read_double(&self, idx: usize) -> f64 {
        let even = idx & !1;
        let bits = ((self.regs[even + 1] as u64) << 32) | self.regs[even] as u64;
        f64::from_bits(bits)
    }

    /// Dumps all registers to stdout, four per line.
    pub fn dump(&self) {
        for i in (0..NUM_FPRS).step_by(4) {
            println!(
                "$f{:<2}={:#010x}  $f{:<2}={:#010x}  $f{:<2}={:#010x}  $f{:<2}={:#010x}",
                i,
                self.regs[i],
                i + 1,
                self.regs[i + 1],
                i + 2,
                self.regs[i + 2],
                i + 3,
                self.regs[i + 3]
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_reads_as_double() {
        let mut f = Fpr::new();
        let bits = 1.5f64.to_bits();
        f.write(2, bits as u32);
        f.write(3, (bits >> 32) as u32);
        assert_eq!(f.read_double(3), 1.5);
    }
}
