//! Big-endian guest memory.
//!
//! The full 32-bit address space is backed by 4 KiB pages allocated on
//! first write, so text, data, heap and stack can sit at their usual MIPS
//! addresses without reserving gigabytes. Reads of untouched memory
//! return zero. Halfword and word accesses are big-endian and need not be
//! aligned.

use std::collections::HashMap;

use crate::common::{SimError, SimResult};

const PAGE_SHIFT: u32 = 12;
const PAGE_SIZE: usize = 1 << PAGE_SHIFT;
const PAGE_MASK: u32 = (PAGE_SIZE as u32) - 1;

/// Sparse byte-addressable memory.
#[derive(Clone, Debug, Default)]
pub struct Memory {
    pages: HashMap<u32, Box<[u8; PAGE_SIZE]>>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every page.
    pub fn clear(&mut self) {
        self.pages.clear();
    }

    /// Number of pages that have been written.
    pub fn resident_pages(&self) -> usize {
        self.pages.len()
    }

    #[inline(always)]
    pub fn read_u8(&self, addr: u32) -> u8 {
        self.pages
            .get(&(addr >> PAGE_SHIFT))
            .map_or(0, |page| page[(addr & PAGE_MASK) as usize])
    }

    #[inline(always)]
    pub fn write_u8(&mut self, addr: u32, val: u8) {
        let page = self
            .pages
            .entry(addr >> PAGE_SHIFT)
            .or_insert_with(|| Box::new([0; PAGE_SIZE]));
        page[(addr & PAGE_MASK) as usize] = val;
    }

    pub fn read_u16(&self, addr: u32) -> u16 {
        u16::from_be_bytes([self.read_u8(addr), self.read_u8(addr.wrapping_add(1))])
    }

    pub fn write_u16(&mut self, addr: u32, val: u16) {
        for (i, b) in val.to_be_bytes().into_iter().enumerate() {
            self.write_u8(addr.wrapping_add(i as u32), b);
        }
    }

    pub fn read_word(&self, addr: u32) -> u32 {
        u32::from_be_bytes([
            self.read_u8(addr),
            self.read_u8(addr.wrapping_add(1)),
            self.read_u8(addr.wrapping_add(2)),
            self.read_u8(addr.wrapping_add(3)),
        ])
    }

    pub fn write_word(&mut self, addr: u32, val: u32) {
        for (i, b) in val.to_be_bytes().into_iter().enumerate() {
            self.write_u8(addr.wrapping_add(i as u32), b);
        }
    }

    /// Copies `data` into memory starting at `base`.
    pub fn load_image(&mut self, data: &[u8], base: u32) -> SimResult<()> {
        if base as u64 + data.len() as u64 > 1u64 << 32 {
            return Err(SimError::ImageTooLarge {
                base,
                len: data.len(),
            });
        }
        for (i, byte) in data.iter().enumerate() {
            self.write_u8(base + i as u32, *byte);
        }
        Ok(())
    }

    /// Reads a NUL-terminated string, stopping after `limit` bytes.
    pub fn read_cstr(&self, addr: u32, limit: usize) -> Vec<u8> {
        (0..limit as u32)
            .map(|i| self.read_u8(addr.wrapping_add(i)))
            .take_while(|&b| b != 0)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn words_are_big_endian() {
        let mut mem = Memory::new();
        mem.write_word(0x1000_0000, 0x1122_3344);
        assert_eq!(mem.read_u8(0x1000_0000), 0x11);
        assert_eq!(mem.read_u8(0x1000_0003), 0x44);
        assert_eq!(mem.read_u16(0x1000_0002), 0x3344);
    }

    #[test]
    fn word_straddles_pages() {
        let mut mem = Memory::new();
        mem.write_word(0x0000_0FFE, 0xDEAD_BEEF);
        assert_eq!(mem.read_word(0x0000_0FFE), 0xDEAD_BEEF);
        assert_eq!(mem.resident_pages(), 2);
    }

    #[test]
    fn untouched_memory_reads_zero() {
        let mem = Memory::new();
        assert_eq!(mem.read_word(0x7FFF_EFFC), 0);
        assert_eq!(mem.resident_pages(), 0);
    }

    #[test]
    fn image_past_top_of_memory_is_rejected() {
        let mut mem = Memory::new();
        let err = mem.load_image(&[0; 8], 0xFFFF_FFFC).unwrap_err();
        assert!(matches!(err, SimError::ImageTooLarge { len: 8, .. }));
        assert!(mem.load_image(&[1, 2, 3, 4], 0xFFFF_FFFC).is_ok());
        assert_eq!(mem.read_word(0xFFFF_FFFC), 0x0102_0304);
    }

    #[test]
    fn cstr_stops_at_nul() {
        let mut mem = Memory::new();
        mem.load_image(b"hi\0there", 0x100).unwrap();
        assert_eq!(mem.read_cstr(0x100, 64), b"hi");
    }
}
