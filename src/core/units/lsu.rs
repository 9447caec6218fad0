//! Load/Store Unit (LSU).
//!
//! Memory-stage handlers for every `MemOp`. Loads read memory directly and
//! return the value destined for the register file. Stores never write
//! memory themselves: they return a `StoreRequest` that the Memory stage
//! commits at the end of the cycle. The unaligned `lwl/lwr/swl/swr` family
//! follows big-endian byte numbering.

use crate::core::pipeline::signals::MemOp;
use crate::system::memory::Memory;

/// A pending memory write produced by a store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreRequest {
    Byte { addr: u32, val: u8 },
    Half { addr: u32, val: u16 },
    Word { addr: u32, val: u32 },
}

impl StoreRequest {
    /// Applies the write.
    pub fn commit(self, mem: &mut Memory) {
        match self {
            StoreRequest::Byte { addr, val } => mem.write_u8(addr, val),
            StoreRequest::Half { addr, val } => mem.write_u16(addr, val),
            StoreRequest::Word { addr, val } => mem.write_word(addr, val),
        }
    }
}

/// Load/Store Unit.
pub struct Lsu;

impl Lsu {
    /// Performs a load.
    ///
    /// `merge` is the current value of the destination register, used by
    /// `lwl`/`lwr` to keep the bytes they do not replace. `lwc1` returns the
    /// raw word for the FPR file.
    pub fn load(op: MemOp, mem: &Memory, addr: u32, merge: u32) -> u32 {
        match op {
            MemOp::Lb => mem.read_u8(addr) as i8 as i32 as u32,
            MemOp::Lbu => mem.read_u8(addr) as u32,
            MemOp::Lh => mem.read_u16(addr) as i16 as i32 as u32,
            MemOp::Lhu => mem.read_u16(addr) as u32,
            MemOp::Lw | MemOp::Lwc1 => mem.read_word(addr),
            MemOp::Lwl => {
                let (word, b) = Self::aligned(mem, addr);
                ((word << (8 * b)) | (merge as u64 & ((1 << (8 * b)) - 1))) as u32
            }
            MemOp::Lwr => {
                let (word, b) = Self::aligned(mem, addr);
                let sh = 8 * (3 - b);
                ((word >> sh) | (merge as u64 & !(0xFFFF_FFFF >> sh))) as u32
            }
            MemOp::Sb | MemOp::Sh | MemOp::Sw | MemOp::Swl | MemOp::Swr | MemOp::Swc1 => 0,
        }
    }

    /// Builds the write for a store of `data`.
    ///
    /// Returns `None` for load operations.
    pub fn store(op: MemOp, mem: &Memory, addr: u32, data: u32) -> Option<StoreRequest> {
        let req = match op {
            MemOp::Sb => StoreRequest::Byte {
                addr,
                val: data as u8,
            },
            MemOp::Sh => StoreRequest::Half {
                addr,
                val: data as u16,
            },
            MemOp::Sw | MemOp::Swc1 => StoreRequest::Word { addr, val: data },
            MemOp::Swl => {
                let (word, b) = Self::aligned(mem, addr);
                let sh = 8 * b;
                let val = (word & !(0xFFFF_FFFF >> sh)) | (data as u64 >> sh);
                StoreRequest::Word {
                    addr: addr & !3,
                    val: val as u32,
                }
            }
            MemOp::Swr => {
                let (word, b) = Self::aligned(mem, addr);
                let sh = 8 * (3 - b);
                let val = ((data as u64) << sh) | (word & ((1 << sh) - 1));
                StoreRequest::Word {
                    addr: addr & !3,
                    val: val as u32,
                }
            }
            _ => return None,
        };
        Some(req)
    }

    /// The aligned word containing `addr` and the byte offset within it.
    fn aligned(mem: &Memory, addr: u32) -> (u64, u64) {
        (mem.read_word(addr & !3) as u64, (addr & 3) as u64)
    }
}
