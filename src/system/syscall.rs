//! Syscall emulation.
//!
//! A `syscall` reaching writeback hands control to a `SyscallHandler`
//! while the rest of the pipeline is stalled. The handler sees the
//! committed register file and memory through a `SyscallContext`, which
//! counts the loads and stores it performs so they can be reported apart
//! from pipeline memory traffic.
//!
//! `SpimSyscalls` implements the SPIM/MARS service numbers selected by `$v0`.

use std::io::{self, BufRead, Write};

use tracing::{debug, warn};

use crate::core::arch::gpr::Gpr;
use crate::isa::abi::{REG_A0, REG_A1, REG_V0};
use crate::system::memory::Memory;

pub const SYS_PRINT_INT: u32 = 1;
pub const SYS_PRINT_STRING: u32 = 4;
pub const SYS_READ_INT: u32 = 5;
pub const SYS_READ_STRING: u32 = 8;
pub const SYS_SBRK: u32 = 9;
pub const SYS_EXIT: u32 = 10;
pub const SYS_PRINT_CHAR: u32 = 11;
pub const SYS_READ_CHAR: u32 = 12;
pub const SYS_EXIT2: u32 = 17;
pub const SYS_TIME: u32 = 30;
pub const SYS_PRINT_HEX: u32 = 34;
pub const SYS_PRINT_UINT: u32 = 36;

/// Upper bound on the length of a guest string printed by `print_string`.
const MAX_STRING_LEN: usize = 1 << 16;

/// What the pipeline does after a syscall.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyscallOutcome {
    /// Clear the stall and resume fetching.
    Continue,
    /// Stop the simulation with this exit code.
    Exit(i32),
}

/// Architectural state visible to a syscall.
pub struct SyscallContext<'a> {
    pub regs: &'a mut Gpr,
    pub memory: &'a mut Memory,
    /// Simulated cycle at which the syscall runs.
    pub cycle: u64,
    /// Memory reads performed on behalf of the guest.
    pub loads: u64,
    /// Memory writes performed on behalf of the guest.
    pub stores: u64,
}

impl<'a> SyscallContext<'a> {
    pub fn new(regs: &'a mut Gpr, memory: &'a mut Memory, cycle: u64) -> Self {
        Self {
            regs,
            memory,
            cycle,
            loads: 0,
            stores: 0,
        }
    }

    pub fn reg(&self, idx: usize) -> u32 {
        self.regs.read(idx)
    }

    pub fn set_reg(&mut self, idx: usize, val: u32) {
        self.regs.write(idx, val);
    }

    pub fn get_byte(&mut self, addr: u32) -> u8 {
        self.loads += 1;
        self.memory.read_u8(addr)
    }

    pub fn set_byte(&mut self, addr: u32, val: u8) {
        self.stores += 1;
        self.memory.write_u8(addr, val);
    }

    pub fn get_word(&mut self, addr: u32) -> u32 {
        self.loads += 1;
        self.memory.read_word(addr)
    }

    pub fn set_word(&mut self, addr: u32, val: u32) {
        self.stores += 1;
        self.memory.write_word(addr, val);
    }

    /// Reads a NUL-terminated guest string, counting one load per byte.
    pub fn get_string(&mut self, addr: u32) -> Vec<u8> {
        let s = self.memory.read_cstr(addr, MAX_STRING_LEN);
        self.loads += s.len() as u64 + 1;
        s
    }
}

/// Emulates the guest operating system.
pub trait SyscallHandler {
    /// Runs the service selected by the guest's registers.
    fn emulate(&mut self, ctx: &mut SyscallContext<'_>) -> SyscallOutcome;

    /// Restores boot-time state. Called on every reboot.
    fn reset(&mut self) {}
}

/// SPIM-compatible syscall services over arbitrary host streams.
pub struct SpimSyscalls<W, R> {
    out: W,
    input: R,
    heap_base: u32,
    heap_break: u32,
}

impl SpimSyscalls<io::Stdout, io::StdinLock<'static>> {
    /// Services bound to the process's stdout and stdin.
    pub fn stdio(heap_base: u32) -> Self {
        Self::new(io::stdout(), io::stdin().lock(), heap_base)
    }
}

impl<W: Write, R: BufRead> SpimSyscalls<W, R> {
    pub fn new(out: W, input: R, heap_base: u32) -> Self {
        Self {
            out,
            input,
            heap_base,
            heap_break: heap_base,
        }
    }

    /// Current program break.
    pub fn heap_break(&self) -> u32 {
        self.heap_break
    }

    fn print(&mut self, text: &[u8]) {
        let res = self.out.write_all(text).and_then(|_| self.out.flush());
        if let Err(e) = res {
            warn!(error = %e, "syscall output failed");
        }
    }

    fn read_line(&mut self) -> String {
        let mut line = String::new();
        if let Err(e) = self.input.read_line(&mut line) {
            warn!(error = %e, "syscall input failed");
        }
        line
    }

    fn read_int(&mut self) -> u32 {
        let line = self.read_line();
        let text = line.trim();
        match text.parse::<i32>() {
            Ok(v) => v as u32,
            Err(_) => {
                warn!(input = text, "read_int got a non-integer, returning 0");
                0
            }
        }
    }

    /// SPIM `read_string`: at most `len - 1` bytes, always NUL-terminated.
    fn read_string(&mut self, ctx: &mut SyscallContext<'_>, buf: u32, len: u32) {
        if len == 0 {
            return;
        }
        let line = self.read_line();
        let bytes = line.as_bytes();
        let n = bytes.len().min(len as usize - 1);
        for (i, b) in bytes[..n].iter().enumerate() {
            ctx.set_byte(buf.wrapping_add(i as u32), *b);
        }
        ctx.set_byte(buf.wrapping_add(n as u32), 0);
    }

    fn read_char(&mut self) -> u32 {
        let mut byte = [0u8; 1];
        match self.input.read(&mut byte) {
            Ok(1) => byte[0] as u32,
            Ok(_) => u32::MAX,
            Err(e) => {
                warn!(error = %e, "syscall input failed");
                u32::MAX
            }
        }
    }
}

impl<W: Write, R: BufRead> SyscallHandler for SpimSyscalls<W, R> {
    fn emulate(&mut self, ctx: &mut SyscallContext<'_>) -> SyscallOutcome {
        let service = ctx.reg(REG_V0);
        let a0 = ctx.reg(REG_A0);
        debug!(service, a0, cycle = ctx.cycle, "syscall");

        match service {
            SYS_PRINT_INT => self.print((a0 as i32).to_string().as_bytes()),
            SYS_PRINT_STRING => {
                let s = ctx.get_string(a0);
                self.print(&s);
            }
            SYS_READ_INT => {
                let v = self.read_int();
                ctx.set_reg(REG_V0, v);
            }
            SYS_READ_STRING => {
                let len = ctx.reg(REG_A1);
                self.read_string(ctx, a0, len);
            }
            SYS_SBRK => {
                let old = self.heap_break;
                let amount = (a0 as i32).wrapping_add(3) & !3;
                self.heap_break = self.heap_break.wrapping_add(amount as u32);
                ctx.set_reg(REG_V0, old);
            }
            SYS_EXIT => return SyscallOutcome::Exit(0),
            SYS_PRINT_CHAR => self.print(&[a0 as u8]),
            SYS_READ_CHAR => {
                let c = self.read_char();
                ctx.set_reg(REG_V0, c);
            }
            SYS_EXIT2 => return SyscallOutcome::Exit(a0 as i32),
            SYS_TIME => {
                ctx.set_reg(REG_A0, ctx.cycle as u32);
                ctx.set_reg(REG_A1, (ctx.cycle >> 32) as u32);
            }
            SYS_PRINT_HEX => self.print(format!("{:#010x}", a0).as_bytes()),
            SYS_PRINT_UINT => self.print(a0.to_string().as_bytes()),
            _ => warn!(service, cycle = ctx.cycle, "unknown syscall ignored"),
        }
        SyscallOutcome::Continue
    }

    fn reset(&mut self) {
        self.heap_break = self.heap_base;
    }
}
