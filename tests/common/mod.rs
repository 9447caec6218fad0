//! Shared test harness: a tiny MIPS assembler and a simulator wrapper that
//! captures syscall output.

#![allow(dead_code)]

use std::cell::RefCell;
use std::io::{self, Cursor, Write};
use std::rc::Rc;

use mips_pipeline::system::SpimSyscalls;
use mips_pipeline::{Config, RunOutcome, Simulator};

pub const TEXT_BASE: u32 = 0x0040_0000;
pub const DATA_BASE: u32 = 0x1001_0000;

/// Address of the `idx`-th instruction word.
pub fn addr_of(idx: u32) -> u32 {
    TEXT_BASE + 4 * idx
}

pub mod asm {
    fn r(rs: usize, rt: usize, rd: usize, shamt: u32, funct: u32) -> u32 {
        ((rs as u32) << 21) | ((rt as u32) << 16) | ((rd as u32) << 11) | (shamt << 6) | funct
    }

    fn i(op: u32, rs: usize, rt: usize, imm: i32) -> u32 {
        (op << 26) | ((rs as u32) << 21) | ((rt as u32) << 16) | (imm as u32 & 0xFFFF)
    }

    pub const NOP: u32 = 0;
    pub const SYSCALL: u32 = 0x0000_000C;

    pub fn li(rt: usize, imm: i32) -> u32 {
        addiu(rt, 0, imm)
    }
    pub fn addiu(rt: usize, rs: usize, imm: i32) -> u32 {
        i(0x09, rs, rt, imm)
    }
    pub fn ori(rt: usize, rs: usize, imm: i32) -> u32 {
        i(0x0D, rs, rt, imm)
    }
    pub fn lui(rt: usize, imm: i32) -> u32 {
        i(0x0F, 0, rt, imm)
    }
    pub fn add(rd: usize, rs: usize, rt: usize) -> u32 {
        r(rs, rt, rd, 0, 0x20)
    }
    pub fn addu(rd: usize, rs: usize, rt: usize) -> u32 {
        r(rs, rt, rd, 0, 0x21)
    }
    pub fn sll(rd: usize, rt: usize, sa: u32) -> u32 {
        r(0, rt, rd, sa, 0x00)
    }
    pub fn mult(rs: usize, rt: usize) -> u32 {
        r(rs, rt, 0, 0, 0x18)
    }
    pub fn div(rs: usize, rt: usize) -> u32 {
        r(rs, rt, 0, 0, 0x1A)
    }
    pub fn mfhi(rd: usize) -> u32 {
        r(0, 0, rd, 0, 0x10)
    }
    pub fn mflo(rd: usize) -> u32 {
        r(0, 0, rd, 0, 0x12)
    }
    pub fn jr(rs: usize) -> u32 {
        r(rs, 0, 0, 0, 0x08)
    }
    pub fn lw(rt: usize, off: i32, base: usize) -> u32 {
        i(0x23, base, rt, off)
    }
    pub fn lb(rt: usize, off: i32, base: usize) -> u32 {
        i(0x20, base, rt, off)
    }
    pub fn lwl(rt: usize, off: i32, base: usize) -> u32 {
        i(0x22, base, rt, off)
    }
    pub fn lwr(rt: usize, off: i32, base: usize) -> u32 {
        i(0x26, base, rt, off)
    }
    pub fn sw(rt: usize, off: i32, base: usize) -> u32 {
        i(0x2B, base, rt, off)
    }
    pub fn sb(rt: usize, off: i32, base: usize) -> u32 {
        i(0x28, base, rt, off)
    }
    /// `off` is in instructions, relative to the delay slot.
    pub fn beq(rs: usize, rt: usize, off: i32) -> u32 {
        i(0x04, rs, rt, off)
    }
    pub fn bne(rs: usize, rt: usize, off: i32) -> u32 {
        i(0x05, rs, rt, off)
    }
    pub fn j(addr: u32) -> u32 {
        (0x02 << 26) | ((addr >> 2) & 0x03FF_FFFF)
    }
    pub fn jal(addr: u32) -> u32 {
        (0x03 << 26) | ((addr >> 2) & 0x03FF_FFFF)
    }
    pub fn mtc1(rt: usize, fs: usize) -> u32 {
        (0x11 << 26) | (0x04 << 21) | ((rt as u32) << 16) | ((fs as u32) << 11)
    }
    pub fn mfc1(rt: usize, fs: usize) -> u32 {
        (0x11 << 26) | ((rt as u32) << 16) | ((fs as u32) << 11)
    }
}

/// Big-endian bytes of a word list.
pub fn to_image(words: &[u32]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_be_bytes()).collect()
}

/// Host stream shared between the syscall layer and the test.
#[derive(Clone, Default)]
pub struct SharedBuf(Rc<RefCell<Vec<u8>>>);

impl SharedBuf {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub struct TestContext {
    pub sim: Simulator,
    pub output: SharedBuf,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_input("")
    }

    pub fn with_input(input: &str) -> Self {
        let config = Config::default();
        let output = SharedBuf::default();
        let syscalls = SpimSyscalls::new(
            output.clone(),
            Cursor::new(input.as_bytes().to_vec()),
            config.syscall.heap_base_val(),
        );
        let mut sim = Simulator::new(&config, Box::new(syscalls));
        sim.set_max_cycles(Some(10_000));
        Self { sim, output }
    }

    pub fn load(mut self, words: &[u32]) -> Self {
        self.sim.boot(&to_image(words)).expect("boot");
        self
    }

    pub fn poke_bytes(&mut self, addr: u32, bytes: &[u8]) {
        for (i, b) in bytes.iter().enumerate() {
            self.sim.cpu.memory.write_u8(addr + i as u32, *b);
        }
    }

    pub fn run(&mut self) -> RunOutcome {
        self.sim.run().expect("run")
    }

    pub fn reg(&self, idx: usize) -> u32 {
        self.sim.cpu.regs.read(idx)
    }
}

/// Boots `words` and runs them to completion.
pub fn run_program(words: &[u32]) -> TestContext {
    let mut ctx = TestContext::new().load(words);
    ctx.run();
    ctx
}

/// `li $v0, 10; syscall`
pub fn exit_seq() -> [u32; 2] {
    [asm::li(2, 10), asm::SYSCALL]
}
