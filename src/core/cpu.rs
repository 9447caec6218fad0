//! Processor state and the two-phase clock.
//!
//! `Cpu` owns everything that changes while a program runs: the pipeline
//! latches, register files, hazard table, PC, stall/interlock flags,
//! guest memory, the syscall layer and the statistics. `tick` advances it
//! by exactly one cycle.

use crate::config::Config;
use crate::core::arch::fpr::Fpr;
use crate::core::arch::gpr::Gpr;
use crate::core::pipeline::hazards::HazardTable;
use crate::core::pipeline::latches::{ExMem, IdEx, IfId, MemWb};
use crate::core::pipeline::stages::{Decode, Execute, Fetch, MemoryAccess, Writeback};
use crate::core::pipeline::traits::PipelineStage;
use crate::common::SimResult;
use crate::isa::abi::{REG_GP, REG_SP};
use crate::stats::SimStats;
use crate::system::memory::Memory;
use crate::system::syscall::SyscallHandler;

/// Addresses used to place and start an image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BootLayout {
    pub image_base: u32,
    pub boot_pc: u32,
    pub stack_pointer: u32,
    pub global_pointer: u32,
}

impl BootLayout {
    pub fn from_config(config: &Config) -> Self {
        Self {
            image_base: config.memory.image_base_val(),
            boot_pc: config.general.boot_pc_val(),
            stack_pointer: config.memory.stack_pointer_val(),
            global_pointer: config.memory.global_pointer_val(),
        }
    }
}

pub struct Cpu {
    pub regs: Gpr,
    pub fregs: Fpr,
    pub hazards: HazardTable,
    pub pc: u32,

    pub if_id: IfId,
    pub id_ex: IdEx,
    pub ex_mem: ExMem,
    pub mem_wb: MemWb,

    /// A syscall is in flight; fetch and decode are idle.
    pub stalled: bool,
    /// Decode rejected its instruction last cycle and sees it again.
    pub interlocked: bool,
    /// PC of the last issued branch or jump, for delay-slot marking.
    pub last_control_pc: Option<u32>,

    pub memory: Memory,
    pub syscalls: Box<dyn SyscallHandler>,
    pub layout: BootLayout,

    pub stats: SimStats,
    pub trace: bool,
    pub sim_exit: bool,
    pub exit_code: Option<i32>,
}

impl Cpu {
    pub fn new(config: &Config, syscalls: Box<dyn SyscallHandler>) -> Self {
        Self {
            regs: Gpr::new(),
            fregs: Fpr::new(),
            hazards: HazardTable::new(),
            pc: 0,
            if_id: IfId::default(),
            id_ex: IdEx::default(),
            ex_mem: ExMem::default(),
            mem_wb: MemWb::default(),
            stalled: false,
            interlocked: false,
            last_control_pc: None,
            memory: Memory::new(),
            syscalls,
            layout: BootLayout::from_config(config),
            stats: SimStats::default(),
            trace: config.general.trace || cfg!(feature = "always-trace"),
            sim_exit: false,
            exit_code: None,
        }
    }

    /// Resets all state, loads `image` and points the PC at the boot address.
    ///
    /// Memory is cleared first, so rebooting the same image twice yields the
    /// same run.
    pub fn reboot(&mut self, image: &[u8]) -> SimResult<()> {
        self.memory.clear();
        self.memory.load_image(image, self.layout.image_base)?;

        self.regs = Gpr::new();
        self.fregs = Fpr::new();
        self.regs.write(REG_SP, self.layout.stack_pointer);
        self.regs.write(REG_GP, self.layout.global_pointer);
        self.hazards = HazardTable::new();

        self.if_id = IfId::default();
        self.id_ex = IdEx::default();
        self.ex_mem = ExMem::default();
        self.mem_wb = MemWb::default();

        self.stalled = false;
        self.interlocked = false;
        self.last_control_pc = None;
        self.stats = SimStats::default();
        self.sim_exit = false;
        self.exit_code = None;
        self.syscalls.reset();

        self.pc = self.layout.boot_pc;
        Ok(())
    }

    /// Advances the pipeline by one cycle.
    ///
    /// Hazard counters tick first. Every stage then computes from the state
    /// committed last cycle, and only afterwards are the results committed.
    pub fn tick(&mut self) {
        self.stats.cycles += 1;
        self.hazards.tick();

        let fetch = Fetch::compute(self);
        let decode = Decode::compute(self);
        let execute = Execute::compute(self);
        let memory = MemoryAccess::compute(self);
        let writeback = Writeback::compute(self);

        Writeback::commit(self, writeback);
        MemoryAccess::commit(self, memory);
        Execute::commit(self, execute);
        Decode::commit(self, decode);
        Fetch::commit(self, fetch);
    }

    /// Returns the guest's exit code once, after it has exited.
    pub fn take_exit(&mut self) -> Option<i32> {
        self.exit_code.take()
    }

    pub fn dump_state(&self) {
        println!("PC = {:#010x}", self.pc);
        self.regs.dump();
        self.fregs.dump();
    }
}
