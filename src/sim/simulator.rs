//! Simulator: drives a `Cpu` from boot to exit.
//!
//! Tracks the run state (`Idle` until an image is booted, then
//! `Booted → Running → Exited`) and applies the optional cycle limit.

use std::path::Path;

use tracing::{debug, info};

use crate::common::{SimError, SimResult};
use crate::config::Config;
use crate::core::Cpu;
use crate::sim::loader;
use crate::stats::SimStats;
use crate::system::syscall::SyscallHandler;

/// Lifecycle of a simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimState {
    /// No image loaded.
    Idle,
    /// Image loaded, no cycle run yet.
    Booted,
    Running,
    /// The guest exited through a syscall.
    Exited { code: i32 },
}

/// Why `run` returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// The guest exited.
    Exited { code: i32 },
    /// The configured cycle limit was reached first.
    CycleLimit { cycles: u64 },
}

/// Top-level simulator.
pub struct Simulator {
    pub cpu: Cpu,
    state: SimState,
    max_cycles: Option<u64>,
}

impl Simulator {
    pub fn new(config: &Config, syscalls: Box<dyn SyscallHandler>) -> Self {
        Self {
            cpu: Cpu::new(config, syscalls),
            state: SimState::Idle,
            max_cycles: config.general.max_cycles,
        }
    }

    pub fn state(&self) -> SimState {
        self.state
    }

    pub fn stats(&self) -> &SimStats {
        &self.cpu.stats
    }

    pub fn set_max_cycles(&mut self, max_cycles: Option<u64>) {
        self.max_cycles = max_cycles;
    }

    /// Resets the processor and loads `image`.
    pub fn boot(&mut self, image: &[u8]) -> SimResult<()> {
        self.cpu.reboot(image)?;
        info!(
            bytes = image.len(),
            base = %format!("{:#010x}", self.cpu.layout.image_base),
            pc = %format!("{:#010x}", self.cpu.pc),
            "image booted"
        );
        self.state = SimState::Booted;
        Ok(())
    }

    /// Reads an image file and boots it.
    pub fn boot_file(&mut self, path: impl AsRef<Path>) -> SimResult<()> {
        let image = loader::load_image(path)?;
        self.boot(&image)
    }

    /// Runs one cycle. Returns the new state.
    pub fn step(&mut self) -> SimResult<SimState> {
        match self.state {
            SimState::Idle => return Err(SimError::NotBooted),
            SimState::Exited { .. } => return Ok(self.state),
            SimState::Booted | SimState::Running => {}
        }

        self.cpu.tick();
        self.state = match self.cpu.take_exit() {
            Some(code) => {
                debug!(cycles = self.cpu.stats.cycles, code, "simulation exited");
                SimState::Exited { code }
            }
            None => SimState::Running,
        };
        Ok(self.state)
    }

    /// Runs until the guest exits or the cycle limit is hit.
    pub fn run(&mut self) -> SimResult<RunOutcome> {
        loop {
            if let SimState::Exited { code } = self.step()? {
                return Ok(RunOutcome::Exited { code });
            }
            if let Some(limit) = self.max_cycles {
                if self.cpu.stats.cycles >= limit {
                    return Ok(RunOutcome::CycleLimit {
                        cycles: self.cpu.stats.cycles,
                    });
                }
            }
        }
    }
}
