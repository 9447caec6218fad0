//! Simulation statistics collection and reporting.
//!
//! Counters are bumped by the pipeline stages as instructions move through
//! them. Every counter is a pure function of the booted image and its
//! input, so two runs of the same program produce equal `SimStats`.

use std::time::Duration;

use serde::Serialize;

/// Performance counters for one simulation run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SimStats {
    /// Simulated cycles.
    pub cycles: u64,
    /// Instructions fetched and handed to decode. Replayed and squashed
    /// fetches are not counted.
    pub instructions: u64,

    pub cond_branches: u64,
    /// `jal` and `jalr`.
    pub jump_and_link: u64,
    /// `jr` and `jalr`.
    pub jump_register: u64,
    pub fp_instructions: u64,

    pub loads: u64,
    pub stores: u64,
    pub syscall_loads: u64,
    pub syscall_stores: u64,
    pub syscalls: u64,

    /// Cycles decode spent interlocked on an unresolved source.
    pub interlock_cycles: u64,
    /// Cycles decode spent stalled behind a syscall.
    pub syscall_stall_cycles: u64,
    /// Wrong-path fetches discarded behind a taken branch.
    pub squashed: u64,
    /// Instructions with unrecognized encodings, retired as no-ops.
    pub illegal_instructions: u64,
}

impl SimStats {
    /// Cycles per instruction, or 0 when nothing was fetched.
    pub fn cpi(&self) -> f64 {
        if self.instructions == 0 {
            0.0
        } else {
            self.cycles as f64 / self.instructions as f64
        }
    }

    /// Serializes the counters as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Prints a formatted summary to stdout.
    ///
    /// `host` is the wall-clock time the run took, when known.
    pub fn print(&self, host: Option<Duration>) {
        println!("\n==========================================================");
        println!("MIPS PIPELINE SIMULATION STATISTICS");
        println!("==========================================================");
        if let Some(elapsed) = host {
            let seconds = elapsed.as_secs_f64();
            println!("host_seconds             {:.4} s", seconds);
            if seconds > 0.0 {
                println!(
                    "sim_freq                 {:.2} kHz",
                    (self.cycles as f64 / seconds) / 1000.0
                );
            }
        }
        println!("sim_cycles               {}", self.cycles);
        println!("sim_insts                {}", self.instructions);
        println!("sim_cpi                  {:.2}", self.cpi());
        println!("----------------------------------------------------------");
        println!("CONTROL");
        println!("  br.conditional         {}", self.cond_branches);
        println!("  br.jump_and_link       {}", self.jump_and_link);
        println!("  br.jump_register       {}", self.jump_register);
        println!("  br.squashed            {}", self.squashed);
        println!("----------------------------------------------------------");
        println!("MEMORY");
        println!("  mem.loads              {}", self.loads);
        println!("  mem.syscall_loads      {}", self.syscall_loads);
        println!("  mem.stores             {}", self.stores);
        println!("  mem.syscall_stores     {}", self.syscall_stores);
        println!("----------------------------------------------------------");
        println!("PIPELINE");
        println!("  op.fp                  {}", self.fp_instructions);
        println!("  op.syscall             {}", self.syscalls);
        println!("  op.illegal             {}", self.illegal_instructions);
        println!("  stalls.interlock       {}", self.interlock_cycles);
        println!("  stalls.syscall         {}", self.syscall_stall_cycles);
        println!("==========================================================");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpi_of_empty_run_is_zero() {
        assert_eq!(SimStats::default().cpi(), 0.0);
    }

    #[test]
    fn cpi_divides_cycles_by_instructions() {
        let stats = SimStats {
            cycles: 8,
            instructions: 4,
            ..Default::default()
        };
        assert_eq!(stats.cpi(), 2.0);
    }

    #[test]
    fn json_names_every_counter() {
        let json = SimStats::default().to_json().unwrap();
        for key in ["cycles", "instructions", "syscall_loads", "interlock_cycles"] {
            assert!(json.contains(key), "missing {key}");
        }
    }
}
