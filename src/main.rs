//! MIPS Pipeline Simulator CLI.
//!
//! Loads a program image, runs it on the cycle-accurate pipeline until the
//! guest exits through a syscall (or the cycle limit is reached), then
//! prints the statistics report.

use std::fs::{self, File};
use std::path::PathBuf;
use std::process;
use std::sync::Mutex;
use std::time::Instant;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use mips_pipeline::system::SpimSyscalls;
use mips_pipeline::{Config, RunOutcome, SimError, Simulator};

/// Command-line arguments for the MIPS pipeline simulator.
#[derive(Parser, Debug)]
#[command(author, version, about = "Cycle-accurate 5-stage MIPS pipeline simulator")]
struct Args {
    /// Program image (raw big-endian bytes, or `.hex` words).
    #[arg(short, long)]
    image: PathBuf,

    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Boot PC override, in hex.
    #[arg(long)]
    boot_pc: Option<String>,

    /// Emit per-stage trace events.
    #[arg(short, long)]
    trace: bool,

    /// Write trace output to this file instead of stderr.
    #[arg(long)]
    trace_file: Option<PathBuf>,

    /// Stop after this many cycles.
    #[arg(long)]
    max_cycles: Option<u64>,

    /// Write the statistics as JSON to this file.
    #[arg(long)]
    stats_json: Option<PathBuf>,

    /// Dump the register files when the run ends.
    #[arg(long)]
    dump_regs: bool,
}

fn init_tracing(trace: bool, trace_file: Option<&PathBuf>) -> Result<(), SimError> {
    let default = if trace { "trace" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time();

    match trace_file {
        Some(path) => {
            let file = File::create(path).map_err(|source| SimError::TraceFile {
                path: path.clone(),
                source,
            })?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

fn load_config(args: &Args) -> Result<Config, SimError> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(pc) = &args.boot_pc {
        config.general.boot_pc = pc.clone();
    }
    if args.trace {
        config.general.trace = true;
    }
    if args.max_cycles.is_some() {
        config.general.max_cycles = args.max_cycles;
    }
    Ok(config)
}

fn run(args: Args) -> Result<i32, SimError> {
    let config = load_config(&args)?;
    init_tracing(config.general.trace, args.trace_file.as_ref())?;

    println!("Global Configuration");
    println!("--------------------");
    println!("  Trace:              {}", config.general.trace);
    println!("  Boot PC:            {:#010x}", config.general.boot_pc_val());
    println!("  Image Base:         {:#010x}", config.memory.image_base_val());
    println!("  Stack Pointer:      {:#010x}", config.memory.stack_pointer_val());
    println!("  Global Pointer:     {:#010x}", config.memory.global_pointer_val());
    println!("  Heap Base:          {:#010x}", config.syscall.heap_base_val());
    if let Some(limit) = config.general.max_cycles {
        println!("  Max Cycles:         {}", limit);
    }
    println!("--------------------");

    let syscalls = SpimSyscalls::stdio(config.syscall.heap_base_val());
    let mut sim = Simulator::new(&config, Box::new(syscalls));
    println!("Executing {}", args.image.display());
    sim.boot_file(&args.image)?;

    let start = Instant::now();
    let outcome = sim.run()?;
    let elapsed = start.elapsed();

    let code = match outcome {
        RunOutcome::Exited { code } => {
            println!("\n[*] Exiting with code {}", code);
            code
        }
        RunOutcome::CycleLimit { cycles } => {
            println!("\n[*] Cycle limit reached after {} cycles", cycles);
            0
        }
    };

    if args.dump_regs {
        sim.cpu.dump_state();
    }
    sim.stats().print(Some(elapsed));

    if let Some(path) = &args.stats_json {
        fs::write(path, sim.stats().to_json()?)?;
    }
    Ok(code)
}

fn main() {
    let args = Args::parse();
    match run(args) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("[!] FATAL: {}", e);
            process::exit(1);
        }
    }
}
