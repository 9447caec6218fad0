//! Simulator error types.
//!
//! Pipeline conditions (unresolved hazards, illegal opcodes, syscall exit)
//! are not errors. `SimError` covers the host-side failures around a run:
//! reading the program image and configuration, writing reports, and
//! driving the simulator out of order.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors reported by the simulator library.
#[derive(Error, Debug)]
pub enum SimError {
    /// The program image could not be read.
    #[error("failed to load image {path}: {source}")]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A hex image contained a line that is not a 32-bit word.
    #[error("{path}:{line}: invalid image word {text:?}")]
    ImageParse {
        path: PathBuf,
        line: usize,
        text: String,
    },

    /// The image does not fit in the 32-bit address space at its base.
    #[error("image of {len} bytes does not fit at {base:#010x}")]
    ImageTooLarge { base: u32, len: usize },

    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The configuration file is not valid TOML for `Config`.
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// The trace output file could not be created.
    #[error("failed to create trace file {path}: {source}")]
    TraceFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing the statistics report failed.
    #[error("failed to write statistics: {0}")]
    StatsOutput(#[from] io::Error),

    /// Serializing the statistics report failed.
    #[error("failed to serialize statistics: {0}")]
    StatsSerialize(#[from] serde_json::Error),

    /// `run` or `step` was called before an image was booted.
    #[error("no image booted")]
    NotBooted,
}

/// Result alias used throughout the library.
pub type SimResult<T> = Result<T, SimError>;
