//! Simulator configuration.
//!
//! Loaded from a TOML file with `[general]`, `[memory]` and `[syscall]`
//! sections. Every field has a default, so an empty file (or no file at
//! all) yields the conventional SPIM memory layout. Addresses are written
//! as hex strings.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::common::{SimError, SimResult};

const DEFAULT_TEXT_BASE: u32 = 0x0040_0000;
const DEFAULT_STACK_POINTER: u32 = 0x7FFF_EFFC;
const DEFAULT_GLOBAL_POINTER: u32 = 0x1000_8000;
const DEFAULT_HEAP_BASE: u32 = 0x1004_0000;

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub memory: MemoryConfig,
    #[serde(default)]
    pub syscall: SyscallConfig,
}

impl Config {
    /// Reads and parses a configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> SimResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| SimError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Parses configuration from TOML text.
    pub fn parse(text: &str) -> SimResult<Self> {
        Ok(toml::from_str(text)?)
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GeneralConfig {
    /// Emit per-stage trace events.
    #[serde(default)]
    pub trace: bool,
    #[serde(default = "default_boot_pc")]
    pub boot_pc: String,
    /// Stop after this many cycles even if the guest has not exited.
    #[serde(default)]
    pub max_cycles: Option<u64>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            trace: false,
            boot_pc: default_boot_pc(),
            max_cycles: None,
        }
    }
}

impl GeneralConfig {
    pub fn boot_pc_val(&self) -> u32 {
        parse_hex(&self.boot_pc, DEFAULT_TEXT_BASE)
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct MemoryConfig {
    /// Address the image is loaded at.
    #[serde(default = "default_image_base")]
    pub image_base: String,
    /// Initial `$sp`.
    #[serde(default = "default_stack_pointer")]
    pub stack_pointer: String,
    /// Initial `$gp`.
    #[serde(default = "default_global_pointer")]
    pub global_pointer: String,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            image_base: default_image_base(),
            stack_pointer: default_stack_pointer(),
            global_pointer: default_global_pointer(),
        }
    }
}

impl MemoryConfig {
    pub fn image_base_val(&self) -> u32 {
        parse_hex(&self.image_base, DEFAULT_TEXT_BASE)
    }

    pub fn stack_pointer_val(&self) -> u32 {
        parse_hex(&self.stack_pointer, DEFAULT_STACK_POINTER)
    }

    pub fn global_pointer_val(&self) -> u32 {
        parse_hex(&self.global_pointer, DEFAULT_GLOBAL_POINTER)
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SyscallConfig {
    /// Initial program break for `sbrk`.
    #[serde(default = "default_heap_base")]
    pub heap_base: String,
}

impl Default for SyscallConfig {
    fn default() -> Self {
        Self {
            heap_base: default_heap_base(),
        }
    }
}

impl SyscallConfig {
    pub fn heap_base_val(&self) -> u32 {
        parse_hex(&self.heap_base, DEFAULT_HEAP_BASE)
    }
}

/// Parses a hex address with or without a `0x` prefix.
pub fn parse_hex(s: &str, default: u32) -> u32 {
    let s = s.trim().trim_start_matches("0x").replace('_', "");
    u32::from_str_radix(&s, 16).unwrap_or(default)
}

fn default_boot_pc() -> String {
    format!("{:#x}", DEFAULT_TEXT_BASE)
}

fn default_image_base() -> String {
    format!("{:#x}", DEFAULT_TEXT_BASE)
}

fn default_stack_pointer() -> String {
    format!("{:#x}", DEFAULT_STACK_POINTER)
}

fn default_global_pointer() -> String {
    format!("{:#x}", DEFAULT_GLOBAL_POINTER)
}

fn default_heap_base() -> String {
    format!("{:#x}", DEFAULT_HEAP_BASE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_spim_layout() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.general.boot_pc_val(), 0x0040_0000);
        assert_eq!(config.memory.stack_pointer_val(), 0x7FFF_EFFC);
        assert_eq!(config.syscall.heap_base_val(), 0x1004_0000);
    }

    #[test]
    fn hex_accepts_prefix_and_separators() {
        assert_eq!(parse_hex("0x0040_0020", 0), 0x0040_0020);
        assert_eq!(parse_hex("bfc00000", 0), 0xBFC0_0000);
        assert_eq!(parse_hex("nonsense", 7), 7);
    }
}
