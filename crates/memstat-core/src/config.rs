//! Statistic configuration that the embedding compiler and the CLI share.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::size::parse_memory_size;
use crate::task::Directive;

/// Per-method memstat option: off, collect silently, or collect and print a
/// one-line summary when each compilation ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MemStatMode {
    Off,
    #[default]
    Collect,
    Print,
}

impl Directive for MemStatMode {
    fn should_collect_memstat(&self) -> bool {
        !matches!(self, MemStatMode::Off)
    }

    fn should_print_memstat(&self) -> bool {
        matches!(self, MemStatMode::Print)
    }
}

impl FromStr for MemStatMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" => Ok(MemStatMode::Off),
            "collect" => Ok(MemStatMode::Collect),
            "print" => Ok(MemStatMode::Print),
            other => Err(Error::InvalidMode(other.to_string())),
        }
    }
}

impl fmt::Display for MemStatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MemStatMode::Off => "off",
            MemStatMode::Collect => "collect",
            MemStatMode::Print => "print",
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemStatConfig {
    /// Enable the process-wide statistic at startup.
    pub enabled: bool,

    /// Default directive for compilations that carry none of their own.
    pub mode: MemStatMode,

    /// Report cutoff in bytes; entries below it are omitted.
    pub min_size: usize,

    /// Render sizes with K/M/G units instead of raw byte counts.
    pub human_readable: bool,
}

impl Default for MemStatConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            mode: MemStatMode::Collect,
            min_size: 0,
            human_readable: false,
        }
    }
}

impl MemStatConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `MEMSTAT_ENABLED`: `1`/`true` to enable collection
    /// - `MEMSTAT_MODE`: `off`, `collect` or `print`
    /// - `MEMSTAT_MIN_SIZE`: report cutoff, e.g. `4096` or `16k`
    /// - `MEMSTAT_HUMAN_READABLE`: `1`/`true` for scaled sizes
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(s) = std::env::var("MEMSTAT_ENABLED") {
            if let Some(v) = parse_bool(&s) {
                cfg.enabled = v;
            }
        }

        if let Ok(s) = std::env::var("MEMSTAT_MODE") {
            if let Ok(v) = s.parse::<MemStatMode>() {
                cfg.mode = v;
            }
        }

        if let Ok(s) = std::env::var("MEMSTAT_MIN_SIZE") {
            if let Ok(v) = parse_memory_size(&s) {
                cfg.min_size = v;
            }
        }

        if let Ok(s) = std::env::var("MEMSTAT_HUMAN_READABLE") {
            if let Some(v) = parse_bool(&s) {
                cfg.human_readable = v;
            }
        }

        cfg
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
