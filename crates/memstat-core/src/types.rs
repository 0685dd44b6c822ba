//! Compiler backends and arena categories.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Which compiler implementation produced a compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CompilerKind {
    #[default]
    None,
    C1,
    C2,
    Jvmci,
}

impl CompilerKind {
    pub const fn name(self) -> &'static str {
        match self {
            CompilerKind::None => "none",
            CompilerKind::C1 => "c1",
            CompilerKind::C2 => "c2",
            CompilerKind::Jvmci => "jvmci",
        }
    }

    /// Only the optimizing backend exposes a live node count.
    pub const fn has_node_count(self) -> bool {
        matches!(self, CompilerKind::C2)
    }
}

impl fmt::Display for CompilerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CompilerKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(CompilerKind::None),
            "c1" => Ok(CompilerKind::C1),
            "c2" => Ok(CompilerKind::C2),
            "jvmci" => Ok(CompilerKind::Jvmci),
            other => Err(Error::InvalidCompiler(other.to_string())),
        }
    }
}

/// Purpose tag carried by every arena delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArenaTag {
    /// Graph node storage.
    Node,
    /// General resource-area scratch.
    Resource,
    /// Counted in the total only.
    Other,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiler_kind_names_round_trip() {
        for kind in [
            CompilerKind::None,
            CompilerKind::C1,
            CompilerKind::C2,
            CompilerKind::Jvmci,
        ] {
            assert_eq!(kind.name().parse::<CompilerKind>().unwrap(), kind);
        }
        assert!("c3".parse::<CompilerKind>().is_err());
    }

    #[test]
    fn only_c2_counts_nodes() {
        assert!(CompilerKind::C2.has_node_count());
        assert!(!CompilerKind::C1.has_node_count());
    }
}
