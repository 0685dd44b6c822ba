//! Convenient re-exports for downstream crates.

pub use crate::config::{MemStatConfig, MemStatMode};
pub use crate::error::{Error, Result};
pub use crate::id::WorkerId;
pub use crate::method::MethodIdentity;
pub use crate::symbol::{Symbol, SymbolTable};
pub use crate::task::{CompileTask, Directive};
pub use crate::types::{ArenaTag, CompilerKind};
