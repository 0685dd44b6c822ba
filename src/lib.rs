#![forbid(unsafe_code)]
//! memstat: compilation arena-memory statistics.
//!
//! Umbrella crate over `memstat-core` (identities, collaborator traits,
//! config) and `memstat-arena` (peak tracking, registry, reporting).

pub use memstat_arena;
pub use memstat_core;

pub mod prelude {
    pub use memstat_arena::{
        CompilationMemoryStatisticMark, CompilerWorker, MemStatEntry, MemoryStatistic,
    };
    pub use memstat_core::prelude::*;
}
