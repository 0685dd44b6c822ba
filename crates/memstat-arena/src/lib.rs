#![forbid(unsafe_code)]
//! memstat-arena: arena peak tracking, per-method registry and reporting.
//!
//! Every compiler worker owns a `CompilerWorker` whose `ArenaStatCounter` is
//! fed signed arena deltas. A `CompilationMemoryStatisticMark` brackets one
//! compilation; when it drops, the peak reached inside the window is pushed
//! into the shared `MemStatTable` owned by `MemoryStatistic`. Reports are
//! rendered under the table lock, largest consumers first.

pub mod entry;
pub mod guard;
pub mod statistic;
pub mod table;
pub mod tracking;
pub mod worker;

pub use entry::MemStatEntry;
pub use guard::CompilationMemoryStatisticMark;
pub use statistic::{global, initialize, initialize_with, is_enabled, print_report, MemoryStatistic};
pub use table::{Measurement, MemStatTable};
pub use tracking::ArenaStatCounter;
pub use worker::CompilerWorker;
