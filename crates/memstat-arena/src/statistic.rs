//! Statistic facade: compilation hooks, registry ownership and reporting.
//!
//! A `MemoryStatistic` can be used standalone (tests, tools) or installed
//! once as the process-wide instance via `initialize`. The process-wide
//! instance cannot be disabled again.

use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use once_cell::sync::OnceCell;

use memstat_core::config::MemStatConfig;
use memstat_core::error::{Error, Result};
use memstat_core::types::ArenaTag;

use crate::entry::MemStatEntry;
use crate::table::{Measurement, MemStatTable};
use crate::worker::CompilerWorker;

pub struct MemoryStatistic {
    // Critical sections never block or call out to collaborators; see
    // `print_all_by_size` for the one long section.
    table: Mutex<MemStatTable>,
    started: Instant,
    trace_sink: Mutex<Box<dyn Write + Send>>,
}

impl MemoryStatistic {
    pub fn new() -> Self {
        Self {
            table: Mutex::new(MemStatTable::new()),
            started: Instant::now(),
            trace_sink: Mutex::new(Box::new(io::stdout())),
        }
    }

    /// Redirect the one-line per-compilation summaries (default: stdout).
    pub fn with_trace_sink(mut self, sink: Box<dyn Write + Send>) -> Self {
        self.trace_sink = Mutex::new(sink);
        self
    }

    fn lock_table(&self) -> MutexGuard<'_, MemStatTable> {
        // Every critical section leaves the table consistent, so a poisoned
        // lock is still safe to use.
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` against the registry with the lock held.
    pub fn with_table<R>(&self, f: impl FnOnce(&MemStatTable) -> R) -> R {
        f(&self.lock_table())
    }

    pub fn on_start_compilation(&self, worker: &mut CompilerWorker) {
        worker.arena_stat_mut().start();
    }

    /// Push the worker's window into the registry. The worker must have a
    /// current task.
    pub fn on_end_compilation(&self, worker: &mut CompilerWorker) {
        let Some(task) = worker.task().cloned() else {
            debug_assert!(false, "end of compilation without a task");
            return;
        };
        let directive = task.directive();
        debug_assert!(directive.should_collect_memstat(), "only call if memstat is enabled");

        let comptype = task.compiler_kind();
        let method = task.method_identity();
        method.make_permanent();

        let counter = worker.arena_stat();
        if directive.should_print_memstat() {
            let mut sink = self.trace_sink.lock().unwrap_or_else(PoisonError::into_inner);
            // A broken trace sink must not fail the compilation.
            if let Err(_err) = writeln!(sink, "{} Arena usage {}: {}", comptype, method, counter) {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %_err, method = %method, "memstat trace sink write failed");
            }
        }

        let measurement = Measurement::from_counter(comptype, counter);
        let time = self.started.elapsed().as_secs_f64();
        self.lock_table().add(&method, &measurement, worker.id(), time);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            method = %method,
            compiler = %comptype,
            total = measurement.total,
            "memstat entry updated"
        );
    }

    /// Forward an arena delta to the worker's tracker. Returns `true` on a
    /// new peak.
    pub fn on_arena_change(&self, worker: &mut CompilerWorker, delta: isize, tag: ArenaTag) -> bool {
        worker.account(delta, tag)
    }

    /// Print legend, header and every entry with `total >= min_size`,
    /// largest first.
    pub fn print_all_by_size(
        &self,
        out: &mut dyn Write,
        human_readable: bool,
        min_size: usize,
    ) -> io::Result<()> {
        writeln!(out, "Compilation memory statistics")?;
        writeln!(out)?;
        MemStatEntry::print_legend(out)?;
        writeln!(out)?;
        if min_size > 0 {
            writeln!(out, " (cutoff: {} bytes)", min_size)?;
        }
        writeln!(out)?;
        MemStatEntry::print_header(out)?;

        // Entries are live and mutable: sort and print them under the lock so
        // a concurrent update cannot tear a row.
        let table = self.lock_table();
        let mut filtered = table.flat_array(min_size);
        if min_size > 0 {
            writeln!(out, "({}/{})", filtered.len(), table.len())?;
        }
        if filtered.is_empty() {
            writeln!(out, "No entries.")?;
            return Ok(());
        }
        filtered.sort_unstable_by(|a, b| a.compare_by_size(b));
        for e in filtered {
            e.render(out, human_readable)?;
        }
        Ok(())
    }
}

impl Default for MemoryStatistic {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL: OnceCell<MemoryStatistic> = OnceCell::new();

/// Enable the process-wide statistic. Fails if it is already enabled.
pub fn initialize() -> Result<&'static MemoryStatistic> {
    let stat = GLOBAL
        .try_insert(MemoryStatistic::new())
        .map_err(|_| Error::AlreadyInitialized)?;

    #[cfg(feature = "tracing")]
    tracing::info!("Compilation memory statistic enabled");

    Ok(stat)
}

/// Enable the process-wide statistic if `config.enabled` says so. Returns
/// `None`, leaving the statistic uninitialized, when collection is switched
/// off.
pub fn initialize_with(config: &MemStatConfig) -> Result<Option<&'static MemoryStatistic>> {
    if !config.enabled {
        #[cfg(feature = "tracing")]
        tracing::debug!("Compilation memory statistic disabled by configuration");
        return Ok(None);
    }
    initialize().map(Some)
}

pub fn is_enabled() -> bool {
    GLOBAL.get().is_some()
}

pub fn global() -> Option<&'static MemoryStatistic> {
    GLOBAL.get()
}

/// Report entry point of the process-wide statistic. Prints an
/// "(unavailable)" notice if it was never enabled.
pub fn print_report(out: &mut dyn Write, human_readable: bool, min_size: usize) -> io::Result<()> {
    match global() {
        Some(stat) => stat.print_all_by_size(out, human_readable, min_size),
        None => {
            writeln!(out, "Compilation memory statistics")?;
            writeln!(out, "(unavailable)")
        }
    }
}
