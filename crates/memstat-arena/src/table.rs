//! Method -> latest measurement registry.
//!
//! The table itself is not synchronized; `MemoryStatistic` owns it behind a
//! mutex and every method here runs with that mutex held.

use std::collections::HashMap;

use memstat_core::id::WorkerId;
use memstat_core::method::MethodIdentity;
use memstat_core::types::CompilerKind;

use crate::entry::MemStatEntry;
use crate::tracking::ArenaStatCounter;

/// What a finished compilation reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Measurement {
    pub comptype: CompilerKind,
    pub total: usize,
    pub na_at_peak: usize,
    pub ra_at_peak: usize,
    pub live_nodes_at_peak: u32,
}

impl Measurement {
    pub fn from_counter(comptype: CompilerKind, counter: &ArenaStatCounter) -> Self {
        Self {
            comptype,
            total: counter.peak_since_start(),
            na_at_peak: counter.na_at_peak(),
            ra_at_peak: counter.ra_at_peak(),
            live_nodes_at_peak: counter.live_nodes_at_peak(),
        }
    }
}

#[derive(Debug, Default)]
pub struct MemStatTable {
    entries: HashMap<MethodIdentity, MemStatEntry>,
}

impl MemStatTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or update the entry for `method`. Measurements replace the old
    /// ones; the recompilation count goes up by one.
    pub fn add(&mut self, method: &MethodIdentity, m: &Measurement, thread: WorkerId, time: f64) {
        let e = self
            .entries
            .entry(method.clone())
            .or_insert_with(|| MemStatEntry::new(method.clone()));
        e.set_time(time);
        e.set_thread(thread);
        e.set_comptype(m.comptype);
        e.inc_recompilation();
        e.set_total(m.total);
        e.set_na_at_peak(m.na_at_peak);
        e.set_ra_at_peak(m.ra_at_peak);
        e.set_live_nodes_at_peak(m.live_nodes_at_peak);
    }

    /// All entries with `total() >= min_size`, in no particular order.
    pub fn flat_array(&self, min_size: usize) -> Vec<&MemStatEntry> {
        let flat: Vec<&MemStatEntry> = self
            .entries
            .values()
            .filter(|e| e.total() >= min_size)
            .collect();
        debug_assert!(min_size > 0 || flat.len() == self.entries.len());
        flat
    }

    pub fn get(&self, method: &MethodIdentity) -> Option<&MemStatEntry> {
        self.entries.get(method)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
