//! Per-worker arena peak tracking.
//!
//! Runs on every arena allocation and free, so `account` stays O(1) and never
//! touches the heap.

use std::fmt;

use memstat_core::task::CompileTask;
use memstat_core::types::ArenaTag;

#[derive(Debug, Default, Clone)]
pub struct ArenaStatCounter {
    current: usize,
    start: usize,
    peak: usize,
    // Running totals per category.
    na: usize,
    ra: usize,
    // Category totals when `peak` was last raised.
    na_at_peak: usize,
    ra_at_peak: usize,
    live_nodes_at_peak: u32,
}

impl ArenaStatCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-baseline at the start of a collection window. Arena memory already
    /// live at this point is not attributed to the new window.
    pub fn start(&mut self) {
        self.start = self.current;
        self.peak = self.current;
        self.na_at_peak = self.na;
        self.ra_at_peak = self.ra;
        self.live_nodes_at_peak = 0;
    }

    /// Account an arena allocation (`delta > 0`) or release (`delta < 0`).
    ///
    /// Returns `true` if this call raised the peak. `task` is consulted only on
    /// a new peak, to sample the live node count of the optimizing backend.
    pub fn account(&mut self, delta: isize, tag: ArenaTag, task: Option<&dyn CompileTask>) -> bool {
        // Arena allocations under a compilation are stack bound and symmetric;
        // freeing more than was allocated is an accounting bug.
        debug_assert!(
            delta >= 0 || self.current.checked_add_signed(delta).is_some(),
            "negative overflow (d={} {} {} {})",
            delta,
            self.current,
            self.start,
            self.peak
        );
        self.current = self.current.saturating_add_signed(delta);
        match tag {
            ArenaTag::Node => self.na = self.na.saturating_add_signed(delta),
            ArenaTag::Resource => self.ra = self.ra.saturating_add_signed(delta),
            ArenaTag::Other => {}
        }

        if self.current <= self.peak {
            return false;
        }
        debug_assert!(delta > 0, "peak raised by a release ({} {} {})", self.current, self.start, self.peak);
        self.peak = self.current;
        self.na_at_peak = self.na;
        self.ra_at_peak = self.ra;
        self.update_node_count(task);

        #[cfg(feature = "tracing")]
        tracing::trace!(
            peak = self.peak,
            na = self.na_at_peak,
            ra = self.ra_at_peak,
            "arena peak"
        );
        true
    }

    fn update_node_count(&mut self, task: Option<&dyn CompileTask>) {
        let Some(task) = task else { return };
        if !task.compiler_kind().has_node_count() {
            return;
        }
        if let Some(live) = task.live_nodes() {
            self.live_nodes_at_peak = live;
        }
    }

    /// Growth of arena usage inside the current window.
    pub fn peak_since_start(&self) -> usize {
        self.peak.saturating_sub(self.start)
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn peak(&self) -> usize {
        self.peak
    }

    pub fn na_at_peak(&self) -> usize {
        self.na_at_peak
    }

    pub fn ra_at_peak(&self) -> usize {
        self.ra_at_peak
    }

    pub fn live_nodes_at_peak(&self) -> u32 {
        self.live_nodes_at_peak
    }
}

impl fmt::Display for ArenaStatCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [na {} ra {}]",
            self.peak_since_start(),
            self.na_at_peak,
            self.ra_at_peak
        )?;
        if cfg!(debug_assertions) {
            write!(f, " ({}->{}->{})", self.start, self.peak, self.current)?;
        }
        Ok(())
    }
}
