//! RAII mark that brackets one compilation.
//!
//! Dropping the mark closes the collection window, on normal return, early
//! return and unwinding alike.

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use memstat_core::task::CompileTask;
use memstat_core::types::ArenaTag;

use crate::statistic::MemoryStatistic;
use crate::worker::CompilerWorker;

pub struct CompilationMemoryStatisticMark<'a> {
    stat: &'a MemoryStatistic,
    worker: &'a mut CompilerWorker,
    previous: Option<Arc<dyn CompileTask>>,
    active: bool,
}

impl<'a> CompilationMemoryStatisticMark<'a> {
    /// Make `task` the worker's current compilation and, if its directive
    /// asks for memstat, open a collection window.
    pub fn new(
        stat: &'a MemoryStatistic,
        worker: &'a mut CompilerWorker,
        task: Arc<dyn CompileTask>,
    ) -> Self {
        let active = task.directive().should_collect_memstat();
        let previous = worker.set_task(Some(task));
        if active {
            stat.on_start_compilation(worker);
        }
        Self {
            stat,
            worker,
            previous,
            active,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Arena hook for code running inside the compilation. Deltas are
    /// accounted whether or not this window collects, so later windows start
    /// from the right baseline.
    pub fn on_arena_change(&mut self, delta: isize, tag: ArenaTag) -> bool {
        self.stat.on_arena_change(self.worker, delta, tag)
    }
}

impl Deref for CompilationMemoryStatisticMark<'_> {
    type Target = CompilerWorker;
    fn deref(&self) -> &Self::Target {
        &*self.worker
    }
}

impl DerefMut for CompilationMemoryStatisticMark<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.worker
    }
}

impl Drop for CompilationMemoryStatisticMark<'_> {
    fn drop(&mut self) {
        if self.active {
            self.stat.on_end_compilation(self.worker);
        }
        self.worker.set_task(self.previous.take());
    }
}
