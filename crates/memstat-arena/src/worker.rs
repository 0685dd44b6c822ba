//! Compiler worker context.

use std::sync::Arc;

use memstat_core::id::WorkerId;
use memstat_core::task::CompileTask;
use memstat_core::types::ArenaTag;

use crate::tracking::ArenaStatCounter;

/// State one compiler thread carries across all of its compilations.
///
/// Owned by exactly one thread; nothing here is synchronized.
pub struct CompilerWorker {
    id: WorkerId,
    arena_stat: ArenaStatCounter,
    task: Option<Arc<dyn CompileTask>>,
}

impl CompilerWorker {
    pub fn new() -> Self {
        Self {
            id: WorkerId::next(),
            arena_stat: ArenaStatCounter::new(),
            task: None,
        }
    }

    pub fn id(&self) -> WorkerId {
        self.id
    }

    pub fn arena_stat(&self) -> &ArenaStatCounter {
        &self.arena_stat
    }

    pub(crate) fn arena_stat_mut(&mut self) -> &mut ArenaStatCounter {
        &mut self.arena_stat
    }

    /// The compilation this worker is currently running, if any.
    pub fn task(&self) -> Option<&Arc<dyn CompileTask>> {
        self.task.as_ref()
    }

    /// Install (or clear) the current task, returning the previous one.
    pub fn set_task(&mut self, task: Option<Arc<dyn CompileTask>>) -> Option<Arc<dyn CompileTask>> {
        std::mem::replace(&mut self.task, task)
    }

    pub(crate) fn account(&mut self, delta: isize, tag: ArenaTag) -> bool {
        self.arena_stat.account(delta, tag, self.task.as_deref())
    }
}

impl Default for CompilerWorker {
    fn default() -> Self {
        Self::new()
    }
}
