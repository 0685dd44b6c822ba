//! Trace replay: feed recorded arena events through compiler workers.
//!
//! Trace format (JSON):
//! ```json
//! { "compilations": [
//!     { "holder": "java/lang/String", "name": "hashCode", "signature": "()I",
//!       "compiler": "c2", "mode": "print",
//!       "events": [ { "delta": 4096, "tag": "node", "live_nodes": 120 },
//!                   { "delta": -4096, "tag": "node" } ] } ] }
//! ```

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::thread;

use serde::{Deserialize, Serialize};

use memstat_arena::{CompilationMemoryStatisticMark, CompilerWorker, MemoryStatistic};
use memstat_core::config::MemStatMode;
use memstat_core::error::{Error, Result};
use memstat_core::symbol::{Symbol, SymbolTable};
use memstat_core::task::{CompileTask, Directive};
use memstat_core::types::{ArenaTag, CompilerKind};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceFile {
    pub compilations: Vec<TraceCompilation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceCompilation {
    pub holder: String,
    pub name: String,
    pub signature: String,
    #[serde(default)]
    pub compiler: CompilerKind,
    /// Overrides the replay-wide default directive.
    #[serde(default)]
    pub mode: Option<MemStatMode>,
    #[serde(default)]
    pub events: Vec<TraceEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceEvent {
    pub delta: i64,
    pub tag: ArenaTag,
    /// Node count of the graph after this event (c2 only).
    #[serde(default)]
    pub live_nodes: Option<u32>,
}

impl TraceFile {
    pub fn parse(json: &str) -> Result<Self> {
        let trace: TraceFile = serde_json::from_str(json)?;
        trace.validate()?;
        Ok(trace)
    }

    /// Every compilation must be balanced enough never to free more than it
    /// allocated.
    pub fn validate(&self) -> Result<()> {
        for c in &self.compilations {
            let mut running: i64 = 0;
            for (i, ev) in c.events.iter().enumerate() {
                isize::try_from(ev.delta)
                    .map_err(|_| Error::Trace(format!("{}::{}: delta {} out of range", c.holder, c.name, ev.delta)))?;
                running = running
                    .checked_add(ev.delta)
                    .ok_or_else(|| Error::Trace(format!("{}::{}: overflow at event {}", c.holder, c.name, i)))?;
                if running < 0 {
                    return Err(Error::Trace(format!(
                        "{}::{}: event {} frees more than was allocated",
                        c.holder, c.name, i
                    )));
                }
            }
        }
        Ok(())
    }
}

/// A recorded compilation replayed as a live task.
struct ReplayTask {
    kind: CompilerKind,
    holder: Symbol,
    name: Symbol,
    signature: Symbol,
    mode: MemStatMode,
    live_nodes: AtomicU32,
}

impl CompileTask for ReplayTask {
    fn compiler_kind(&self) -> CompilerKind {
        self.kind
    }
    fn holder(&self) -> &Symbol {
        &self.holder
    }
    fn name(&self) -> &Symbol {
        &self.name
    }
    fn signature(&self) -> &Symbol {
        &self.signature
    }
    fn directive(&self) -> &dyn Directive {
        &self.mode
    }
    fn live_nodes(&self) -> Option<u32> {
        Some(self.live_nodes.load(Ordering::Relaxed))
    }
}

/// Replay `trace` on `threads` workers, compilation `i` going to worker
/// `i % threads`. Returns the number of compilations that collected.
pub fn replay(
    stat: &MemoryStatistic,
    symbols: &SymbolTable,
    trace: &TraceFile,
    threads: usize,
    default_mode: MemStatMode,
) -> usize {
    let threads = threads.clamp(1, trace.compilations.len().max(1));

    let collected: usize = thread::scope(|s| {
        let handles: Vec<_> = (0..threads)
            .map(|w| {
                s.spawn(move || {
                    let mut worker = CompilerWorker::new();
                    let mut collected = 0;
                    for c in trace.compilations.iter().skip(w).step_by(threads) {
                        let task = Arc::new(ReplayTask {
                            kind: c.compiler,
                            holder: symbols.intern(&c.holder),
                            name: symbols.intern(&c.name),
                            signature: symbols.intern(&c.signature),
                            mode: c.mode.unwrap_or(default_mode),
                            live_nodes: AtomicU32::new(0),
                        });
                        if replay_one(stat, &mut worker, Arc::clone(&task), &c.events) {
                            collected += 1;
                        }
                    }
                    tracing::debug!(worker = %worker.id(), collected, "replay worker done");
                    collected
                })
            })
            .collect();
        // A panicking worker has already reported itself; count what finished.
        handles.into_iter().filter_map(|h| h.join().ok()).sum()
    });

    // Only the registry keeps names alive past this point.
    let purged = symbols.purge();
    tracing::debug!(purged, remaining = symbols.len(), "symbol table purged");
    collected
}

fn replay_one(
    stat: &MemoryStatistic,
    worker: &mut CompilerWorker,
    task: Arc<ReplayTask>,
    events: &[TraceEvent],
) -> bool {
    let nodes = Arc::clone(&task);
    let mut mark = CompilationMemoryStatisticMark::new(stat, worker, task);
    for ev in events {
        if let Some(n) = ev.live_nodes {
            nodes.live_nodes.store(n, Ordering::Relaxed);
        }
        // Range was checked by `TraceFile::validate`.
        mark.on_arena_change(ev.delta as isize, ev.tag);
    }
    mark.is_active()
}
