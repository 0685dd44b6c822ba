//! Compilation memory statistic tests: tracking, registry, reporting

use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::thread;

use memstat_arena::{
    global, initialize, print_report, ArenaStatCounter, CompilationMemoryStatisticMark,
    CompilerWorker, MemoryStatistic,
};
use memstat_core::config::MemStatMode;
use memstat_core::method::MethodIdentity;
use memstat_core::symbol::{Symbol, SymbolTable};
use memstat_core::task::{CompileTask, Directive};
use memstat_core::types::{ArenaTag, CompilerKind};

struct TestTask {
    kind: CompilerKind,
    holder: Symbol,
    name: Symbol,
    signature: Symbol,
    mode: MemStatMode,
}

impl CompileTask for TestTask {
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
}

fn task(syms: &SymbolTable, holder: &str, name: &str, mode: MemStatMode) -> Arc<dyn CompileTask> {
    Arc::new(TestTask {
        kind: CompilerKind::C2,
        holder: syms.intern(holder),
        name: syms.intern(name),
        signature: syms.intern("()V"),
        mode,
    })
}

fn ident(syms: &SymbolTable, holder: &str, name: &str) -> MethodIdentity {
    MethodIdentity::new(syms.intern(holder), syms.intern(name), syms.intern("()V"))
}

/// Run one compilation that peaks at `total` bytes.
fn compile(stat: &MemoryStatistic, worker: &mut CompilerWorker, task: Arc<dyn CompileTask>, total: usize) {
    let mut mark = CompilationMemoryStatisticMark::new(stat, worker, task);
    let half = (total / 2) as isize;
    let rest = total as isize - half;
    mark.on_arena_change(half, ArenaTag::Node);
    mark.on_arena_change(rest, ArenaTag::Resource);
    mark.on_arena_change(-half, ArenaTag::Node);
    mark.on_arena_change(-rest, ArenaTag::Resource);
}

fn report(stat: &MemoryStatistic, human_readable: bool, min_size: usize) -> String {
    let mut out = Vec::new();
    stat.print_all_by_size(&mut out, human_readable, min_size)
        .expect("report failed");
    String::from_utf8(out).expect("report is utf-8")
}

/// Table rows: every line after the header that starts with a size.
fn rows(report: &str) -> Vec<&str> {
    report
        .lines()
        .skip_while(|l| !l.starts_with("total "))
        .skip(1)
        .filter(|l| l.starts_with(|c: char| c.is_ascii_digit()) && !l.starts_with('('))
        .collect()
}

fn row_total(row: &str) -> usize {
    row.split_whitespace()
        .next()
        .and_then(|s| s.parse().ok())
        .expect("row starts with a byte count")
}

#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_peak_scenario() {
    let mut c = ArenaStatCounter::new();
    c.start();

    assert!(c.account(1000, ArenaTag::Node, None));
    assert!(c.account(500, ArenaTag::Resource, None));
    assert!(!c.account(-300, ArenaTag::Node, None));
    assert!(!c.account(200, ArenaTag::Node, None));

    assert_eq!(c.peak(), 1500);
    assert_eq!(c.peak_since_start(), 1500);
    // Snapshot from the call that set the peak, not the later node deltas
    assert_eq!(c.na_at_peak(), 1000);
    assert_eq!(c.ra_at_peak(), 500);
}

#[test]
fn test_recompilation_overwrites_measurement() {
    let syms = SymbolTable::new();
    let stat = MemoryStatistic::new();
    let mut worker = CompilerWorker::new();

    compile(&stat, &mut worker, task(&syms, "A", "m", MemStatMode::Collect), 1500);
    compile(&stat, &mut worker, task(&syms, "A", "m", MemStatMode::Collect), 900);

    stat.with_table(|t| {
        assert_eq!(t.len(), 1);
        let e = t.get(&ident(&syms, "A", "m")).expect("entry for A::m");
        assert_eq!(e.total(), 900);
        assert_eq!(e.num_recomp(), 2);
    });
}

#[test]
fn test_upsert_n_times_yields_one_record() {
    let syms = SymbolTable::new();
    let stat = MemoryStatistic::new();
    let mut worker = CompilerWorker::new();

    for total in [100, 700, 300, 50, 4096] {
        compile(&stat, &mut worker, task(&syms, "K", "loop", MemStatMode::Collect), total);
    }

    stat.with_table(|t| {
        assert_eq!(t.len(), 1);
        let e = t.get(&ident(&syms, "K", "loop")).expect("entry");
        assert_eq!(e.num_recomp(), 5);
        assert_eq!(e.total(), 4096);
        assert_eq!(e.na_at_peak(), 2048);
        assert_eq!(e.ra_at_peak(), 2048);
        assert_eq!(e.comptype(), CompilerKind::C2);
    });
}

#[test]
fn test_report_cutoff_and_order() {
    let syms = SymbolTable::new();
    let stat = MemoryStatistic::new();
    let mut worker = CompilerWorker::new();

    compile(&stat, &mut worker, task(&syms, "A", "five", MemStatMode::Collect), 5000);
    compile(&stat, &mut worker, task(&syms, "A", "one", MemStatMode::Collect), 1000);
    compile(&stat, &mut worker, task(&syms, "A", "three", MemStatMode::Collect), 3000);

    let text = report(&stat, false, 2000);
    assert!(text.contains(" (cutoff: 2000 bytes)"));
    assert!(text.contains("\n(2/3)\n"));

    let rows = rows(&text);
    assert_eq!(rows.len(), 2);
    assert_eq!(row_total(rows[0]), 5000);
    assert!(rows[0].ends_with("A::five(()V)"));
    assert_eq!(row_total(rows[1]), 3000);
    assert!(rows[1].ends_with("A::three(()V)"));
}

#[test]
fn test_report_rows_non_increasing() {
    let syms = SymbolTable::new();
    let stat = MemoryStatistic::new();
    let mut worker = CompilerWorker::new();

    let totals = [17, 9000, 256, 256, 1 << 20, 3, 77_777, 4096];
    for (i, total) in totals.iter().enumerate() {
        let name = format!("m{}", i);
        compile(&stat, &mut worker, task(&syms, "S", &name, MemStatMode::Collect), *total);
    }

    let text = report(&stat, false, 0);
    assert!(!text.contains("cutoff"));
    let got: Vec<usize> = rows(&text).into_iter().map(row_total).collect();
    assert_eq!(got.len(), totals.len());
    assert!(got.windows(2).all(|w| w[0] >= w[1]));
}

#[test]
fn test_human_readable_report() {
    let syms = SymbolTable::new();
    let stat = MemoryStatistic::new();
    let mut worker = CompilerWorker::new();

    compile(&stat, &mut worker, task(&syms, "H", "huge", MemStatMode::Collect), 200 * 1024 * 1024);

    let text = report(&stat, true, 0);
    let rows: Vec<&str> = text.lines().filter(|l| l.ends_with("H::huge(()V)")).collect();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].starts_with("200M      100M      100M      "));
}

#[test]
fn test_print_mode_emits_summary_line() {
    let syms = SymbolTable::new();
    let sink = SharedBuf::default();
    let stat = MemoryStatistic::new().with_trace_sink(Box::new(sink.clone()));
    let mut worker = CompilerWorker::new();

    compile(&stat, &mut worker, task(&syms, "P", "loud", MemStatMode::Print), 1500);
    compile(&stat, &mut worker, task(&syms, "P", "silent", MemStatMode::Collect), 1500);

    let trace = String::from_utf8(sink.0.lock().unwrap().clone()).unwrap();
    let lines: Vec<&str> = trace.lines().collect();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("c2 Arena usage P::loud(()V): 1500 [na 750 ra 750]"));
}

#[test]
fn test_registry_keys_survive_symbol_purge() {
    let syms = SymbolTable::new();
    let stat = MemoryStatistic::new();
    let mut worker = CompilerWorker::new();

    compile(&stat, &mut worker, task(&syms, "Keep", "me", MemStatMode::Collect), 64);
    compile(&stat, &mut worker, task(&syms, "Drop", "me", MemStatMode::Off), 64);

    // "Drop" is referenced by nothing; "Keep", "me" and "()V" are registry keys.
    assert_eq!(syms.purge(), 1);
    let key = ident(&syms, "Keep", "me");
    assert!(key.is_permanent());
    assert!(stat.with_table(|t| t.get(&key).is_some()));
}

#[test]
fn test_concurrent_workers() {
    const THREADS: usize = 8;
    const METHODS: usize = 50;

    let syms = SymbolTable::new();
    let stat = MemoryStatistic::new();

    thread::scope(|s| {
        for w in 0..THREADS {
            let (stat, syms) = (&stat, &syms);
            s.spawn(move || {
                let mut worker = CompilerWorker::new();
                for m in 0..METHODS {
                    let holder = format!("T{}", w);
                    let name = format!("m{}", m);
                    compile(stat, &mut worker, task(syms, &holder, &name, MemStatMode::Collect), 100 + m);
                    // Every worker also compiles the shared method.
                    compile(stat, &mut worker, task(syms, "Shared", "hot", MemStatMode::Collect), 10);
                }
            });
        }
    });

    stat.with_table(|t| {
        assert_eq!(t.len(), THREADS * METHODS + 1);
        assert_eq!(t.flat_array(0).len(), t.len());
        let shared = t.get(&ident(&syms, "Shared", "hot")).expect("shared entry");
        assert_eq!(shared.num_recomp() as usize, THREADS * METHODS);
        assert_eq!(shared.total(), 10);
        let e = t.get(&ident(&syms, "T3", "m49")).expect("per-thread entry");
        assert_eq!(e.total(), 149);
        assert_eq!(e.num_recomp(), 1);
    });
}

#[test]
fn test_global_statistic() {
    let stat = initialize().expect("first initialize succeeds");
    assert!(initialize().is_err());
    assert!(global().is_some());

    let syms = SymbolTable::new();
    let mut worker = CompilerWorker::new();
    compile(stat, &mut worker, task(&syms, "G", "global", MemStatMode::Collect), 4096);

    let mut out = Vec::new();
    print_report(&mut out, false, 0).expect("report failed");
    let text = String::from_utf8(out).unwrap();
    assert!(!text.contains("(unavailable)"));
    assert_eq!(rows(&text).len(), 1);
    assert_eq!(row_total(rows(&text)[0]), 4096);
}
