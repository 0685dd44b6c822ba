//! Per-method aggregate record and its report line.

use std::cmp::Ordering;
use std::io::{self, Write};

use memstat_core::id::WorkerId;
use memstat_core::method::MethodIdentity;
use memstat_core::size::format_proper;
use memstat_core::types::CompilerKind;

/// Latest measurement for one compiled method.
///
/// Measurements are overwritten by every recompilation; only `num_recomp`
/// keeps history.
#[derive(Debug, Clone)]
pub struct MemStatEntry {
    method: MethodIdentity,
    comptype: CompilerKind,
    /// Seconds since the statistic was initialized.
    time: f64,
    num_recomp: u32,
    // Display only; the worker may be gone.
    thread: Option<WorkerId>,
    total: usize,
    na_at_peak: usize,
    ra_at_peak: usize,
    live_nodes_at_peak: u32,
}

pub const LEGEND: &[&str] = &[
    "Legend:",
    "  total  : memory allocated via arenas while compiling",
    "  NA     : ...how much in node arenas (if c2)",
    "  RA     : ...how much in resource areas",
    "  #nodes : ...how many nodes (if c2)",
    "  time   : time of last compilation (sec)",
    "  type   : compiler type",
    "  #rc    : how often recompiled",
    "  thread : compiler thread",
];

pub const HEADER: &str =
    "total     NA        RA        #nodes  time    type  #rc thread              method";

impl MemStatEntry {
    pub(crate) fn new(method: MethodIdentity) -> Self {
        Self {
            method,
            comptype: CompilerKind::C1,
            time: 0.0,
            num_recomp: 0,
            thread: None,
            total: 0,
            na_at_peak: 0,
            ra_at_peak: 0,
            live_nodes_at_peak: 0,
        }
    }

    pub(crate) fn set_comptype(&mut self, comptype: CompilerKind) {
        self.comptype = comptype;
    }
    pub(crate) fn set_time(&mut self, time: f64) {
        self.time = time;
    }
    pub(crate) fn set_thread(&mut self, thread: WorkerId) {
        self.thread = Some(thread);
    }
    pub(crate) fn inc_recompilation(&mut self) {
        self.num_recomp += 1;
    }
    pub(crate) fn set_total(&mut self, n: usize) {
        self.total = n;
    }
    pub(crate) fn set_na_at_peak(&mut self, n: usize) {
        self.na_at_peak = n;
    }
    pub(crate) fn set_ra_at_peak(&mut self, n: usize) {
        self.ra_at_peak = n;
    }
    pub(crate) fn set_live_nodes_at_peak(&mut self, n: u32) {
        self.live_nodes_at_peak = n;
    }

    pub fn method(&self) -> &MethodIdentity {
        &self.method
    }
    pub fn comptype(&self) -> CompilerKind {
        self.comptype
    }
    pub fn time(&self) -> f64 {
        self.time
    }
    pub fn num_recomp(&self) -> u32 {
        self.num_recomp
    }
    pub fn thread(&self) -> Option<WorkerId> {
        self.thread
    }
    pub fn total(&self) -> usize {
        self.total
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

    /// Largest total first.
    pub fn compare_by_size(&self, other: &MemStatEntry) -> Ordering {
        other.total.cmp(&self.total)
    }

    pub fn print_legend(out: &mut dyn Write) -> io::Result<()> {
        for line in LEGEND {
            writeln!(out, "{}", line)?;
        }
        Ok(())
    }

    pub fn print_header(out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "{}", HEADER)
    }

    /// One report row, without the trailing newline.
    pub fn render_line(&self, human_readable: bool) -> String {
        let size = |n: usize| {
            if human_readable {
                format_proper(n)
            } else {
                n.to_string()
            }
        };

        let mut line = String::with_capacity(128);
        let mut col = 0;

        push_field(&mut line, &size(self.total), &mut col, 10);
        push_field(&mut line, &size(self.na_at_peak), &mut col, 10);
        push_field(&mut line, &size(self.ra_at_peak), &mut col, 10);
        push_field(&mut line, &self.live_nodes_at_peak.to_string(), &mut col, 8);
        push_field(&mut line, &format!("{:.3}", self.time), &mut col, 8);
        push_field(&mut line, self.comptype.name(), &mut col, 6);
        push_field(&mut line, &self.num_recomp.to_string(), &mut col, 4);

        line.push_str(&self.thread.unwrap_or(WorkerId::new(0)).to_string());
        line.push_str("  ");
        self.method.render_into(&mut line);
        line
    }

    pub fn render(&self, out: &mut dyn Write, human_readable: bool) -> io::Result<()> {
        writeln!(out, "{}", self.render_line(human_readable))
    }
}

/// Append `text` plus one space, then pad with spaces up to the next column
/// boundary. A field wider than its column pushes later columns right.
fn push_field(line: &mut String, text: &str, col: &mut usize, width: usize) {
    line.push_str(text);
    line.push(' ');
    *col += width;
    while line.len() < *col {
        line.push(' ');
    }
}
