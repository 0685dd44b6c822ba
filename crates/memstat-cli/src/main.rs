//! memstat CLI: replay compilation arena traces and print the memory report.

mod replay;

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use memstat_arena::{initialize_with, print_report};
use memstat_core::config::{MemStatConfig, MemStatMode};
use memstat_core::error::{Error, Result};
use memstat_core::size::parse_memory_size;
use memstat_core::symbol::SymbolTable;

use crate::replay::TraceFile;

#[derive(Parser)]
#[command(name = "memstat")]
#[command(about = "Compilation arena memory statistics: replay traces, report peaks per method", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a JSON compilation trace and print the report
    Replay {
        /// Path to the trace file
        #[arg(short, long)]
        trace: PathBuf,

        /// Number of compiler worker threads
        #[arg(long, default_value_t = 4)]
        threads: usize,

        /// Print sizes in K/M/G units
        #[arg(short = 'H', long)]
        human_readable: bool,

        /// Omit methods below this size (e.g. 4096, 16k, 2m)
        #[arg(short = 's', long)]
        min_size: Option<String>,

        /// Default directive for compilations without one (collect, print, off)
        #[arg(long)]
        mode: Option<String>,

        /// Enable collection even if MEMSTAT_ENABLED is unset
        #[arg(long)]
        enable: bool,
    },

    /// Print the configuration derived from MEMSTAT_* environment variables
    Config,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Replay {
            trace,
            threads,
            human_readable,
            min_size,
            mode,
            enable,
        } => run_replay(&trace, threads, human_readable, min_size, mode, enable),
        Commands::Config => show_config(),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run_replay(
    trace_path: &PathBuf,
    threads: usize,
    human_readable: bool,
    min_size: Option<String>,
    mode: Option<String>,
    enable: bool,
) -> Result<()> {
    let mut config = MemStatConfig::from_env();
    config.enabled |= enable;
    if human_readable {
        config.human_readable = true;
    }
    if let Some(s) = min_size {
        config.min_size = parse_memory_size(&s)?;
    }
    if let Some(m) = mode {
        config.mode = m.parse::<MemStatMode>()?;
    }

    let json = fs::read_to_string(trace_path)?;
    let trace = TraceFile::parse(&json)?;
    tracing::info!(
        compilations = trace.compilations.len(),
        threads,
        "replaying trace"
    );

    match initialize_with(&config)? {
        Some(stat) => {
            let symbols = SymbolTable::new();
            let collected = replay::replay(stat, &symbols, &trace, threads, config.mode);
            tracing::info!(collected, "replay finished");
        }
        None => {
            tracing::warn!("memstat disabled; set MEMSTAT_ENABLED=1 or pass --enable");
        }
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    print_report(&mut out, config.human_readable, config.min_size)?;
    out.flush()?;
    Ok(())
}

fn show_config() -> Result<()> {
    let config = MemStatConfig::from_env();
    let json = serde_json::to_string_pretty(&config).map_err(|e| Error::Config(e.to_string()))?;
    println!("{}", json);
    Ok(())
}
