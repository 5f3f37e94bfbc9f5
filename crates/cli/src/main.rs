//! Trace-driven pipeline simulator CLI.
//!
//! This binary provides the entry points of the simulator. It performs:
//! 1. **Run:** Simulate a trace through the pipeline and print statistics.
//! 2. **Analyze:** Characterize a trace (instruction mix, footprint, model CPI) without simulating it.

use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use pipesim_core::Simulator;
use pipesim_core::common::SimError;
use pipesim_core::config::{BranchPredictorPolicy, Config};
use pipesim_core::sim::TraceAnalyzer;
use pipesim_core::trace::TraceReader;

#[derive(Parser, Debug)]
#[command(
    name = "pipesim",
    author,
    version,
    about = "Trace-driven speculative pipeline simulator",
    long_about = "Simulate an instruction trace through a multi-lane in-order pipeline, or analyze a trace.\n\nConfiguration comes from an optional JSON file; command-line flags override it.\n\nExamples:\n  pipesim run --trace traces/gcc.tr\n  pipesim run --trace traces/gcc.tr --width 2 --exe-fwd --mem-fwd --predictor gshare\n  pipesim analyze --trace traces/gcc.tr"
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Simulate a trace through the pipeline.
    Run(RunArgs),

    /// Report instruction mix, footprint and model CPI of a trace.
    Analyze {
        /// Trace file to analyze.
        #[arg(short, long)]
        trace: PathBuf,
    },
}

#[derive(clap::Args, Debug)]
struct RunArgs {
    /// Trace file to simulate.
    #[arg(short, long)]
    trace: PathBuf,

    /// JSON configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of lanes.
    #[arg(long)]
    width: Option<usize>,

    /// Branch predictor policy (perfect, always-taken, always-not-taken, gshare).
    #[arg(long)]
    predictor: Option<BranchPredictorPolicy>,

    /// Enable forwarding from the Execute latch.
    #[arg(long)]
    exe_fwd: bool,

    /// Enable forwarding from the MemoryAccess latch.
    #[arg(long)]
    mem_fwd: bool,

    /// Reorder buffer capacity.
    #[arg(long)]
    rob: Option<usize>,

    /// Stop after this many cycles.
    #[arg(long)]
    max_cycles: Option<u64>,

    /// Log the latch grid every cycle (needs -vv).
    #[arg(long)]
    trace_pipeline: bool,

    /// Statistics sections to print (summary, instruction_mix, branch, stalls, memory).
    #[arg(long, num_args = 1..)]
    stats: Vec<String>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Run(args) => cmd_run(&args),
        Commands::Analyze { trace } => cmd_analyze(&trace),
    };
    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

/// Installs the global `tracing` subscriber.
///
/// `RUST_LOG` wins when set; otherwise the level follows `-v`.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Builds the configuration from the optional file and the flag overrides.
fn build_config(args: &RunArgs) -> Result<Config, SimError> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    let pipeline = &mut config.pipeline;
    if let Some(width) = args.width {
        pipeline.width = width;
    }
    if let Some(policy) = args.predictor {
        pipeline.branch_predictor = policy;
    }
    pipeline.enable_exe_fwd |= args.exe_fwd;
    pipeline.enable_mem_fwd |= args.mem_fwd;
    if let Some(rob) = args.rob {
        pipeline.rob_capacity = rob;
    }
    if args.max_cycles.is_some() {
        config.general.max_cycles = args.max_cycles;
    }
    config.general.trace_pipeline |= args.trace_pipeline;
    config.validate()?;
    Ok(config)
}

/// Simulates the trace and prints the requested statistics sections.
fn cmd_run(args: &RunArgs) -> Result<(), SimError> {
    let config = build_config(args)?;
    debug!(?config, "configuration");

    let mut sim = Simulator::from_trace_file(&args.trace, &config)?;
    let _ = sim.run();
    if sim.limit_reached() && !sim.engine().is_halted() {
        println!("[!] stopped at the cycle limit");
        println!("{}", sim.engine().dump_state());
    }
    info!(policy = config.pipeline.branch_predictor.name(), "run finished");
    sim.into_stats().print_sections(&args.stats);
    Ok(())
}

/// Analyzes the trace and prints the characterization report.
fn cmd_analyze(trace: &Path) -> Result<(), SimError> {
    let mut reader = TraceReader::open(trace)?;
    let mut analyzer = TraceAnalyzer::new();
    analyzer.consume(&mut reader)?;
    print!("{analyzer}");
    Ok(())
}
