//! Simulation drivers.
//!
//! Provides the run loop around the pipeline engine and a trace analyzer that
//! characterizes a trace without simulating it.

/// Static trace characterization (instruction mix, footprint, CPI model).
pub mod analysis;

/// Run loop with an optional cycle limit.
pub mod simulator;

pub use self::analysis::TraceAnalyzer;
pub use self::simulator::Simulator;
