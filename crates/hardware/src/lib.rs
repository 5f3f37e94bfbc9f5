//! Trace-driven speculative pipeline simulator library.
//!
//! This crate implements a cycle-level model of a multi-lane, in-order,
//! five-stage pipeline with the following:
//! 1. **Trace:** Fixed-size instruction records read from files or memory.
//! 2. **Core:** Pipeline engine, hazard detection, forwarding, reorder buffer and scoreboard.
//! 3. **Prediction:** Perfect, static and gshare branch direction policies.
//! 4. **Simulation:** Configuration, run driver, trace analysis and statistics.

/// Error types shared across the crate.
pub mod common;
/// Simulator configuration (defaults, predictor policy, JSON loading).
pub mod config;
/// Pipeline engine, stages, latches, hazards, ROB and functional units.
pub mod core;
/// Run driver and trace analyzer.
pub mod sim;
/// Simulation statistics collection and reporting.
pub mod stats;
/// Instruction trace records, readers and writers.
pub mod trace;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// The cycle-level pipeline engine.
pub use crate::core::PipelineEngine;
/// Run driver owning an engine.
pub use crate::sim::Simulator;
/// Statistics of one simulation session.
pub use crate::stats::SimStats;
