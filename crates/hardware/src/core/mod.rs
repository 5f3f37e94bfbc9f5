//! Core pipeline model.
//!
//! This module contains the pipeline engine with its latches, hazard logic and
//! reorder buffer, plus the functional units it consults.

/// Instruction pipeline implementation (engine, stages, latches, hazards, ROB).
pub mod pipeline;

/// Branch prediction and memory-hierarchy hooks.
pub mod units;

pub use self::pipeline::PipelineEngine;
