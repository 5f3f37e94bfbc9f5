//! Speculative multi-lane pipeline.
//!
//! This module contains the cycle-level model of the in-order pipeline and the
//! dataflow structures it feeds. It includes the following components:
//! 1. **Engine:** Owns all state and advances one cycle per call.
//! 2. **Latches:** The double-buffered slot grid between stages.
//! 3. **Hazards:** Dependency and forwarding rules used by Decode.
//! 4. **Stages:** Fetch, Decode, Execute, Memory and Writeback.
//! 5. **ROB and Scoreboard:** In-order commit and register producer tracking.

/// The pipeline engine and its cycle function.
pub mod engine;

/// Dependency detection and forwarding rules.
pub mod hazards;

/// Per-stage, per-lane pipeline slots.
pub mod latches;

/// Circular reorder buffer with in-order commit.
pub mod rob;

/// Register-to-ROB-entry producer map.
pub mod scoreboard;

/// Pipeline stage implementations (fetch, decode, execute, memory, writeback).
pub mod stages;

pub use self::engine::PipelineEngine;
