//! Pipeline scheduling engine.
//!
//! This module owns the per-cycle advancement of the multi-lane pipeline:
//! 1. **Cycle Step:** `step` runs WriteBack, MemoryAccess, Execute, Decode, then Fetch.
//! 2. **Double Buffering:** Stages read the latches of the previous cycle and write the next.
//! 3. **Stall Propagation:** A Decode stall raised this cycle holds the matching Fetch lane.
//! 4. **Misprediction Recovery:** A mispredicted branch blocks all fetch until it retires.
//! 5. **Halt:** The run ends when the last fetched instruction retires.

use std::fmt;

use tracing::{debug, error, info, trace};

use crate::common::error::ConfigError;
use crate::config::Config;
use crate::core::pipeline::hazards::Forwarding;
use crate::core::pipeline::latches::{LatchFile, Latches};
use crate::core::pipeline::rob::ReorderBuffer;
use crate::core::pipeline::scoreboard::Scoreboard;
use crate::core::pipeline::stages::{
    decode_stage, execute_stage, fetch_stage, memory_stage, writeback_stage,
};
use crate::core::units::bru::BranchPredictorUnit;
use crate::core::units::memory::{DramTiming, MemoryHierarchy};
use crate::stats::SimStats;
use crate::trace::{InstructionRecord, TraceSource};

/// Multi-lane, five-stage pipeline driven by an instruction trace.
pub struct PipelineEngine {
    /// Number of lanes.
    pub(crate) width: usize,
    /// Enabled forwarding paths.
    pub(crate) forwarding: Forwarding,
    /// Dump the latch grid at `trace` level after each cycle.
    pub(crate) trace_pipeline: bool,
    /// Double-buffered [stage][lane] latches.
    pub(crate) latches: LatchFile,
    /// Instruction supply.
    pub(crate) trace: Box<dyn TraceSource>,
    /// Set once the trace has ended or failed; it is never read again.
    pub(crate) trace_done: bool,
    /// Direction predictor; `None` under the perfect policy.
    pub(crate) predictor: Option<BranchPredictorUnit>,
    /// Commit-order tracking of instructions past Decode.
    pub(crate) rob: ReorderBuffer,
    /// Latest in-flight producer of each register.
    pub(crate) scoreboard: Scoreboard,
    /// Optional data-side memory hierarchy (statistics only).
    pub(crate) memory: Option<Box<dyn MemoryHierarchy>>,
    /// Optional DRAM timing oracle consulted on misses (statistics only).
    pub(crate) dram: Option<Box<dyn DramTiming>>,
    /// Per-lane highest blocking producer id; raised while stalled, cleared on issue.
    pub(crate) blocking: Vec<u64>,
    /// `op_id` of the most recently fetched instruction (0 before the first).
    pub(crate) last_op_id: u64,
    /// Highest `op_id` retired so far (0 before the first).
    pub(crate) last_retired: u64,
    /// `op_id` whose retirement halts the run, known once the trace ends.
    pub(crate) halt_op_id: Option<u64>,
    /// Fetch is blocked until the mispredicted branch retires.
    pub(crate) fetch_cbr_stall: bool,
    /// The run is over.
    pub(crate) halted: bool,
    /// Session statistics.
    pub(crate) stats: SimStats,
}

impl fmt::Debug for PipelineEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineEngine")
            .field("width", &self.width)
            .field("forwarding", &self.forwarding)
            .field("predictor", &self.predictor)
            .field("last_op_id", &self.last_op_id)
            .field("last_retired", &self.last_retired)
            .field("halt_op_id", &self.halt_op_id)
            .field("fetch_cbr_stall", &self.fetch_cbr_stall)
            .field("halted", &self.halted)
            .field("cycles", &self.stats.cycles)
            .finish_non_exhaustive()
    }
}

impl PipelineEngine {
    /// Creates an engine that fetches from `trace`.
    ///
    /// # Arguments
    ///
    /// * `config` - Run configuration; lane width, forwarding, predictor policy and
    ///   ROB capacity are fixed from here on.
    /// * `trace` - The instruction supply.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the configuration fails validation.
    pub fn new(config: &Config, trace: Box<dyn TraceSource>) -> Result<Self, ConfigError> {
        config.validate()?;
        let pipeline = &config.pipeline;
        Ok(Self {
            width: pipeline.width,
            forwarding: Forwarding {
                execute: pipeline.enable_exe_fwd,
                memory: pipeline.enable_mem_fwd,
            },
            trace_pipeline: config.general.trace_pipeline,
            latches: LatchFile::new(pipeline.width),
            trace,
            trace_done: false,
            predictor: BranchPredictorUnit::from_policy(pipeline.branch_predictor),
            rob: ReorderBuffer::new(pipeline.rob_capacity),
            scoreboard: Scoreboard::new(),
            memory: None,
            dram: None,
            blocking: vec![0; pipeline.width],
            last_op_id: 0,
            last_retired: 0,
            halt_op_id: None,
            fetch_cbr_stall: false,
            halted: false,
            stats: SimStats::default(),
        })
    }

    /// Attaches a memory hierarchy that MemoryAccess reports data accesses to.
    #[must_use]
    pub fn with_memory_hierarchy(mut self, memory: Box<dyn MemoryHierarchy>) -> Self {
        self.memory = Some(memory);
        self
    }

    /// Attaches a DRAM timing oracle consulted on data-cache misses.
    #[must_use]
    pub fn with_dram(mut self, dram: Box<dyn DramTiming>) -> Self {
        self.dram = Some(dram);
        self
    }

    /// Advances every stage of every lane by one cycle.
    ///
    /// Does nothing once the engine has halted.
    pub fn step(&mut self) {
        if self.halted {
            return;
        }
        self.stats.cycles += 1;
        self.latches.begin_cycle();

        writeback_stage(self);
        memory_stage(self);
        execute_stage(self);
        decode_stage(self);
        fetch_stage(self);

        self.latches.commit();

        if self.trace_pipeline {
            trace!(cycle = self.stats.cycles, "\n{}", self.latches.current());
        }
        if self.halted {
            info!(
                cycles = self.stats.cycles,
                retired = self.stats.instructions_retired,
                "pipeline halted"
            );
        }
    }

    /// Pulls the next record for Fetch, or `None` once the trace is over.
    ///
    /// The first end-of-stream or malformed record fixes the halt id to the
    /// last fetched instruction. A malformed record is reported here, once.
    /// With nothing left in flight the run halts here, since no later
    /// retirement will reach the halt id.
    pub(crate) fn next_record(&mut self) -> Option<InstructionRecord> {
        if !self.trace_done {
            match self.trace.next_record() {
                Ok(Some(record)) => return Some(record),
                Ok(None) => {
                    debug!(last_op_id = self.last_op_id, "end of trace");
                }
                Err(err) => {
                    error!(
                        last_op_id = self.last_op_id,
                        "trace stream failed, draining pipeline: {err}"
                    );
                }
            }
            self.trace_done = true;
        }
        self.halt_op_id = Some(self.last_op_id);
        if self.last_retired >= self.last_op_id {
            self.halted = true;
        }
        None
    }

    /// Whether the run is over.
    pub const fn is_halted(&self) -> bool {
        self.halted
    }

    /// Session statistics.
    pub const fn stats(&self) -> &SimStats {
        &self.stats
    }

    /// Consumes the engine and returns its statistics.
    pub fn into_stats(self) -> SimStats {
        self.stats
    }

    /// Latch state after the most recent cycle.
    pub const fn latches(&self) -> &Latches {
        self.latches.current()
    }

    /// The reorder buffer.
    pub const fn rob(&self) -> &ReorderBuffer {
        &self.rob
    }

    /// The register scoreboard.
    pub const fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }

    /// The branch predictor, or `None` under the perfect policy.
    pub const fn predictor(&self) -> Option<&BranchPredictorUnit> {
        self.predictor.as_ref()
    }

    /// Number of lanes.
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Enabled forwarding paths.
    pub const fn forwarding(&self) -> Forwarding {
        self.forwarding
    }

    /// `op_id` of the most recently fetched instruction.
    pub const fn last_op_id(&self) -> u64 {
        self.last_op_id
    }

    /// Highest `op_id` retired so far.
    pub const fn last_retired(&self) -> u64 {
        self.last_retired
    }

    /// `op_id` whose retirement ends the run, once the trace has ended.
    pub const fn halt_op_id(&self) -> Option<u64> {
        self.halt_op_id
    }

    /// Whether fetch is blocked behind a mispredicted branch.
    pub const fn fetch_blocked(&self) -> bool {
        self.fetch_cbr_stall
    }

    /// Renders the cycle number and the latch grid.
    pub fn dump_state(&self) -> String {
        format!(
            "cycle {}{}\n{}",
            self.stats.cycles,
            if self.fetch_cbr_stall {
                " (fetch blocked)"
            } else {
                ""
            },
            self.latches.current()
        )
    }
}
