//! Simulator: owns the pipeline engine and drives it to completion.

use std::path::Path;

use tracing::{info, warn};

use crate::common::SimError;
use crate::config::Config;
use crate::core::PipelineEngine;
use crate::stats::SimStats;
use crate::trace::{TraceReader, TraceSource};

/// Top-level simulator: a pipeline engine plus the run limit.
#[derive(Debug)]
pub struct Simulator {
    engine: PipelineEngine,
    max_cycles: Option<u64>,
}

impl Simulator {
    /// Creates a simulator over `trace` with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] if the configuration is invalid.
    pub fn new(config: &Config, trace: Box<dyn TraceSource>) -> Result<Self, SimError> {
        Ok(Self {
            engine: PipelineEngine::new(config, trace)?,
            max_cycles: config.general.max_cycles,
        })
    }

    /// Creates a simulator reading the trace file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Trace`] if the file cannot be opened, or
    /// [`SimError::Config`] if the configuration is invalid.
    pub fn from_trace_file(path: impl AsRef<Path>, config: &Config) -> Result<Self, SimError> {
        let reader = TraceReader::open(path.as_ref())?;
        info!(trace = %path.as_ref().display(), "opened trace");
        Self::new(config, Box::new(reader))
    }

    /// Replaces the engine, e.g. one with a memory hierarchy attached.
    #[must_use]
    pub fn with_engine(mut self, engine: PipelineEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Advances the simulation by one cycle.
    pub fn step(&mut self) {
        self.engine.step();
    }

    /// Steps until the pipeline halts or the cycle limit is reached.
    ///
    /// # Returns
    ///
    /// The statistics at the end of the run.
    pub fn run(&mut self) -> &SimStats {
        while !self.engine.is_halted() {
            if self.limit_reached() {
                warn!(
                    cycles = self.engine.stats().cycles,
                    retired = self.engine.stats().instructions_retired,
                    "cycle limit reached before the pipeline drained"
                );
                break;
            }
            self.engine.step();
        }
        self.engine.stats()
    }

    /// Whether the configured cycle limit has been reached.
    pub fn limit_reached(&self) -> bool {
        self.max_cycles
            .is_some_and(|limit| self.engine.stats().cycles >= limit)
    }

    /// The underlying engine.
    pub const fn engine(&self) -> &PipelineEngine {
        &self.engine
    }

    /// Consumes the simulator and returns its statistics.
    pub fn into_stats(self) -> SimStats {
        self.engine.into_stats()
    }
}
