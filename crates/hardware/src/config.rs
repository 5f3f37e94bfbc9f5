//! Configuration system for the pipeline simulator.
//!
//! This module defines the configuration structures used to parameterize a run.
//! It provides:
//! 1. **Defaults:** Baseline lane width, forwarding paths, predictor policy and ROB size.
//! 2. **Structures:** `GeneralConfig` for driver behaviour and `PipelineConfig` for the core.
//! 3. **Enums:** The branch predictor policy selector.
//!
//! Configuration is supplied as JSON (every field optional) or built from
//! `Config::default()` and overridden field by field. A configuration is fixed
//! for the duration of a run.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::common::error::ConfigError;

/// Default configuration constants for the simulator.
mod defaults {
    /// Number of instructions fetched, decoded and retired per cycle.
    pub const PIPELINE_WIDTH: usize = 1;

    /// Execute-stage forwarding is off unless requested.
    pub const ENABLE_EXE_FWD: bool = false;

    /// Memory-stage forwarding is off unless requested.
    pub const ENABLE_MEM_FWD: bool = false;

    /// Number of live entries the reorder buffer can hold.
    ///
    /// An in-order pipeline keeps at most three lane-widths of instructions
    /// between Decode and WriteBack, so this never limits widths below 11.
    pub const ROB_CAPACITY: usize = 32;
}

/// Branch predictor policy consulted at fetch for conditional branches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub enum BranchPredictorPolicy {
    /// Oracle prediction: the predictor is never consulted and no branch is
    /// ever mispredicted.
    #[default]
    Perfect,
    /// Static policy predicting every conditional branch as taken.
    AlwaysTaken,
    /// Static policy predicting every conditional branch as not taken.
    AlwaysNotTaken,
    /// Two-level adaptive predictor: 2-bit counters indexed by PC XOR global history.
    #[serde(alias = "Adaptive", alias = "GShare")]
    Gshare,
}

impl BranchPredictorPolicy {
    /// Returns the canonical lower-case name used by the CLI and reports.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Perfect => "perfect",
            Self::AlwaysTaken => "always-taken",
            Self::AlwaysNotTaken => "always-not-taken",
            Self::Gshare => "gshare",
        }
    }
}

impl FromStr for BranchPredictorPolicy {
    type Err = ConfigError;

    /// Parses a policy name, ignoring case and `-`/`_` separators.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "perfect" | "oracle" => Ok(Self::Perfect),
            "alwaystaken" | "taken" => Ok(Self::AlwaysTaken),
            "alwaysnottaken" | "nottaken" | "static" => Ok(Self::AlwaysNotTaken),
            "gshare" | "adaptive" => Ok(Self::Gshare),
            _ => Err(ConfigError::UnknownPolicy(s.to_owned())),
        }
    }
}

/// Root configuration structure for the simulator.
///
/// # Examples
///
/// ```
/// use pipesim_core::config::{BranchPredictorPolicy, Config};
///
/// let json = r#"{
///     "pipeline": { "width": 2, "branch_predictor": "Gshare", "enable_mem_fwd": true }
/// }"#;
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.pipeline.width, 2);
/// assert_eq!(config.pipeline.branch_predictor, BranchPredictorPolicy::Gshare);
/// assert!(!config.pipeline.enable_exe_fwd);
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Driver behaviour (cycle limit, per-cycle dumps).
    #[serde(default)]
    pub general: GeneralConfig,
    /// Pipeline engine parameters.
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl Config {
    /// Parses and validates a JSON configuration document.
    ///
    /// # Arguments
    ///
    /// * `json` - The JSON text; omitted fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and a range error from
    /// [`Config::validate`] for out-of-range values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise the
    /// same errors as [`Config::from_json`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Checks that every parameter is in range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroWidth`] or [`ConfigError::ZeroRobCapacity`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pipeline.width == 0 {
            return Err(ConfigError::ZeroWidth);
        }
        if self.pipeline.rob_capacity == 0 {
            return Err(ConfigError::ZeroRobCapacity);
        }
        Ok(())
    }
}

/// General simulation settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Upper bound on simulated cycles; `None` runs until the trace drains.
    #[serde(default)]
    pub max_cycles: Option<u64>,

    /// Log the full latch grid at `trace` level after every cycle.
    #[serde(default)]
    pub trace_pipeline: bool,
}

/// Pipeline engine configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PipelineConfig {
    /// Number of lanes (instructions per cycle in every stage).
    #[serde(default = "PipelineConfig::default_width")]
    pub width: usize,

    /// Branch predictor policy.
    #[serde(default)]
    pub branch_predictor: BranchPredictorPolicy,

    /// Allow a non-load producer in the Execute latch to satisfy a consumer.
    #[serde(default = "PipelineConfig::default_exe_fwd")]
    pub enable_exe_fwd: bool,

    /// Allow a producer in the MemoryAccess latch to satisfy a consumer.
    #[serde(default = "PipelineConfig::default_mem_fwd")]
    pub enable_mem_fwd: bool,

    /// Reorder buffer capacity in live entries.
    #[serde(default = "PipelineConfig::default_rob_capacity")]
    pub rob_capacity: usize,
}

impl PipelineConfig {
    /// Returns the default pipeline width.
    const fn default_width() -> usize {
        defaults::PIPELINE_WIDTH
    }

    /// Returns the default execute-forwarding toggle.
    const fn default_exe_fwd() -> bool {
        defaults::ENABLE_EXE_FWD
    }

    /// Returns the default memory-forwarding toggle.
    const fn default_mem_fwd() -> bool {
        defaults::ENABLE_MEM_FWD
    }

    /// Returns the default reorder buffer capacity.
    const fn default_rob_capacity() -> usize {
        defaults::ROB_CAPACITY
    }
}

impl Default for PipelineConfig {
    /// Creates a single-lane pipeline with no forwarding and a perfect predictor.
    fn default() -> Self {
        Self {
            width: defaults::PIPELINE_WIDTH,
            branch_predictor: BranchPredictorPolicy::default(),
            enable_exe_fwd: defaults::ENABLE_EXE_FWD,
            enable_mem_fwd: defaults::ENABLE_MEM_FWD,
            rob_capacity: defaults::ROB_CAPACITY,
        }
    }
}
