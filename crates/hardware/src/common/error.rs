//! Error types for trace ingestion, configuration and simulator setup.
//!
//! This module defines the three failure families surfaced by the crate:
//! 1. **Trace errors:** I/O failures and malformed records from a trace stream.
//! 2. **Configuration errors:** Unparseable or out-of-range configuration values.
//! 3. **Simulator errors:** The umbrella type returned when building a simulator.
//!
//! A full ROB and queries against a stale tag are not errors. They are reported
//! through `Option` and `bool` returns at the call site.

use std::io;

use thiserror::Error;

/// Failure while reading a record from a trace source.
///
/// The pipeline engine treats every variant as stream-fatal: it reports the
/// error once, stops fetching and lets in-flight instructions drain.
#[derive(Debug, Error)]
pub enum TraceError {
    /// The underlying reader failed.
    #[error("failed to read trace: {0}")]
    Io(#[from] io::Error),

    /// The stream ended partway through a fixed-size record.
    #[error("truncated trace record: expected {expected} bytes, got {actual}")]
    Truncated {
        /// Size of a complete record in bytes.
        expected: usize,
        /// Number of bytes actually available.
        actual: usize,
    },

    /// The op-type byte does not name a known operation category.
    #[error("unrecognized op type {0} in trace record")]
    InvalidOpType(u8),
}

/// Invalid simulator configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The pipeline must have at least one lane.
    #[error("pipeline width must be at least 1")]
    ZeroWidth,

    /// The reorder buffer must hold at least one entry.
    #[error("ROB capacity must be at least 1")]
    ZeroRobCapacity,

    /// A branch predictor policy name was not recognized.
    #[error("unknown branch predictor policy `{0}`")]
    UnknownPolicy(String),

    /// The JSON document could not be deserialized.
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] io::Error),
}

/// Error raised while constructing a [`Simulator`](crate::sim::simulator::Simulator).
#[derive(Debug, Error)]
pub enum SimError {
    /// The configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The trace could not be opened.
    #[error(transparent)]
    Trace(#[from] TraceError),
}
