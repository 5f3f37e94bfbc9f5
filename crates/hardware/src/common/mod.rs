//! Types shared by every part of the simulator.
//!
//! At the moment this is the error taxonomy; see [`error`] for details.

/// Error types for trace, configuration and simulator construction failures.
pub mod error;

pub use error::{ConfigError, SimError, TraceError};
