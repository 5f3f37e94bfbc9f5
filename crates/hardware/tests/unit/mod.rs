//! # Unit Components
//!
//! This module organizes the tests for each part of the simulator, from the
//! configuration layer and trace codec up to whole-pipeline timing scenarios.

/// Configuration loading, defaults and validation.
pub mod config;



/// Statistics accounting and reporting.
pub mod stats;
