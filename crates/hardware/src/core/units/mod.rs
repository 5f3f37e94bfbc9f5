//! Functional units consulted by the pipeline.
//!
//! The branch prediction unit is used at fetch. The memory module only defines
//! the hook a cache model implements to observe memory accesses.

/// Branch prediction unit: static and gshare direction predictors.
pub mod bru;

/// Memory-hierarchy and DRAM timing hooks.
pub mod memory;
