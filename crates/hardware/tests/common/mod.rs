//! Shared test utilities.

/// Fluent trace record construction.
pub mod builder;
