//! Memory hierarchy interfaces.
//!
//! The pipeline does not model cache or DRAM timing. These traits describe the
//! collaborator it reports data accesses to: the MemoryAccess stage forwards
//! each memory operation to an attached hierarchy and records the outcomes in
//! the session statistics, without changing when the instruction retires.

/// Log2 of the cache line size used to form line addresses.
pub const LINE_SHIFT: u32 = 6;

/// Converts a byte address into a line address.
#[inline]
pub const fn line_addr(addr: u64) -> u64 {
    addr >> LINE_SHIFT
}

/// Result of a cache lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheOutcome {
    /// The line was present.
    Hit,
    /// The line was absent.
    Miss,
}

/// A cache hierarchy as seen by one core.
pub trait MemoryHierarchy {
    /// Looks up `line_addr`, updating replacement state on a hit.
    ///
    /// # Arguments
    ///
    /// * `line_addr` - Line address (byte address >> [`LINE_SHIFT`])
    /// * `is_write` - Whether the access is a store
    /// * `core_id` - Requesting core
    fn access(&mut self, line_addr: u64, is_write: bool, core_id: usize) -> CacheOutcome;

    /// Installs `line_addr` after a miss.
    ///
    /// # Returns
    ///
    /// `true` if the evicted victim line was dirty.
    fn install(&mut self, line_addr: u64, is_write: bool, core_id: usize) -> bool;
}

/// A DRAM timing oracle.
pub trait DramTiming {
    /// Returns the delay in cycles for an access to `line_addr`.
    fn access(&mut self, line_addr: u64, is_write: bool) -> u64;
}
