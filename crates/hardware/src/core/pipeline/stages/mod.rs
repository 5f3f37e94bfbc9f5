//! Pipeline stage implementations.
//!
//! One function per stage, each advancing every lane by one cycle:
//! 1. **Fetch:** Pulls trace records and predicts conditional branches.
//! 2. **Decode:** Detects hazards and allocates ROB entries.
//! 3. **Execute:** Moves instructions forward and marks them executing.
//! 4. **Memory:** Moves instructions forward and probes the memory hook.
//! 5. **Writeback:** Retires instructions and commits the ROB head.
//!
//! The engine calls them in reverse order so each stage reads the latches of
//! the previous cycle.

/// Instruction decode stage implementation.
pub mod decode;

/// Instruction execute stage implementation.
pub mod execute;

/// Instruction fetch stage implementation.
pub mod fetch;

/// Memory access stage implementation.
pub mod memory;

/// Writeback stage implementation.
pub mod writeback;

/// Decode stage entry point (ID stage).
pub use decode::decode_stage;
/// Execute stage entry point (EX stage).
pub use execute::execute_stage;
/// Fetch stage entry point (IF stage).
pub use fetch::fetch_stage;
/// Memory stage entry point (MA stage).
pub use memory::memory_stage;
/// Writeback stage entry point (WB stage).
pub use writeback::writeback_stage;
