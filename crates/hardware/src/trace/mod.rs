//! Instruction trace records and the sources that yield them.
//!
//! This module provides:
//! 1. **Records:** `InstructionRecord`, the timing-relevant metadata of one dynamic instruction.
//! 2. **Codec:** The fixed 32-byte little-endian on-disk layout.
//! 3. **Sources:** The `TraceSource` trait with file-backed and in-memory implementations.

/// Instruction record, operation categories and the binary record codec.
pub mod record;

/// Trace sources (stream reader, in-memory trace) and the trace writer.
pub mod source;

pub use record::{InstructionRecord, OpType, RECORD_SIZE};
pub use source::{MemoryTrace, TraceReader, TraceSource, TraceWriter};
