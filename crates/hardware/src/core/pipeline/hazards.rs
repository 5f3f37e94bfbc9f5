//! Data Hazard Detection and Forwarding.
//!
//! This module decides whether an instruction in Decode must wait for an older
//! in-flight producer. It provides:
//! 1. **Dependency Detection:** Condition-code and register read-after-write checks.
//! 2. **Forwarding Rules:** Which latch positions can satisfy a dependency.
//! 3. **Blocking Producers:** The youngest producer that still forces a stall.
//!
//! Producers are looked for among valid, older slots in the Decode, Execute and
//! MemoryAccess rows of the latches being built for the next cycle.

use crate::core::pipeline::latches::{Latches, PipelineSlot, Stage};
use crate::trace::InstructionRecord;

/// Rows searched for producers, youngest first.
const PRODUCER_STAGES: [Stage; 3] = [Stage::Decode, Stage::Execute, Stage::MemoryAccess];

/// Enabled forwarding paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Forwarding {
    /// A non-load producer in the Execute latch can satisfy a consumer.
    pub execute: bool,
    /// A producer in the MemoryAccess latch can satisfy a consumer.
    pub memory: bool,
}

impl Forwarding {
    /// No forwarding: consumers wait until producers leave MemoryAccess.
    pub const NONE: Self = Self {
        execute: false,
        memory: false,
    };

    /// Both forwarding paths enabled.
    pub const FULL: Self = Self {
        execute: true,
        memory: true,
    };
}

/// Returns whether `consumer` has a true dependency on `producer`.
///
/// The dependency is either of these:
/// - **Condition codes:** the producer writes them and the consumer reads them.
/// - **Register:** the producer writes a destination register and performs a
///   memory access or writes condition codes, and a needed source register of
///   the consumer names that destination.
pub const fn depends_on(consumer: &InstructionRecord, producer: &InstructionRecord) -> bool {
    if producer.cc_write && consumer.cc_read {
        return true;
    }
    if !producer.dest_needed || !(producer.mem_access || producer.cc_write) {
        return false;
    }
    (consumer.src1_needed && consumer.src1_reg == producer.dest_reg)
        || (consumer.src2_needed && consumer.src2_reg == producer.dest_reg)
}

/// Returns whether a producer at `stage` can forward its result.
///
/// Loads cannot forward out of Execute: their value exists only after MemoryAccess.
pub const fn can_forward(producer: &PipelineSlot, stage: Stage, fwd: Forwarding) -> bool {
    match stage {
        Stage::Execute => fwd.execute && !producer.record.is_load(),
        Stage::MemoryAccess => fwd.memory,
        Stage::Fetch | Stage::Decode => false,
    }
}

/// Finds the youngest older producer that forces `consumer` to stall.
///
/// # Returns
///
/// The `op_id` of that producer, or `None` if every dependency is either
/// absent or satisfied by forwarding.
pub fn blocking_producer(
    consumer: &PipelineSlot,
    latches: &Latches,
    fwd: Forwarding,
) -> Option<u64> {
    latches
        .valid_in(&PRODUCER_STAGES)
        .filter(|(_, producer)| producer.op_id < consumer.op_id)
        .filter(|(stage, producer)| {
            depends_on(&consumer.record, &producer.record) && !can_forward(producer, *stage, fwd)
        })
        .map(|(_, producer)| producer.op_id)
        .max()
}

/// Returns whether the producer `op_id` still forces its consumers to stall.
///
/// True while it is valid in Decode, in Execute without usable forwarding, or
/// in MemoryAccess without memory forwarding. `op_id` 0 never blocks.
pub fn producer_blocks(op_id: u64, latches: &Latches, fwd: Forwarding) -> bool {
    op_id != 0
        && latches
            .valid_in(&PRODUCER_STAGES)
            .any(|(stage, producer)| producer.op_id == op_id && !can_forward(producer, stage, fwd))
}
