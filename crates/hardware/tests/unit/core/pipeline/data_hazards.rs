//! Data Hazard Tests: RAW Dependencies and Forwarding.
//!
//! Each scenario is a producer, its dependent and one independent instruction
//! on a single lane. Without a stall three instructions take seven cycles; each
//! Decode stall adds one.

use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::builder::RecordBuilder;
use crate::common::harness::TestContext;
use pipesim_core::trace::InstructionRecord;

fn load_use() -> Vec<InstructionRecord> {
    vec![
        RecordBuilder::load(0x100, 1, 0x8000).build(),
        RecordBuilder::alu(0x104).src1(1).dest(2).build(),
        RecordBuilder::alu(0x108).build(),
    ]
}

/// An ALU op that sets condition codes and writes `r1`, then a reader of `r1`.
fn alu_use() -> Vec<InstructionRecord> {
    vec![
        RecordBuilder::alu(0x100).dest(1).writes_cc().build(),
        RecordBuilder::alu(0x104).src2(1).build(),
        RecordBuilder::alu(0x108).build(),
    ]
}

// ══════════════════════════════════════════════════════════
// 1. Forwarding matrix
// ══════════════════════════════════════════════════════════

// With no forwarding an adjacent consumer waits until its producer has left
// MemoryAccess, so the pair costs two cycles rather than one.
#[rstest]
#[case::no_forwarding(false, false, 2)]
#[case::execute_only(true, false, 2)]
#[case::memory_only(false, true, 1)]
#[case::full(true, true, 1)]
fn load_use_stalls(#[case] exe: bool, #[case] mem: bool, #[case] stalls: u64) {
    let stats = TestContext::new().forwarding(exe, mem).run(load_use());
    assert_eq!(stats.stalls_data, stalls);
    assert_eq!(stats.cycles, 7 + stalls);
    assert_eq!(stats.instructions_retired, 3);
}

#[rstest]
#[case::no_forwarding(false, false, 2)]
#[case::execute_only(true, false, 0)]
#[case::memory_only(false, true, 1)]
#[case::full(true, true, 0)]
fn alu_use_stalls(#[case] exe: bool, #[case] mem: bool, #[case] stalls: u64) {
    let stats = TestContext::new().forwarding(exe, mem).run(alu_use());
    assert_eq!(stats.stalls_data, stalls);
    assert_eq!(stats.cycles, 7 + stalls);
}

// ══════════════════════════════════════════════════════════
// 2. Dependency rules
// ══════════════════════════════════════════════════════════

/// Independent instructions never stall: N + 4 cycles.
#[test]
fn independent_stream_has_no_stalls() {
    let stats = TestContext::new().run(crate::common::builder::independent(10, 0x400));
    assert_eq!(stats.cycles, 14);
    assert_eq!(stats.stalls_data, 0);
    assert_eq!(stats.instructions_retired, 10);
}

/// A register written by a plain ALU op that neither accesses memory nor
/// sets condition codes does not create a tracked dependency.
#[test]
fn plain_alu_destination_is_not_tracked() {
    let trace = vec![
        RecordBuilder::alu(0x100).dest(1).build(),
        RecordBuilder::alu(0x104).src1(1).build(),
    ];
    let stats = TestContext::new().run(trace);
    assert_eq!(stats.stalls_data, 0);
    assert_eq!(stats.cycles, 6);
}

/// Condition-code writer followed by a branch reading them.
#[test]
fn condition_code_dependency_stalls_without_forwarding() {
    let trace = vec![
        RecordBuilder::alu(0x100).writes_cc().build(),
        RecordBuilder::branch(0x104, false).build(),
    ];
    let stats = TestContext::new().run(trace);
    assert_eq!(stats.stalls_data, 2);
    assert_eq!(stats.cycles, 8);
}

/// A source that is named but not needed is ignored.
#[test]
fn unneeded_source_is_ignored() {
    let mut consumer = RecordBuilder::alu(0x104).build();
    consumer.src1_reg = 1;
    let trace = vec![RecordBuilder::load(0x100, 1, 0x40).build(), consumer];
    let stats = TestContext::new().run(trace);
    assert_eq!(stats.stalls_data, 0);
}

/// The dependent leaves Decode only once its producer is past the
/// non-forwarding latches; it never overtakes it.
#[test]
fn dependent_retires_after_producer() {
    let ctx = TestContext::new();
    let mut engine = ctx.engine(load_use());
    let mut retired_at = Vec::new();
    while !engine.is_halted() {
        let before = engine.stats().instructions_retired;
        engine.step();
        if engine.stats().instructions_retired > before {
            retired_at.push(engine.stats().cycles);
        }
    }
    assert_eq!(retired_at, vec![5, 8, 9]);
}
