//! Halt Tests: Trace End and Malformed Records.

use std::io::Cursor;

use pretty_assertions::assert_eq;

use crate::common::builder::{RecordBuilder, independent};
use crate::common::harness::{TestContext, run_to_halt};
use pipesim_core::trace::{RECORD_SIZE, TraceReader};

/// Encodes `n` independent records back to back.
fn encoded(n: usize) -> Vec<u8> {
    independent(n, 0x100)
        .iter()
        .flat_map(|record| record.encode())
        .collect()
}

#[test]
fn empty_trace_halts_on_first_cycle() {
    let ctx = TestContext::new();
    let mut engine = ctx.engine(Vec::new());
    engine.step();
    assert!(engine.is_halted());
    assert_eq!(engine.stats().cycles, 1);
    assert_eq!(engine.stats().instructions_retired, 0);

    // Further steps are no-ops.
    engine.step();
    assert_eq!(engine.stats().cycles, 1);
}

#[test]
fn halt_id_is_last_fetched_instruction() {
    let ctx = TestContext::new();
    let mut engine = ctx.engine(independent(3, 0x100));
    assert_eq!(engine.halt_op_id(), None);
    for _ in 0..4 {
        engine.step();
    }
    assert_eq!(engine.halt_op_id(), Some(3));
    assert!(!engine.is_halted());
    run_to_halt(&mut engine);
    assert_eq!(engine.stats().cycles, 7);
}

#[test]
fn single_instruction_takes_five_cycles() {
    let stats = TestContext::new().run(vec![RecordBuilder::store(0x0, 0x40).build()]);
    assert_eq!(stats.cycles, 5);
    assert_eq!(stats.instructions_retired, 1);
    assert_eq!(stats.inst_store, 1);
}

/// An unknown op type ends the stream: the instructions before it drain.
#[test]
fn invalid_op_type_drains_pipeline() {
    let mut bytes = encoded(2);
    let mut bad = RecordBuilder::alu(0x200).build().encode();
    bad[16] = 7;
    bytes.extend_from_slice(&bad);
    bytes.extend(encoded(5));

    let ctx = TestContext::new();
    let mut engine = ctx.engine_from(Box::new(TraceReader::new(Cursor::new(bytes))));
    run_to_halt(&mut engine);
    assert_eq!(engine.stats().instructions_retired, 2);
    assert_eq!(engine.stats().cycles, 6);
}

/// A partial trailing record is treated like the end of the trace.
#[test]
fn truncated_record_drains_pipeline() {
    let mut bytes = encoded(2);
    bytes.extend(std::iter::repeat_n(0u8, RECORD_SIZE / 2));

    let ctx = TestContext::new();
    let mut engine = ctx.engine_from(Box::new(TraceReader::new(Cursor::new(bytes))));
    run_to_halt(&mut engine);
    assert_eq!(engine.stats().instructions_retired, 2);
    assert_eq!(engine.halt_op_id(), Some(2));
}

/// A trace that is malformed from the first record halts immediately.
#[test]
fn malformed_first_record_halts_immediately() {
    let mut bad = RecordBuilder::alu(0x0).build().encode();
    bad[16] = 0xff;
    let ctx = TestContext::new();
    let mut engine = ctx.engine_from(Box::new(TraceReader::new(Cursor::new(bad.to_vec()))));
    engine.step();
    assert!(engine.is_halted());
    assert_eq!(engine.stats().instructions_retired, 0);
}
