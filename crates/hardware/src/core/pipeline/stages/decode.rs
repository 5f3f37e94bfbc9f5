//! Instruction Decode (ID) Stage.
//!
//! This module implements the hazard-checking stage of the pipeline. It copies
//! the Fetch latch forward and decides, lane by lane, whether each instruction
//! proceeds to Execute or is held in place:
//! 1. **Data Hazards:** A dependency on an older producer that forwarding cannot satisfy.
//! 2. **Ordering:** An instruction never passes an older stalled instruction.
//! 3. **Structural Hazards:** No free ROB entry.
//!
//! Lanes are resolved oldest first, so every older lane's decision is final
//! when a younger lane looks at it.

use tracing::trace;

use crate::core::pipeline::engine::PipelineEngine;
use crate::core::pipeline::hazards::{blocking_producer, producer_blocks};
use crate::core::pipeline::latches::{PipelineSlot, Stage};
use crate::core::pipeline::rob::{ReorderBuffer, RobInstruction, RobOperand};
use crate::core::pipeline::scoreboard::Scoreboard;

/// Why a Decode slot is held in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StallCause {
    /// Waiting on a producer.
    Data,
    /// Waiting for ROB space.
    Structural,
}

/// Executes the instruction decode stage of the pipeline.
///
/// # Arguments
///
/// * `pipe` - Mutable reference to the pipeline engine
///
/// # Behavior
///
/// - A replayed (already stalled) instruction stays stalled while its lane's
///   highest blocking producer is still in flight without a usable forwarding path
/// - Otherwise all older producers in Decode, Execute and MemoryAccess are checked,
///   and the lane's blocking producer id is raised to the youngest blocking one
/// - An instruction younger than a stalled Decode instruction stalls too and
///   inherits that instruction's blocking producer id
/// - An instruction that proceeds is allocated a ROB entry, or stalls if none is free
pub fn decode_stage(pipe: &mut PipelineEngine) {
    let fwd = pipe.forwarding;
    let width = pipe.width;
    let (current, next) = pipe.latches.split();
    next.row_mut(Stage::Decode)
        .copy_from_slice(current.row(Stage::Fetch));

    let mut order: Vec<usize> = (0..width).collect();
    order.sort_by_key(|&lane| next.row(Stage::Decode)[lane].op_id);
    let mut causes: Vec<Option<StallCause>> = vec![None; width];

    for (pos, &lane) in order.iter().enumerate() {
        let mut slot = next.row(Stage::Decode)[lane];
        if !slot.valid {
            slot.stall = false;
            next.row_mut(Stage::Decode)[lane] = slot;
            continue;
        }

        let mut cause = None;
        if slot.stall && producer_blocks(pipe.blocking[lane], next, fwd) {
            cause = Some(StallCause::Data);
        } else if let Some(producer) = blocking_producer(&slot, next, fwd) {
            pipe.blocking[lane] = pipe.blocking[lane].max(producer);
            cause = Some(StallCause::Data);
        }

        if cause.is_none() {
            let decode = next.row(Stage::Decode);
            let older_stalled = order[..pos]
                .iter()
                .copied()
                .find(|&older| decode[older].valid && decode[older].stall);
            if let Some(older) = older_stalled {
                pipe.blocking[lane] = pipe.blocking[lane].max(pipe.blocking[older]);
                cause = causes[older];
            }
        }

        if cause.is_none() && !allocate(&mut pipe.rob, &mut pipe.scoreboard, &mut slot) {
            cause = Some(StallCause::Structural);
        }

        match cause {
            Some(StallCause::Data) => pipe.stats.stalls_data += 1,
            Some(StallCause::Structural) => pipe.stats.stalls_structural += 1,
            None => pipe.blocking[lane] = 0,
        }
        slot.stall = cause.is_some();
        causes[lane] = cause;
        next.row_mut(Stage::Decode)[lane] = slot;

        trace!(
            lane,
            op_id = slot.op_id,
            stall = ?cause,
            blocking = pipe.blocking[lane],
            "ID  decode"
        );
    }
}

/// Allocates a ROB entry for `slot` and records its dataflow.
///
/// Source operands take their tags from the scoreboard; the destination
/// register, if written, becomes owned by the new entry.
///
/// # Returns
///
/// `false` if the ROB has no free entry; the slot is left untouched.
fn allocate(rob: &mut ReorderBuffer, scoreboard: &mut Scoreboard, slot: &mut PipelineSlot) -> bool {
    if !rob.check_space() {
        return false;
    }
    let record = slot.record;
    let operand = |needed: bool, reg: u8| match scoreboard.producer(reg) {
        Some(tag) if needed => RobOperand::produced_by(reg, tag, rob.check_ready(tag)),
        _ => RobOperand::available(reg),
    };
    let src1 = operand(record.src1_needed, record.src1_reg);
    let src2 = operand(record.src2_needed, record.src2_reg);
    let inst = RobInstruction::new(slot.op_id, &record, src1, src2);

    let Some(tag) = rob.insert(inst) else {
        return false;
    };
    if let Some(reg) = inst.dest_reg {
        scoreboard.set_producer(reg, tag);
    }
    slot.dataflow = Some(RobInstruction {
        dest_tag: Some(tag),
        ..inst
    });
    true
}
