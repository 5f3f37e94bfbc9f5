//! Instruction Fetch (IF) Stage.
//!
//! This module implements the first stage of the pipeline. It pulls up to one
//! record per lane from the trace, assigns fetch-order ids and consults the
//! branch predictor on conditional branches. After a misprediction the stage
//! inserts bubbles until the branch retires.

use tracing::{debug, trace};

use crate::core::pipeline::engine::PipelineEngine;
use crate::core::pipeline::latches::{PipelineSlot, Stage};
use crate::core::units::bru::{BranchDirection, BranchPredictor};

/// Executes the instruction fetch stage of the pipeline.
///
/// # Arguments
///
/// * `pipe` - Mutable reference to the pipeline engine
///
/// # Behavior
///
/// - A lane whose Decode slot stalled this cycle keeps its Fetch slot and marks it stalled
/// - While fetch is blocked behind a mispredicted branch, each lane gets a bubble
/// - Otherwise the next trace record is fetched, or a bubble once the trace is over
pub fn fetch_stage(pipe: &mut PipelineEngine) {
    for lane in 0..pipe.width {
        if pipe.latches.next().row(Stage::Decode)[lane].stall {
            pipe.latches.next_mut().row_mut(Stage::Fetch)[lane].stall = true;
            continue;
        }

        if pipe.fetch_cbr_stall {
            pipe.latches.next_mut().row_mut(Stage::Fetch)[lane] = PipelineSlot::bubble();
            pipe.stats.stalls_control += 1;
            continue;
        }

        let slot = match pipe.next_record() {
            Some(record) => {
                pipe.last_op_id += 1;
                pipe.stats.record_fetch(record.op_type);
                let mut slot = PipelineSlot::fetched(record, pipe.last_op_id);
                if slot.record.is_cond_branch() {
                    check_branch(pipe, &mut slot);
                }
                trace!(lane, op_id = slot.op_id, pc = slot.record.inst_addr, "IF  fetch");
                slot
            }
            None => PipelineSlot::bubble(),
        };
        pipe.latches.next_mut().row_mut(Stage::Fetch)[lane] = slot;
    }
}

/// Predicts a freshly fetched conditional branch and trains the predictor.
///
/// On a misprediction the slot is flagged and fetch blocks until that branch
/// retires. Under the perfect policy there is no predictor and nothing happens.
fn check_branch(pipe: &mut PipelineEngine, slot: &mut PipelineSlot) {
    let Some(predictor) = pipe.predictor.as_mut() else {
        return;
    };
    let pc = slot.record.inst_addr;
    let prediction = predictor.predict(pc);
    let resolution = BranchDirection::from(slot.record.br_dir);
    predictor.update(pc, prediction, resolution, &mut pipe.stats);

    if prediction != resolution {
        slot.mispredicted = true;
        pipe.fetch_cbr_stall = true;
        debug!(
            op_id = slot.op_id,
            pc,
            ?prediction,
            ?resolution,
            "branch mispredicted, blocking fetch"
        );
    }
}
