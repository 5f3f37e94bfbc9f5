//! Writeback (WB) Stage.
//!
//! This module implements the final stage of the pipeline. It retires every
//! valid slot of the MemoryAccess latch, releases fetch when the blocking
//! mispredicted branch retires, completes the matching ROB entries and commits
//! them from the ROB head in order.

use tracing::trace;

use crate::core::pipeline::engine::PipelineEngine;
use crate::core::pipeline::latches::Stage;

/// Executes the writeback stage of the pipeline.
///
/// # Arguments
///
/// * `pipe` - Mutable reference to the pipeline engine
///
/// # Behavior
///
/// - Counts each valid retiring slot
/// - Clears the branch-fetch-stall flag when the mispredicted branch retires
/// - Marks the slot's ROB entry ready and wakes up its consumers
/// - Sets halt when the retiring `op_id` reaches the halt id
/// - Removes ready entries from the ROB head
pub fn writeback_stage(pipe: &mut PipelineEngine) {
    for slot in pipe.latches.current().row(Stage::MemoryAccess) {
        if !slot.valid {
            continue;
        }
        pipe.stats.instructions_retired += 1;
        pipe.last_retired = pipe.last_retired.max(slot.op_id);

        if slot.mispredicted {
            pipe.fetch_cbr_stall = false;
        }

        if let Some(inst) = &slot.dataflow {
            pipe.rob.mark_ready(inst);
            if let Some(tag) = inst.dest_tag {
                pipe.rob.wakeup(tag);
                if let Some(reg) = inst.dest_reg {
                    pipe.scoreboard.clear_if_match(reg, tag);
                }
            }
        }

        trace!(op_id = slot.op_id, pc = slot.record.inst_addr, "WB  retire");

        if pipe.halt_op_id.is_some_and(|halt| slot.op_id >= halt) {
            pipe.halted = true;
        }
    }

    while pipe.rob.check_head() {
        let inst = pipe.rob.remove_head();
        pipe.stats.rob_commits += 1;
        trace!(op_id = inst.op_id, "WB  commit");
    }
}
