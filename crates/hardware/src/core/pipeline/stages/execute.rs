//! Execute (EX) Stage.
//!
//! No values are computed. The stage copies the Decode latch forward, turning
//! stalled slots into bubbles, and flags the ROB entries of instructions that
//! begin executing.

use crate::core::pipeline::engine::PipelineEngine;
use crate::core::pipeline::latches::Stage;

/// Executes the execute stage of the pipeline.
///
/// # Arguments
///
/// * `pipe` - Mutable reference to the pipeline engine
pub fn execute_stage(pipe: &mut PipelineEngine) {
    let (current, next) = pipe.latches.split();
    let lanes = next
        .row_mut(Stage::Execute)
        .iter_mut()
        .zip(current.row(Stage::Decode));

    for (dst, src) in lanes {
        *dst = if src.stall { src.squashed() } else { *src };
        if !dst.valid {
            continue;
        }
        if let Some(inst) = &dst.dataflow {
            pipe.rob.mark_exec(inst);
        }
    }
}
