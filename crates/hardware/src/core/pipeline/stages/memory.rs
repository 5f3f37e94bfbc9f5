//! Memory Access (MA) Stage.
//!
//! Copies the Execute latch forward. When a memory hierarchy is attached,
//! every memory operation entering the stage is reported to it and the
//! outcome is counted; retirement timing is not affected.

use crate::core::pipeline::engine::PipelineEngine;
use crate::core::pipeline::latches::Stage;
use crate::core::units::memory::{CacheOutcome, line_addr};
use crate::trace::OpType;

/// Core id used for hierarchy requests; the pipeline models a single core.
const CORE_ID: usize = 0;

/// Executes the memory access stage of the pipeline.
///
/// # Arguments
///
/// * `pipe` - Mutable reference to the pipeline engine
pub fn memory_stage(pipe: &mut PipelineEngine) {
    let (current, next) = pipe.latches.split();
    next.row_mut(Stage::MemoryAccess)
        .copy_from_slice(current.row(Stage::Execute));

    let Some(memory) = pipe.memory.as_mut() else {
        return;
    };
    let accesses = next
        .row(Stage::MemoryAccess)
        .iter()
        .filter(|slot| slot.valid && slot.record.mem_access);

    for slot in accesses {
        let line = line_addr(slot.record.mem_addr);
        let is_write = slot.record.op_type == OpType::Store;
        match memory.access(line, is_write, CORE_ID) {
            CacheOutcome::Hit => pipe.stats.dcache_hits += 1,
            CacheOutcome::Miss => {
                pipe.stats.dcache_misses += 1;
                if let Some(dram) = pipe.dram.as_mut() {
                    pipe.stats.mem_delay_cycles += dram.access(line, is_write);
                }
                if memory.install(line, is_write, CORE_ID) {
                    pipe.stats.dirty_evictions += 1;
                }
            }
        }
    }
}
