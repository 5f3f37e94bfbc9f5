//! Simulation statistics collection and reporting.
//!
//! This module tracks the performance metrics of one simulation session. It provides:
//! 1. **Cycle and IPC:** Total cycles, retired instructions and ROB commits.
//! 2. **Instruction mix:** Dynamic counts per operation category, counted at fetch.
//! 3. **Branch prediction:** Predicted branches and mispredictions.
//! 4. **Stalls:** Data, structural (ROB full) and control (fetch blocked) lane-cycles.
//! 5. **Memory hook:** Data-cache outcomes reported by an attached memory hierarchy.
//!
//! Each counter has exactly one writer and only ever increases.

use std::fmt::{self, Write as _};
use std::time::Instant;

use crate::trace::OpType;

/// Statistics for one simulation session.
#[derive(Clone, Debug)]
pub struct SimStats {
    start_time: Instant,
    /// Total simulated cycles.
    pub cycles: u64,
    /// Instructions that left the WriteBack stage.
    pub instructions_retired: u64,
    /// Entries removed from the head of the reorder buffer.
    pub rob_commits: u64,

    /// Fetched ALU instructions.
    pub inst_alu: u64,
    /// Fetched loads.
    pub inst_load: u64,
    /// Fetched stores.
    pub inst_store: u64,
    /// Fetched conditional branches.
    pub inst_branch: u64,
    /// Fetched instructions of any other category.
    pub inst_other: u64,

    /// Conditional branches passed to the predictor's `update`.
    pub branches: u64,
    /// Branches whose prediction differed from the resolved direction.
    pub mispredicts: u64,

    /// Lane-cycles a valid instruction spent stalled in Decode on a data dependency.
    pub stalls_data: u64,
    /// Lane-cycles a valid instruction spent stalled in Decode waiting for ROB space.
    pub stalls_structural: u64,
    /// Lane-cycles Fetch was blocked behind a mispredicted branch.
    pub stalls_control: u64,

    /// Data-cache hits reported by the memory hierarchy.
    pub dcache_hits: u64,
    /// Data-cache misses reported by the memory hierarchy.
    pub dcache_misses: u64,
    /// Installs that evicted a dirty line.
    pub dirty_evictions: u64,
    /// DRAM delay reported for misses; observed only, not applied to timing.
    pub mem_delay_cycles: u64,
}

impl Default for SimStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            cycles: 0,
            instructions_retired: 0,
            rob_commits: 0,
            inst_alu: 0,
            inst_load: 0,
            inst_store: 0,
            inst_branch: 0,
            inst_other: 0,
            branches: 0,
            mispredicts: 0,
            stalls_data: 0,
            stalls_structural: 0,
            stalls_control: 0,
            dcache_hits: 0,
            dcache_misses: 0,
            dirty_evictions: 0,
            mem_delay_cycles: 0,
        }
    }
}

/// Section names for selective stats output.
///
/// Pass an empty slice to [`SimStats::render_sections`] to include all of them.
pub const STATS_SECTIONS: &[&str] = &["summary", "instruction_mix", "branch", "stalls", "memory"];

impl SimStats {
    /// Counts one fetched instruction in its category.
    pub const fn record_fetch(&mut self, op: OpType) {
        match op {
            OpType::Alu => self.inst_alu += 1,
            OpType::Load => self.inst_load += 1,
            OpType::Store => self.inst_store += 1,
            OpType::CondBranch => self.inst_branch += 1,
            OpType::Other => self.inst_other += 1,
        }
    }

    /// Counts one predicted branch, and a misprediction if `mispredicted`.
    pub const fn record_branch(&mut self, mispredicted: bool) {
        self.branches += 1;
        if mispredicted {
            self.mispredicts += 1;
        }
    }

    /// Dynamic count for one category.
    pub const fn op_count(&self, op: OpType) -> u64 {
        match op {
            OpType::Alu => self.inst_alu,
            OpType::Load => self.inst_load,
            OpType::Store => self.inst_store,
            OpType::CondBranch => self.inst_branch,
            OpType::Other => self.inst_other,
        }
    }

    /// Sum of all per-category counts.
    pub const fn instructions_fetched(&self) -> u64 {
        self.inst_alu + self.inst_load + self.inst_store + self.inst_branch + self.inst_other
    }

    /// Retired instructions per cycle, or 0 before the first cycle.
    pub fn ipc(&self) -> f64 {
        if self.cycles == 0 {
            0.0
        } else {
            self.instructions_retired as f64 / self.cycles as f64
        }
    }

    /// Cycles per retired instruction, or 0 before the first retirement.
    pub fn cpi(&self) -> f64 {
        if self.instructions_retired == 0 {
            0.0
        } else {
            self.cycles as f64 / self.instructions_retired as f64
        }
    }

    /// Mispredictions per predicted branch, or 0 if no branch was predicted.
    pub fn mispredict_rate(&self) -> f64 {
        if self.branches == 0 {
            0.0
        } else {
            self.mispredicts as f64 / self.branches as f64
        }
    }

    /// Renders the requested sections as text.
    ///
    /// # Arguments
    ///
    /// * `sections` - Names from [`STATS_SECTIONS`], or empty for all.
    pub fn render_sections(&self, sections: &[String]) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_sections(&mut out, sections);
        out
    }

    /// Prints the requested sections to stdout.
    pub fn print_sections(&self, sections: &[String]) {
        print!("{}", self.render_sections(sections));
    }

    fn write_sections(&self, out: &mut String, sections: &[String]) -> fmt::Result {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);
        let seconds = self.start_time.elapsed().as_secs_f64();
        let cyc = self.cycles.max(1) as f64;
        let fetched = self.instructions_fetched().max(1) as f64;
        let pct = |n: u64, of: f64| (n as f64 / of) * 100.0;

        if want("summary") {
            writeln!(out, "==========================================================")?;
            writeln!(out, "PIPELINE SIMULATION STATISTICS")?;
            writeln!(out, "==========================================================")?;
            writeln!(out, "host_seconds             {seconds:.4} s")?;
            writeln!(out, "sim_cycles               {}", self.cycles)?;
            writeln!(out, "sim_insts                {}", self.instructions_retired)?;
            writeln!(out, "sim_rob_commits          {}", self.rob_commits)?;
            writeln!(out, "sim_ipc                  {:.4}", self.ipc())?;
            writeln!(out, "sim_cpi                  {:.4}", self.cpi())?;
            writeln!(out, "----------------------------------------------------------")?;
        }
        if want("instruction_mix") {
            writeln!(out, "INSTRUCTION MIX")?;
            for op in OpType::ALL {
                let n = self.op_count(op);
                let label = format!("op.{}", op.mnemonic().to_ascii_lowercase());
                writeln!(out, "  {label:<22} {n} ({:.2}%)", pct(n, fetched))?;
            }
            writeln!(out, "----------------------------------------------------------")?;
        }
        if want("branch") {
            writeln!(out, "BRANCH PREDICTION")?;
            writeln!(out, "  bp.lookups             {}", self.branches)?;
            writeln!(out, "  bp.mispredicts         {}", self.mispredicts)?;
            writeln!(
                out,
                "  bp.mispredict_rate     {:.2}%",
                self.mispredict_rate() * 100.0
            )?;
            writeln!(out, "----------------------------------------------------------")?;
        }
        if want("stalls") {
            writeln!(out, "STALLS (lane-cycles)")?;
            writeln!(
                out,
                "  stalls.data            {} ({:.2}%)",
                self.stalls_data,
                pct(self.stalls_data, cyc)
            )?;
            writeln!(
                out,
                "  stalls.structural      {} ({:.2}%)",
                self.stalls_structural,
                pct(self.stalls_structural, cyc)
            )?;
            writeln!(
                out,
                "  stalls.control         {} ({:.2}%)",
                self.stalls_control,
                pct(self.stalls_control, cyc)
            )?;
            writeln!(out, "----------------------------------------------------------")?;
        }
        if want("memory") && self.dcache_hits + self.dcache_misses > 0 {
            let total = self.dcache_hits + self.dcache_misses;
            writeln!(out, "MEMORY HIERARCHY")?;
            writeln!(
                out,
                "  dcache.accesses        {total} (miss rate {:.2}%)",
                pct(self.dcache_misses, total as f64)
            )?;
            writeln!(out, "  dcache.dirty_evictions {}", self.dirty_evictions)?;
            writeln!(out, "  dram.delay_cycles      {}", self.mem_delay_cycles)?;
            writeln!(out, "----------------------------------------------------------")?;
        }
        Ok(())
    }
}
