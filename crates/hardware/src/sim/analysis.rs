//! Trace Characterization.
//!
//! Walks a trace once and reports its dynamic instruction mix, its static
//! instruction footprint and the CPI of a fixed-cost timing model. No pipeline
//! is simulated.

use std::collections::HashSet;
use std::fmt;

use crate::common::TraceError;
use crate::trace::{InstructionRecord, OpType, TraceSource};

/// Bytes per instruction when computing the footprint.
const INSTRUCTION_BYTES: u64 = 4;

/// Cycles charged per instruction by the fixed-cost CPI model.
pub const fn op_cost(op: OpType) -> u64 {
    match op {
        OpType::Alu | OpType::Other => 1,
        OpType::Load | OpType::Store => 2,
        OpType::CondBranch => 3,
    }
}

/// Accumulated characterization of a trace.
#[derive(Debug, Clone, Default)]
pub struct TraceAnalyzer {
    counts: [u64; OpType::COUNT],
    addresses: HashSet<u64>,
}

impl TraceAnalyzer {
    /// Creates an empty analyzer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one record.
    pub fn observe(&mut self, record: &InstructionRecord) {
        self.counts[record.op_type.index()] += 1;
        let _ = self.addresses.insert(record.inst_addr);
    }

    /// Adds every record of `source` until its end.
    ///
    /// # Errors
    ///
    /// Returns the first error reported by `source`; records read before it
    /// remain counted.
    pub fn consume<S: TraceSource + ?Sized>(&mut self, source: &mut S) -> Result<(), TraceError> {
        while let Some(record) = source.next_record()? {
            self.observe(&record);
        }
        Ok(())
    }

    /// Dynamic count of `op`.
    pub const fn count(&self, op: OpType) -> u64 {
        self.counts[op.index()]
    }

    /// Total dynamic instruction count.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Number of distinct instruction addresses.
    pub fn unique_pcs(&self) -> usize {
        self.addresses.len()
    }

    /// Static footprint in bytes.
    pub fn footprint_bytes(&self) -> u64 {
        self.unique_pcs() as u64 * INSTRUCTION_BYTES
    }

    /// CPI of the fixed-cost model, or 0 for an empty trace.
    pub fn cpi(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let cost: u64 = OpType::ALL
            .iter()
            .map(|&op| self.count(op) * op_cost(op))
            .sum();
        cost as f64 / total as f64
    }
}

impl fmt::Display for TraceAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.total();
        writeln!(f, "{:<24} {total}", "trace.instructions")?;
        for op in OpType::ALL {
            let count = self.count(op);
            let pct = if total == 0 {
                0.0
            } else {
                count as f64 * 100.0 / total as f64
            };
            writeln!(
                f,
                "{:<24} {count:<12} # {pct:.2}%",
                format!("trace.op.{}", op.mnemonic().to_lowercase())
            )?;
        }
        writeln!(f, "{:<24} {}", "trace.unique_pcs", self.unique_pcs())?;
        writeln!(f, "{:<24} {}", "trace.footprint_bytes", self.footprint_bytes())?;
        writeln!(f, "{:<24} {:.4}", "trace.model_cpi", self.cpi())
    }
}
