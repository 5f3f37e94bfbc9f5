//! Trace Record Builder.
//!
//! Builds [`InstructionRecord`]s one field at a time so scenario tests read
//! like the instruction sequence they model.

use pipesim_core::trace::{InstructionRecord, OpType};

/// Fluent builder for a single trace record.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordBuilder {
    record: InstructionRecord,
}

impl RecordBuilder {
    /// Starts a record of the given category at `pc`.
    pub fn new(op_type: OpType, pc: u64) -> Self {
        Self {
            record: InstructionRecord {
                op_type,
                inst_addr: pc,
                ..InstructionRecord::default()
            },
        }
    }

    /// An ALU instruction with no operands.
    pub fn alu(pc: u64) -> Self {
        Self::new(OpType::Alu, pc)
    }

    /// A load of `addr` into `rd`.
    pub fn load(pc: u64, rd: u8, addr: u64) -> Self {
        Self::new(OpType::Load, pc).dest(rd).mem(addr)
    }

    /// A store to `addr`.
    pub fn store(pc: u64, addr: u64) -> Self {
        Self::new(OpType::Store, pc).mem(addr)
    }

    /// A conditional branch resolving in direction `taken`.
    pub fn branch(pc: u64, taken: bool) -> Self {
        let mut b = Self::new(OpType::CondBranch, pc).reads_cc();
        b.record.br_dir = taken;
        b
    }

    /// Writes register `rd`.
    pub fn dest(mut self, rd: u8) -> Self {
        self.record.dest_reg = rd;
        self.record.dest_needed = true;
        self
    }

    /// Reads register `rs` as first source.
    pub fn src1(mut self, rs: u8) -> Self {
        self.record.src1_reg = rs;
        self.record.src1_needed = true;
        self
    }

    /// Reads register `rs` as second source.
    pub fn src2(mut self, rs: u8) -> Self {
        self.record.src2_reg = rs;
        self.record.src2_needed = true;
        self
    }

    /// Reads the condition codes.
    pub fn reads_cc(mut self) -> Self {
        self.record.cc_read = true;
        self
    }

    /// Writes the condition codes.
    pub fn writes_cc(mut self) -> Self {
        self.record.cc_write = true;
        self
    }

    /// Accesses memory at `addr`.
    pub fn mem(mut self, addr: u64) -> Self {
        self.record.mem_access = true;
        self.record.mem_addr = addr;
        self
    }

    /// Finishes the record.
    pub fn build(self) -> InstructionRecord {
        self.record
    }
}

/// `n` independent ALU instructions at consecutive addresses from `base`.
pub fn independent(n: usize, base: u64) -> Vec<InstructionRecord> {
    (0..n as u64)
        .map(|i| RecordBuilder::alu(base + i * 4).build())
        .collect()
}
