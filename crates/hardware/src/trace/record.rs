//! Instruction record and its binary encoding.
//!
//! A record carries only what the timing model needs: operand register ids
//! with "needed" flags, condition-code read/write flags, the memory-access
//! flag and the resolved branch direction. No values are computed.
//!
//! # Layout
//!
//! | Offset | Size | Field          |
//! |--------|------|----------------|
//! | 0      | 8    | `inst_addr`    |
//! | 8      | 8    | `mem_addr`     |
//! | 16     | 1    | `op_type`      |
//! | 17     | 1    | `dest_reg`     |
//! | 18     | 1    | `dest_needed`  |
//! | 19     | 1    | `src1_reg`     |
//! | 20     | 1    | `src1_needed`  |
//! | 21     | 1    | `src2_reg`     |
//! | 22     | 1    | `src2_needed`  |
//! | 23     | 1    | `cc_read`      |
//! | 24     | 1    | `cc_write`     |
//! | 25     | 1    | `mem_access`   |
//! | 26     | 1    | `br_dir`       |
//! | 27     | 5    | reserved (0)   |
//!
//! Integers are little-endian; any nonzero flag byte reads as `true`.

use std::fmt;

use crate::common::error::TraceError;

/// Size in bytes of one encoded record.
pub const RECORD_SIZE: usize = 32;

/// Operation category of a traced instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum OpType {
    /// Integer or logical operation.
    #[default]
    Alu,
    /// Memory load.
    Load,
    /// Memory store.
    Store,
    /// Conditional branch.
    CondBranch,
    /// Anything else (jumps, system, no-ops).
    Other,
}

impl OpType {
    /// Number of operation categories.
    pub const COUNT: usize = 5;

    /// All categories in encoding order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Alu,
        Self::Load,
        Self::Store,
        Self::CondBranch,
        Self::Other,
    ];

    /// Returns the on-disk encoding.
    pub const fn as_raw(self) -> u8 {
        match self {
            Self::Alu => 0,
            Self::Load => 1,
            Self::Store => 2,
            Self::CondBranch => 3,
            Self::Other => 4,
        }
    }

    /// Decodes an op-type byte, or `None` for values outside `0..5`.
    pub const fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Alu),
            1 => Some(Self::Load),
            2 => Some(Self::Store),
            3 => Some(Self::CondBranch),
            4 => Some(Self::Other),
            _ => None,
        }
    }

    /// Dense index in `0..OpType::COUNT`, for per-category counter arrays.
    pub const fn index(self) -> usize {
        self.as_raw() as usize
    }

    /// Short mnemonic used in reports and pipeline dumps.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Alu => "ALU",
            Self::Load => "LD",
            Self::Store => "ST",
            Self::CondBranch => "CBR",
            Self::Other => "OTHER",
        }
    }
}

impl TryFrom<u8> for OpType {
    type Error = TraceError;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        Self::from_raw(raw).ok_or(TraceError::InvalidOpType(raw))
    }
}

impl fmt::Display for OpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// One dynamic instruction as read from a trace.
///
/// Records are immutable once read; the pipeline copies them into latch slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct InstructionRecord {
    /// Instruction address.
    pub inst_addr: u64,
    /// Operation category.
    pub op_type: OpType,
    /// Destination register id.
    pub dest_reg: u8,
    /// Whether the destination register is written.
    pub dest_needed: bool,
    /// First source register id.
    pub src1_reg: u8,
    /// Whether the first source register is read.
    pub src1_needed: bool,
    /// Second source register id.
    pub src2_reg: u8,
    /// Whether the second source register is read.
    pub src2_needed: bool,
    /// Reads the condition codes.
    pub cc_read: bool,
    /// Writes the condition codes.
    pub cc_write: bool,
    /// Performs a data memory access.
    pub mem_access: bool,
    /// Data address, meaningful only when `mem_access` is set.
    pub mem_addr: u64,
    /// Resolved branch direction (taken), meaningful only for conditional branches.
    pub br_dir: bool,
}

impl InstructionRecord {
    /// Returns true for loads.
    #[inline]
    pub const fn is_load(&self) -> bool {
        matches!(self.op_type, OpType::Load)
    }

    /// Returns true for conditional branches.
    #[inline]
    pub const fn is_cond_branch(&self) -> bool {
        matches!(self.op_type, OpType::CondBranch)
    }

    /// Encodes the record into its fixed on-disk layout.
    pub fn encode(&self) -> [u8; RECORD_SIZE] {
        let mut buf = [0u8; RECORD_SIZE];
        buf[0..8].copy_from_slice(&self.inst_addr.to_le_bytes());
        buf[8..16].copy_from_slice(&self.mem_addr.to_le_bytes());
        buf[16] = self.op_type.as_raw();
        buf[17] = self.dest_reg;
        buf[18] = u8::from(self.dest_needed);
        buf[19] = self.src1_reg;
        buf[20] = u8::from(self.src1_needed);
        buf[21] = self.src2_reg;
        buf[22] = u8::from(self.src2_needed);
        buf[23] = u8::from(self.cc_read);
        buf[24] = u8::from(self.cc_write);
        buf[25] = u8::from(self.mem_access);
        buf[26] = u8::from(self.br_dir);
        buf
    }

    /// Decodes one record from its fixed on-disk layout.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::InvalidOpType`] if the op-type byte is not in `0..5`.
    pub fn decode(buf: &[u8; RECORD_SIZE]) -> Result<Self, TraceError> {
        let word = |at: usize| {
            let mut bytes = [0u8; 8];
            bytes.copy_from_slice(&buf[at..at + 8]);
            u64::from_le_bytes(bytes)
        };
        Ok(Self {
            inst_addr: word(0),
            mem_addr: word(8),
            op_type: OpType::try_from(buf[16])?,
            dest_reg: buf[17],
            dest_needed: buf[18] != 0,
            src1_reg: buf[19],
            src1_needed: buf[20] != 0,
            src2_reg: buf[21],
            src2_needed: buf[22] != 0,
            cc_read: buf[23] != 0,
            cc_write: buf[24] != 0,
            mem_access: buf[25] != 0,
            br_dir: buf[26] != 0,
        })
    }
}
