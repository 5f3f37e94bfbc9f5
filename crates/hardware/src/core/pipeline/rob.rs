//! Reorder Buffer (ROB) for in-order commit.
//!
//! The ROB is a fixed-capacity circular buffer of dataflow records. It provides:
//! 1. **Allocation:** `insert` writes at the tail and returns the slot index as the tag.
//! 2. **Completion:** `mark_exec` / `mark_ready` flag entries in any order.
//! 3. **Wakeup:** `wakeup` broadcasts a completed tag to waiting source operands.
//! 4. **In-order Commit:** `remove_head` frees entries strictly from the head.
//!
//! Entries are never handed out by reference; callers name them by [`RobTag`]
//! and read them back as copies.

use crate::trace::{InstructionRecord, OpType};

/// Stable handle to a ROB slot. The value is the slot index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RobTag(pub usize);

/// A source operand of a ROB entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct RobOperand {
    /// Architectural register id.
    pub reg: u8,
    /// Whether the operand value is available.
    pub ready: bool,
    /// Tag of the in-flight producer, if the value came from one.
    pub tag: Option<RobTag>,
}

impl RobOperand {
    /// An operand whose value is already available.
    pub const fn available(reg: u8) -> Self {
        Self {
            reg,
            ready: true,
            tag: None,
        }
    }

    /// An operand produced by the entry `tag`, ready or not.
    pub const fn produced_by(reg: u8, tag: RobTag, ready: bool) -> Self {
        Self {
            reg,
            ready,
            tag: Some(tag),
        }
    }
}

/// The dataflow view of an instruction held by the ROB.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct RobInstruction {
    /// Fetch-order identity of the instruction.
    pub op_id: u64,
    /// Instruction address.
    pub inst_addr: u64,
    /// Operation category.
    pub op_type: OpType,
    /// First source operand.
    pub src1: RobOperand,
    /// Second source operand.
    pub src2: RobOperand,
    /// Destination register, if one is written.
    pub dest_reg: Option<u8>,
    /// Commit tag assigned by [`ReorderBuffer::insert`].
    pub dest_tag: Option<RobTag>,
}

impl RobInstruction {
    /// Builds an untagged record for `record` with the given source operands.
    pub const fn new(
        op_id: u64,
        record: &InstructionRecord,
        src1: RobOperand,
        src2: RobOperand,
    ) -> Self {
        Self {
            op_id,
            inst_addr: record.inst_addr,
            op_type: record.op_type,
            src1,
            src2,
            dest_reg: if record.dest_needed {
                Some(record.dest_reg)
            } else {
                None
            },
            dest_tag: None,
        }
    }
}

/// A single entry in the Reorder Buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RobEntry {
    inst: RobInstruction,
    valid: bool,
    exec: bool,
    ready: bool,
}

impl RobEntry {
    /// An unoccupied slot.
    pub const fn vacant() -> Self {
        Self {
            inst: RobInstruction {
                op_id: 0,
                inst_addr: 0,
                op_type: OpType::Alu,
                src1: RobOperand::available(0),
                src2: RobOperand::available(0),
                dest_reg: None,
                dest_tag: None,
            },
            valid: false,
            exec: false,
            ready: false,
        }
    }

    /// A freshly allocated slot: valid, not executing, not ready.
    pub const fn occupied(inst: RobInstruction) -> Self {
        Self {
            inst,
            valid: true,
            exec: false,
            ready: false,
        }
    }

    /// The stored instruction.
    pub const fn inst(&self) -> &RobInstruction {
        &self.inst
    }

    /// Whether the slot is occupied.
    pub const fn is_valid(&self) -> bool {
        self.valid
    }

    /// Whether the instruction has started executing.
    pub const fn is_executing(&self) -> bool {
        self.exec
    }

    /// Whether the instruction's result is available.
    pub const fn is_ready(&self) -> bool {
        self.ready
    }
}

/// Reorder Buffer: circular buffer for in-order commit.
#[derive(Debug, Clone)]
pub struct ReorderBuffer {
    /// Fixed-size entry array.
    entries: Vec<RobEntry>,
    /// Index of the oldest entry (commit point).
    head: usize,
    /// Index where the next entry will be allocated.
    tail: usize,
    /// Number of valid entries.
    count: usize,
}

impl ReorderBuffer {
    /// Creates a ROB with `capacity` vacant slots.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: vec![RobEntry::vacant(); capacity],
            head: 0,
            tail: 0,
            count: 0,
        }
    }

    /// Returns the ROB capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Returns the number of occupied entries.
    #[inline]
    pub const fn len(&self) -> usize {
        self.count
    }

    /// Returns true if the ROB is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Tag of the oldest entry, if any.
    pub const fn head_tag(&self) -> Option<RobTag> {
        if self.count == 0 {
            None
        } else {
            Some(RobTag(self.head))
        }
    }

    /// Returns false exactly when the buffer is full.
    #[inline]
    pub fn check_space(&self) -> bool {
        self.count < self.entries.len()
    }

    /// Allocates the tail slot for `inst`.
    ///
    /// The stored copy gets its `dest_tag` set to the new tag.
    ///
    /// # Returns
    ///
    /// The commit tag, or `None` if the buffer is full. Callers are expected to
    /// consult [`ReorderBuffer::check_space`] first.
    pub fn insert(&mut self, inst: RobInstruction) -> Option<RobTag> {
        if !self.check_space() {
            return None;
        }
        let tag = RobTag(self.tail);
        self.entries[self.tail] = RobEntry::occupied(RobInstruction {
            dest_tag: Some(tag),
            ..inst
        });
        self.tail = (self.tail + 1) % self.entries.len();
        self.count += 1;
        Some(tag)
    }

    /// Flags the entry named by `inst.dest_tag` as executing.
    pub fn mark_exec(&mut self, inst: &RobInstruction) {
        if let Some(entry) = self.entry_for_mut(inst) {
            entry.exec = true;
        }
    }

    /// Flags the entry named by `inst.dest_tag` as ready.
    pub fn mark_ready(&mut self, inst: &RobInstruction) {
        if let Some(entry) = self.entry_for_mut(inst) {
            entry.ready = true;
        }
    }

    /// True iff the entry at `tag` is valid and ready.
    pub fn check_ready(&self, tag: RobTag) -> bool {
        self.entries
            .get(tag.0)
            .is_some_and(|entry| entry.valid && entry.ready)
    }

    /// True iff the head entry is valid and ready, i.e. can commit.
    pub fn check_head(&self) -> bool {
        self.check_ready(RobTag(self.head))
    }

    /// Marks every waiting source operand produced by `tag` as ready.
    pub fn wakeup(&mut self, tag: RobTag) {
        for entry in self.entries.iter_mut().filter(|entry| entry.valid) {
            for src in [&mut entry.inst.src1, &mut entry.inst.src2] {
                if src.tag == Some(tag) && !src.ready {
                    src.ready = true;
                }
            }
        }
    }

    /// Commits the head entry if it is ready.
    ///
    /// # Returns
    ///
    /// The instruction stored at the head when called, whether or not it was
    /// removed. Use [`ReorderBuffer::check_head`] beforehand to know which.
    pub fn remove_head(&mut self) -> RobInstruction {
        let Some(entry) = self.entries.get_mut(self.head) else {
            return RobEntry::vacant().inst;
        };
        let inst = entry.inst;
        if entry.valid && entry.ready {
            entry.valid = false;
            entry.exec = false;
            entry.ready = false;
            self.head = (self.head + 1) % self.entries.len();
            self.count -= 1;
        }
        inst
    }

    /// Copy of the entry at `tag`, or `None` if out of range.
    pub fn snapshot(&self, tag: RobTag) -> Option<RobEntry> {
        self.entries.get(tag.0).copied()
    }

    fn entry_for_mut(&mut self, inst: &RobInstruction) -> Option<&mut RobEntry> {
        let tag = inst.dest_tag?;
        self.entries.get_mut(tag.0).filter(|entry| entry.valid)
    }
}
