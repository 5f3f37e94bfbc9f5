//! Pipeline latch structures for inter-stage communication.
//!
//! This module defines the per-lane slots carried between the stages
//! Fetch → Decode → Execute → MemoryAccess → WriteBack.
//!
//! 1. **Slots:** `PipelineSlot` wraps a copy of one instruction record with its pipeline state.
//! 2. **Grid:** `Latches` is the [stage][lane] array of slots for one cycle.
//! 3. **Double Buffering:** `LatchFile` keeps the state read during a cycle separate
//!    from the state written for the next one, and swaps them at the cycle boundary.
//!
//! The MemoryAccess row is what WriteBack sees: WriteBack retires it and has no
//! latch of its own.

use std::fmt;

use crate::core::pipeline::rob::RobInstruction;
use crate::trace::InstructionRecord;

/// A pipeline stage that owns a latch row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
    /// Fetch (IF) latch.
    Fetch,
    /// Decode (ID) latch.
    Decode,
    /// Execute (EX) latch.
    Execute,
    /// MemoryAccess (MA) latch, read by WriteBack.
    MemoryAccess,
}

impl Stage {
    /// Number of latched stages.
    pub const COUNT: usize = 4;

    /// All latched stages in pipeline order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Fetch,
        Self::Decode,
        Self::Execute,
        Self::MemoryAccess,
    ];

    /// Row index of the stage in a [`Latches`] grid.
    pub const fn index(self) -> usize {
        match self {
            Self::Fetch => 0,
            Self::Decode => 1,
            Self::Execute => 2,
            Self::MemoryAccess => 3,
        }
    }

    /// Two-letter stage label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Fetch => "IF",
            Self::Decode => "ID",
            Self::Execute => "EX",
            Self::MemoryAccess => "MA",
        }
    }
}

/// One lane of one latch.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct PipelineSlot {
    /// Copy of the instruction record.
    pub record: InstructionRecord,
    /// Fetch-order identity (1-based, strictly increasing).
    pub op_id: u64,
    /// Whether the slot holds an instruction that proceeds.
    pub valid: bool,
    /// Whether the instruction is held in place this cycle.
    pub stall: bool,
    /// Whether this is the mispredicted branch that blocks fetch.
    pub mispredicted: bool,
    /// ROB dataflow record, present once the instruction has left Decode.
    pub dataflow: Option<RobInstruction>,
}

impl PipelineSlot {
    /// An empty slot.
    pub fn bubble() -> Self {
        Self::default()
    }

    /// A freshly fetched instruction.
    pub fn fetched(record: InstructionRecord, op_id: u64) -> Self {
        Self {
            record,
            op_id,
            valid: true,
            ..Self::default()
        }
    }

    /// A copy that does not proceed (the bubble left behind a stalled slot).
    pub const fn squashed(self) -> Self {
        Self {
            valid: false,
            ..self
        }
    }
}

impl fmt::Display for PipelineSlot {
    /// Renders `#op_id` with flags: `S` stalled, `M` mispredicted; `----` if empty.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.valid {
            return write!(f, "{:<12}", "----");
        }
        let flags = match (self.stall, self.mispredicted) {
            (true, true) => "SM",
            (true, false) => "S",
            (false, true) => "M",
            (false, false) => "",
        };
        let text = format!("#{}{} {}", self.op_id, flags, self.record.op_type);
        write!(f, "{text:<12}")
    }
}

/// The [stage][lane] grid of slots for one cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Latches {
    width: usize,
    slots: Vec<PipelineSlot>,
}

impl Latches {
    /// Creates a grid of bubbles with `width` lanes per stage.
    pub fn new(width: usize) -> Self {
        Self {
            width,
            slots: vec![PipelineSlot::bubble(); width * Stage::COUNT],
        }
    }

    /// Number of lanes per stage.
    pub const fn width(&self) -> usize {
        self.width
    }

    /// The slots of one stage, indexed by lane.
    pub fn row(&self, stage: Stage) -> &[PipelineSlot] {
        let start = stage.index() * self.width;
        &self.slots[start..start + self.width]
    }

    /// Mutable slots of one stage, indexed by lane.
    pub fn row_mut(&mut self, stage: Stage) -> &mut [PipelineSlot] {
        let start = stage.index() * self.width;
        &mut self.slots[start..start + self.width]
    }

    /// The slot at [stage][lane], or `None` for an out-of-range lane.
    pub fn get(&self, stage: Stage, lane: usize) -> Option<&PipelineSlot> {
        self.row(stage).get(lane)
    }

    /// Iterates over valid slots of the given stages with their stage.
    pub fn valid_in<'a>(
        &'a self,
        stages: &'a [Stage],
    ) -> impl Iterator<Item = (Stage, &'a PipelineSlot)> + 'a {
        stages.iter().flat_map(move |&stage| {
            self.row(stage)
                .iter()
                .filter(|slot| slot.valid)
                .map(move |slot| (stage, slot))
        })
    }

    /// Number of valid slots across all stages.
    pub fn occupancy(&self) -> usize {
        self.slots.iter().filter(|slot| slot.valid).count()
    }
}

impl fmt::Display for Latches {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "    ")?;
        for lane in 0..self.width {
            write!(f, "{:<12}", format!("lane{lane}"))?;
        }
        writeln!(f)?;
        for stage in Stage::ALL {
            write!(f, "{}  ", stage.label())?;
            for slot in self.row(stage) {
                write!(f, "{slot}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Double-buffered latches.
///
/// During a cycle every stage reads `current` and writes `next`. A stage may
/// also read rows of `next` already produced this cycle by a later stage; that
/// is how a stall raised in Decode reaches Fetch within the same cycle.
#[derive(Clone, Debug)]
pub struct LatchFile {
    current: Latches,
    next: Latches,
}

impl LatchFile {
    /// Creates empty latches with `width` lanes.
    pub fn new(width: usize) -> Self {
        Self {
            current: Latches::new(width),
            next: Latches::new(width),
        }
    }

    /// State at the start of the cycle (after the last swap).
    pub const fn current(&self) -> &Latches {
        &self.current
    }

    /// State being built for the next cycle.
    pub const fn next(&self) -> &Latches {
        &self.next
    }

    /// Writable view of the state being built for the next cycle.
    pub const fn next_mut(&mut self) -> &mut Latches {
        &mut self.next
    }

    /// Both buffers: `current` read-only, `next` writable.
    pub fn split(&mut self) -> (&Latches, &mut Latches) {
        (&self.current, &mut self.next)
    }

    /// Seeds the write buffer with the current state.
    ///
    /// Rows a stage does not overwrite (a stalled Fetch lane) carry over.
    pub fn begin_cycle(&mut self) {
        self.next.clone_from(&self.current);
    }

    /// Publishes the write buffer as the new current state.
    pub fn commit(&mut self) {
        std::mem::swap(&mut self.current, &mut self.next);
    }
}
