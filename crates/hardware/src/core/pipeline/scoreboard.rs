//! Tag-based scoreboard for register dependency tracking.
//!
//! Maps each architectural register to the ROB tag of its latest in-flight
//! producer, or `None` if no in-flight instruction writes it. Decode reads it
//! to fill the source tags of new ROB entries.

use crate::core::pipeline::rob::RobTag;

/// Number of architectural register ids representable in a trace record.
const NUM_REGS: usize = 1 << u8::BITS;

/// Tag-based scoreboard: maps each register to the ROB tag of its latest
/// in-flight producer.
#[derive(Debug, Clone)]
pub struct Scoreboard {
    producers: [Option<RobTag>; NUM_REGS],
}

impl Default for Scoreboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Scoreboard {
    /// Create a new scoreboard with all registers clear (no pending writers).
    pub const fn new() -> Self {
        Self {
            producers: [None; NUM_REGS],
        }
    }

    /// Mark a register as having a pending writer with the given ROB tag.
    pub const fn set_producer(&mut self, reg: u8, tag: RobTag) {
        self.producers[reg as usize] = Some(tag);
    }

    /// Get the ROB tag of the latest pending writer for a register.
    pub const fn producer(&self, reg: u8) -> Option<RobTag> {
        self.producers[reg as usize]
    }

    /// Clear a register's pending writer, but only if the current tag matches,
    /// so a completing instruction never clears a newer writer's tag.
    pub fn clear_if_match(&mut self, reg: u8, tag: RobTag) {
        let slot = &mut self.producers[reg as usize];
        if *slot == Some(tag) {
            *slot = None;
        }
    }

    /// Number of registers with a pending writer.
    pub fn pending(&self) -> usize {
        self.producers.iter().filter(|p| p.is_some()).count()
    }
}
