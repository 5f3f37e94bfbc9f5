//! GShare Branch Predictor.
//!
//! GShare correlates global branch history with the program counter using an XOR
//! hash. This allows the predictor to distinguish the same branch instruction
//! in different execution contexts.
//!
//! # Performance
//!
//! - **Time Complexity:** `predict()` and `train()` are O(1)
//! - **Space Complexity:** 2^12 one-byte counters (4 KiB)
//! - **Best Case:** Correlated branches where outcome depends on recent history
//! - **Worst Case:** Uncorrelated branches aliasing onto the same counters

use super::{BranchDirection, BranchPredictor};

/// Index width of the Pattern History Table.
pub const TABLE_BITS: u32 = 12;
/// Total number of entries in the PHT.
pub const TABLE_SIZE: usize = 1 << TABLE_BITS;
/// Mask selecting the low `TABLE_BITS` bits of the PC and of the history.
const INDEX_MASK: u64 = (TABLE_SIZE as u64) - 1;
/// Largest counter value ("strongly taken").
pub const COUNTER_MAX: u8 = 3;
/// Initial counter value ("weakly taken").
pub const COUNTER_INIT: u8 = 2;
/// Counters at or above this value predict taken.
const TAKEN_THRESHOLD: u8 = 2;

/// GShare Predictor structure.
#[derive(Debug, Clone)]
pub struct GSharePredictor {
    /// Global History Register; only resolved outcomes are shifted in.
    ghr: u64,
    /// Pattern History Table containing 2-bit saturating counters.
    pht: Vec<u8>,
    /// PHT index computed by the most recent `predict`.
    last_index: usize,
}

impl Default for GSharePredictor {
    fn default() -> Self {
        Self::new()
    }
}

impl GSharePredictor {
    /// Creates a predictor with every counter weakly taken and an empty history.
    pub fn new() -> Self {
        Self {
            ghr: 0,
            pht: vec![COUNTER_INIT; TABLE_SIZE],
            last_index: 0,
        }
    }

    /// Calculates the index into the Pattern History Table.
    ///
    /// XORs the low bits of the PC with the low bits of the history.
    #[inline]
    const fn index(&self, pc: u64) -> usize {
        ((pc & INDEX_MASK) ^ (self.ghr & INDEX_MASK)) as usize
    }

    /// Current global history register.
    pub const fn history(&self) -> u64 {
        self.ghr
    }

    /// Counter value at `index`, or `None` past the end of the table.
    pub fn counter(&self, index: usize) -> Option<u8> {
        self.pht.get(index).copied()
    }

    /// Read-only view of the whole table.
    pub fn counters(&self) -> &[u8] {
        &self.pht
    }
}

impl BranchPredictor for GSharePredictor {
    /// Predicts taken if the 2-bit counter at the hashed index is 2 or 3.
    fn predict(&mut self, pc: u64) -> BranchDirection {
        let idx = self.index(pc);
        self.last_index = idx;
        BranchDirection::from(self.pht[idx] >= TAKEN_THRESHOLD)
    }

    /// Saturates the counter used by the last prediction and shifts the
    /// outcome into the history.
    fn train(&mut self, _pc: u64, resolution: BranchDirection) {
        let counter = &mut self.pht[self.last_index];
        if resolution.is_taken() {
            if *counter < COUNTER_MAX {
                *counter += 1;
            }
        } else if *counter > 0 {
            *counter -= 1;
        }

        self.ghr = (self.ghr << 1) | resolution.bit();
    }
}
