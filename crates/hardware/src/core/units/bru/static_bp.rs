//! Static Branch Predictors.
//!
//! Implements the fixed-direction policies: every conditional branch is
//! predicted taken, or every one is predicted not taken. Training is a no-op.

use super::{BranchDirection, BranchPredictor};

/// Static Branch Predictor structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticPredictor {
    /// The direction returned for every branch.
    direction: BranchDirection,
}

impl StaticPredictor {
    /// Creates a predictor that always predicts `direction`.
    pub const fn new(direction: BranchDirection) -> Self {
        Self { direction }
    }

    /// Creates an always-taken predictor.
    pub const fn always_taken() -> Self {
        Self::new(BranchDirection::Taken)
    }

    /// Creates an always-not-taken predictor.
    pub const fn always_not_taken() -> Self {
        Self::new(BranchDirection::NotTaken)
    }
}

impl BranchPredictor for StaticPredictor {
    fn predict(&mut self, _pc: u64) -> BranchDirection {
        self.direction
    }

    fn train(&mut self, _pc: u64, _resolution: BranchDirection) {}
}
