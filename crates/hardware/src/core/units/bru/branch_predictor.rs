//! Branch Predictor Interface.
//!
//! This module defines the `BranchPredictor` trait shared by every direction
//! policy. Policies implement `predict` and `train`; the statistics bookkeeping
//! in `update` is common to all of them.

use crate::stats::SimStats;

/// Direction of a conditional branch, predicted or resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BranchDirection {
    /// Falls through.
    NotTaken,
    /// Jumps to its target.
    Taken,
}

impl BranchDirection {
    /// Returns true for [`BranchDirection::Taken`].
    #[inline]
    pub const fn is_taken(self) -> bool {
        matches!(self, Self::Taken)
    }

    /// Returns the direction as a history bit (1 = taken).
    #[inline]
    pub const fn bit(self) -> u64 {
        match self {
            Self::NotTaken => 0,
            Self::Taken => 1,
        }
    }
}

impl From<bool> for BranchDirection {
    fn from(taken: bool) -> Self {
        if taken { Self::Taken } else { Self::NotTaken }
    }
}

/// Trait for branch direction predictors.
///
/// A predictor instance supports one unresolved prediction at a time: `update`
/// (and so `train`) applies to the state captured by the most recent `predict`.
pub trait BranchPredictor {
    /// Predicts the direction of the conditional branch at `pc`.
    ///
    /// # Arguments
    ///
    /// * `pc` - Address of the branch instruction
    fn predict(&mut self, pc: u64) -> BranchDirection;

    /// Trains the policy with the resolved direction of the last predicted branch.
    ///
    /// # Arguments
    ///
    /// * `pc` - Address of the branch instruction
    /// * `resolution` - The direction the branch actually took
    fn train(&mut self, pc: u64, resolution: BranchDirection);

    /// Records the outcome of the last prediction and trains the policy.
    ///
    /// Counts one branch in `stats`, and one misprediction iff
    /// `prediction != resolution`, then calls [`BranchPredictor::train`].
    ///
    /// # Arguments
    ///
    /// * `pc` - Address of the branch instruction
    /// * `prediction` - The value returned by the matching `predict` call
    /// * `resolution` - The direction the branch actually took
    /// * `stats` - Session statistics; only the branch counters are written
    fn update(
        &mut self,
        pc: u64,
        prediction: BranchDirection,
        resolution: BranchDirection,
        stats: &mut SimStats,
    ) {
        stats.record_branch(prediction != resolution);
        self.train(pc, resolution);
    }
}
