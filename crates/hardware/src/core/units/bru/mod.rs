//! Branch prediction unit (BRU) implementations.
//!
//! This module contains the direction predictors consulted at fetch:
//! static always-taken / always-not-taken policies and the gshare adaptive
//! predictor. The perfect policy has no predictor object at all.

pub use self::branch_predictor::{BranchDirection, BranchPredictor};

/// Branch predictor trait and direction type.
pub mod branch_predictor;

/// Global history branch predictor (gshare algorithm).
pub mod gshare;

/// Static branch predictors (always taken, always not taken).
pub mod static_bp;

use self::{gshare::GSharePredictor, static_bp::StaticPredictor};
use crate::config::BranchPredictorPolicy;

/// Enum wrapper for static dispatch of branch predictors.
#[derive(Debug, Clone)]
pub enum BranchPredictorUnit {
    /// Fixed-direction policy.
    Static(StaticPredictor),
    /// Adaptive two-level policy.
    GShare(GSharePredictor),
}

impl BranchPredictorUnit {
    /// Builds the predictor for `policy`.
    ///
    /// Returns `None` for [`BranchPredictorPolicy::Perfect`]: under the perfect
    /// policy there is nothing to consult.
    pub fn from_policy(policy: BranchPredictorPolicy) -> Option<Self> {
        match policy {
            BranchPredictorPolicy::Perfect => None,
            BranchPredictorPolicy::AlwaysTaken => {
                Some(Self::Static(StaticPredictor::always_taken()))
            }
            BranchPredictorPolicy::AlwaysNotTaken => {
                Some(Self::Static(StaticPredictor::always_not_taken()))
            }
            BranchPredictorPolicy::Gshare => Some(Self::GShare(GSharePredictor::new())),
        }
    }
}

impl BranchPredictor for BranchPredictorUnit {
    #[inline(always)]
    fn predict(&mut self, pc: u64) -> BranchDirection {
        match self {
            Self::Static(bp) => bp.predict(pc),
            Self::GShare(bp) => bp.predict(pc),
        }
    }

    #[inline(always)]
    fn train(&mut self, pc: u64, resolution: BranchDirection) {
        match self {
            Self::Static(bp) => bp.train(pc, resolution),
            Self::GShare(bp) => bp.train(pc, resolution),
        }
    }
}
