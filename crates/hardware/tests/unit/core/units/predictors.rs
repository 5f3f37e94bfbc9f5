//! Branch Predictor Direction Tests.
//!
//! Verifies the prediction and training semantics of the static and gshare
//! policies, and the shared `update` bookkeeping of the `BranchPredictor` trait.

use proptest::prelude::*;
use rstest::rstest;

use pipesim_core::config::BranchPredictorPolicy;
use pipesim_core::core::units::bru::gshare::{COUNTER_MAX, GSharePredictor, TABLE_SIZE};
use pipesim_core::core::units::bru::static_bp::StaticPredictor;
use pipesim_core::core::units::bru::{BranchDirection, BranchPredictor, BranchPredictorUnit};
use pipesim_core::stats::SimStats;

use pipesim_core::core::units::bru::BranchDirection::{NotTaken, Taken};

// ══════════════════════════════════════════════════════════
// 1. Shared update bookkeeping
// ══════════════════════════════════════════════════════════

#[rstest]
#[case(Taken, Taken, 0)]
#[case(Taken, NotTaken, 1)]
#[case(NotTaken, Taken, 1)]
#[case(NotTaken, NotTaken, 0)]
fn update_counts_branch_and_mispredict(
    #[case] prediction: BranchDirection,
    #[case] resolution: BranchDirection,
    #[case] mispredicts: u64,
) {
    let mut bp = StaticPredictor::always_taken();
    let mut stats = SimStats::default();
    bp.update(0x40, prediction, resolution, &mut stats);
    assert_eq!(stats.branches, 1);
    assert_eq!(stats.mispredicts, mispredicts);
}

// ══════════════════════════════════════════════════════════
// 2. Static policies
// ══════════════════════════════════════════════════════════

#[test]
fn static_policies_ignore_history() {
    let mut taken = StaticPredictor::always_taken();
    let mut not_taken = StaticPredictor::always_not_taken();
    let mut stats = SimStats::default();
    for pc in (0..64u64).map(|i| i * 4) {
        assert_eq!(taken.predict(pc), Taken);
        assert_eq!(not_taken.predict(pc), NotTaken);
        taken.update(pc, Taken, NotTaken, &mut stats);
    }
    assert_eq!(taken.predict(0), Taken);
    assert_eq!(stats.mispredicts, 64);
}

#[rstest]
#[case(BranchPredictorPolicy::Perfect, None)]
#[case(BranchPredictorPolicy::AlwaysTaken, Some(Taken))]
#[case(BranchPredictorPolicy::AlwaysNotTaken, Some(NotTaken))]
#[case(BranchPredictorPolicy::Gshare, Some(Taken))]
fn unit_from_policy(#[case] policy: BranchPredictorPolicy, #[case] first: Option<BranchDirection>) {
    let unit = BranchPredictorUnit::from_policy(policy);
    assert_eq!(unit.map(|mut bp| bp.predict(0x1234)), first);
}

// ══════════════════════════════════════════════════════════
// 3. GShare
// ══════════════════════════════════════════════════════════

#[test]
fn gshare_saturates_at_strongly_taken() {
    let mut bp = GSharePredictor::new();
    let mut stats = SimStats::default();
    // With an all-ones history the index stays fixed once twelve taken
    // outcomes have been shifted in.
    for _ in 0..40 {
        let p = bp.predict(0);
        bp.update(0, p, Taken, &mut stats);
    }
    assert_eq!(bp.counter(TABLE_SIZE - 1), Some(COUNTER_MAX));
    assert_eq!(bp.predict(0), Taken);
    assert_eq!(stats.mispredicts, 0);
}

#[test]
fn gshare_history_shifts_in_outcomes() {
    let mut bp = GSharePredictor::new();
    let mut stats = SimStats::default();
    for dir in [Taken, NotTaken, Taken, Taken] {
        let p = bp.predict(0x80);
        bp.update(0x80, p, dir, &mut stats);
    }
    assert_eq!(bp.history() & 0xf, 0b1011);
}

#[test]
fn gshare_alternating_reference() {
    let mut bp = GSharePredictor::new();
    let mut stats = SimStats::default();
    for i in 0..100 {
        let outcome = BranchDirection::from(i % 2 == 0);
        let p = bp.predict(0x1000);
        bp.update(0x1000, p, outcome, &mut stats);
    }
    assert_eq!(stats.branches, 100);
    assert_eq!(stats.mispredicts, 6);
}

proptest! {
    /// Counters stay 2-bit no matter the branch stream.
    #[test]
    fn gshare_counters_stay_in_range(
        stream in proptest::collection::vec((any::<u64>(), any::<bool>()), 0..500)
    ) {
        let mut bp = GSharePredictor::new();
        let mut stats = SimStats::default();
        for (pc, taken) in stream {
            let p = bp.predict(pc);
            bp.update(pc, p, BranchDirection::from(taken), &mut stats);
        }
        prop_assert!(bp.counters().iter().all(|&c| c <= COUNTER_MAX));
        prop_assert_eq!(bp.counters().len(), TABLE_SIZE);
        prop_assert!(stats.mispredicts <= stats.branches);
    }
}
