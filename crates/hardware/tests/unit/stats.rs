//! Statistics Tests.
//!
//! Verifies derived metrics and the sectioned report.

use pretty_assertions::assert_eq;

use crate::common::builder::RecordBuilder;
use crate::common::harness::TestContext;
use pipesim_core::config::BranchPredictorPolicy;
use pipesim_core::stats::{STATS_SECTIONS, SimStats};
use pipesim_core::trace::OpType;

#[test]
fn fresh_stats_have_zero_rates() {
    let stats = SimStats::default();
    assert!(stats.ipc().abs() < f64::EPSILON);
    assert!(stats.cpi().abs() < f64::EPSILON);
    assert!(stats.mispredict_rate().abs() < f64::EPSILON);
}

#[test]
fn derived_rates() {
    let mut stats = SimStats::default();
    stats.cycles = 200;
    stats.instructions_retired = 100;
    stats.branches = 20;
    stats.mispredicts = 5;
    assert!((stats.ipc() - 0.5).abs() < 1e-12);
    assert!((stats.cpi() - 2.0).abs() < 1e-12);
    assert!((stats.mispredict_rate() - 0.25).abs() < 1e-12);
}

#[test]
fn fetch_counts_feed_instruction_mix() {
    let trace = vec![
        RecordBuilder::alu(0x0).build(),
        RecordBuilder::load(0x4, 1, 0x10).build(),
        RecordBuilder::store(0x8, 0x10).build(),
        RecordBuilder::branch(0xc, false).build(),
        RecordBuilder::new(OpType::Other, 0x10).build(),
        RecordBuilder::alu(0x14).build(),
    ];
    let stats = TestContext::new()
        .predictor(BranchPredictorPolicy::AlwaysNotTaken)
        .run(trace);
    assert_eq!(stats.op_count(OpType::Alu), 2);
    assert_eq!(stats.inst_load, 1);
    assert_eq!(stats.inst_store, 1);
    assert_eq!(stats.inst_branch, 1);
    assert_eq!(stats.inst_other, 1);
    assert_eq!(stats.instructions_fetched(), 6);
    assert_eq!(stats.instructions_retired, 6);
    assert_eq!(stats.branches, 1);
    assert_eq!(stats.mispredicts, 0);
}

#[test]
fn report_contains_requested_sections_only() {
    let mut stats = SimStats::default();
    stats.cycles = 10;
    stats.instructions_retired = 6;
    stats.stalls_data = 2;
    let report = stats.render_sections(&["stalls".to_owned()]);
    assert!(report.contains("stalls.data"));
    assert!(report.contains(" 2 (20.00%)"));
    assert!(!report.contains("sim_cycles"));

    let full = stats.render_sections(&[]);
    assert!(full.lines().any(|l| l.starts_with("sim_cycles") && l.ends_with(" 10")));
    assert!(full.contains("INSTRUCTION MIX"));
    assert!(full.contains("BRANCH PREDICTION"));
}

#[test]
fn memory_section_only_with_accesses() {
    let mut stats = SimStats::default();
    assert!(!stats.render_sections(&[]).contains("MEMORY HIERARCHY"));
    stats.dcache_misses = 1;
    assert!(stats.render_sections(&[]).contains("MEMORY HIERARCHY"));
}

#[test]
fn section_names_are_known() {
    assert_eq!(
        STATS_SECTIONS,
        ["summary", "instruction_mix", "branch", "stalls", "memory"]
    );
}
