//! Configuration Tests.
//!
//! Verifies defaults, JSON loading, validation and predictor policy parsing.

use std::io::Write;

use pretty_assertions::assert_eq;
use rstest::rstest;

use pipesim_core::common::ConfigError;
use pipesim_core::config::{BranchPredictorPolicy, Config};

#[test]
fn defaults_are_single_lane_without_forwarding() {
    let config = Config::default();
    assert_eq!(config.pipeline.width, 1);
    assert!(!config.pipeline.enable_exe_fwd);
    assert!(!config.pipeline.enable_mem_fwd);
    assert_eq!(config.pipeline.branch_predictor, BranchPredictorPolicy::Perfect);
    assert_eq!(config.pipeline.rob_capacity, 32);
    assert_eq!(config.general.max_cycles, None);
    assert!(config.validate().is_ok());
}

#[test]
fn empty_document_is_default() {
    let config = Config::from_json("{}").unwrap();
    assert_eq!(config.pipeline.width, 1);
    assert_eq!(config.pipeline.rob_capacity, 32);
}

#[test]
fn full_document_overrides_everything() {
    let json = r#"{
        "general": { "max_cycles": 5000, "trace_pipeline": true },
        "pipeline": {
            "width": 4,
            "branch_predictor": "AlwaysNotTaken",
            "enable_exe_fwd": true,
            "enable_mem_fwd": true,
            "rob_capacity": 64
        }
    }"#;
    let config = Config::from_json(json).unwrap();
    assert_eq!(config.general.max_cycles, Some(5000));
    assert!(config.general.trace_pipeline);
    assert_eq!(config.pipeline.width, 4);
    assert_eq!(
        config.pipeline.branch_predictor,
        BranchPredictorPolicy::AlwaysNotTaken
    );
    assert!(config.pipeline.enable_exe_fwd && config.pipeline.enable_mem_fwd);
    assert_eq!(config.pipeline.rob_capacity, 64);
}

/// A serialized configuration uses the same field and policy names it loads from.
#[test]
fn serialized_config_loads_back() {
    let mut config = Config::default();
    config.general.max_cycles = Some(250);
    config.pipeline.width = 3;
    config.pipeline.branch_predictor = BranchPredictorPolicy::Gshare;
    config.pipeline.enable_mem_fwd = true;

    let json = serde_json::to_string(&config).unwrap();
    assert!(json.contains(r#""branch_predictor":"Gshare""#), "{json}");

    let loaded = Config::from_json(&json).unwrap();
    assert_eq!(loaded.general.max_cycles, Some(250));
    assert_eq!(loaded.pipeline.width, 3);
    assert_eq!(loaded.pipeline.branch_predictor, BranchPredictorPolicy::Gshare);
    assert!(!loaded.pipeline.enable_exe_fwd);
    assert!(loaded.pipeline.enable_mem_fwd);
    assert_eq!(loaded.pipeline.rob_capacity, 32);
}

#[rstest]
#[case("Gshare")]
#[case("GShare")]
#[case("Adaptive")]
fn gshare_aliases_deserialize(#[case] name: &str) {
    let json = format!(r#"{{ "pipeline": {{ "branch_predictor": "{name}" }} }}"#);
    let config = Config::from_json(&json).unwrap();
    assert_eq!(config.pipeline.branch_predictor, BranchPredictorPolicy::Gshare);
}

#[test]
fn zero_width_is_rejected() {
    let err = Config::from_json(r#"{ "pipeline": { "width": 0 } }"#).unwrap_err();
    assert!(matches!(err, ConfigError::ZeroWidth));
}

#[test]
fn zero_rob_is_rejected() {
    let err = Config::from_json(r#"{ "pipeline": { "rob_capacity": 0 } }"#).unwrap_err();
    assert!(matches!(err, ConfigError::ZeroRobCapacity));
}

#[test]
fn malformed_json_is_a_parse_error() {
    let err = Config::from_json(r#"{ "pipeline": { "width": "two" } }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn loads_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{ "pipeline": {{ "width": 2, "enable_mem_fwd": true }} }}"#).unwrap();
    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.pipeline.width, 2);
    assert!(config.pipeline.enable_mem_fwd);
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::from_file(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[rstest]
#[case("perfect", BranchPredictorPolicy::Perfect)]
#[case("always-taken", BranchPredictorPolicy::AlwaysTaken)]
#[case("ALWAYS_NOT_TAKEN", BranchPredictorPolicy::AlwaysNotTaken)]
#[case("static", BranchPredictorPolicy::AlwaysNotTaken)]
#[case("gshare", BranchPredictorPolicy::Gshare)]
#[case("adaptive", BranchPredictorPolicy::Gshare)]
fn policy_from_str(#[case] text: &str, #[case] policy: BranchPredictorPolicy) {
    assert_eq!(text.parse::<BranchPredictorPolicy>().unwrap(), policy);
}

#[test]
fn policy_name_round_trips_through_from_str() {
    for policy in [
        BranchPredictorPolicy::Perfect,
        BranchPredictorPolicy::AlwaysTaken,
        BranchPredictorPolicy::AlwaysNotTaken,
        BranchPredictorPolicy::Gshare,
    ] {
        assert_eq!(policy.name().parse::<BranchPredictorPolicy>().unwrap(), policy);
    }
}

#[test]
fn unknown_policy_is_rejected() {
    let err = "tage".parse::<BranchPredictorPolicy>().unwrap_err();
    assert!(matches!(err, ConfigError::UnknownPolicy(ref s) if s == "tage"));
}
