//! CLI 端到端测试
//!
//! 通过真实二进制验证子命令的输出格式和错误路径。

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

fn cli() -> Command {
    Command::cargo_bin("mopar-cli").unwrap()
}

#[test]
fn test_variants_lists_all_fingerprints() {
    cli()
        .arg("variants")
        .assert()
        .success()
        .stdout(predicate::str::contains("CHRYSLER PACIFICA HYBRID 2017"))
        .stdout(predicate::str::contains("JEEP GRAND CHEROKEE 2019"))
        .stdout(predicate::str::contains("CHRYSLER 300 2018"));
}

#[test]
fn test_params_outputs_json() {
    cli()
        .args(["params", "--variant", "CHRYSLER PACIFICA HYBRID 2017"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"wheelbase\": 3.089"));
}

#[test]
fn test_params_unknown_variant_fails() {
    cli()
        .args(["params", "--variant", "HONDA CIVIC 2016"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported variant"));
}

#[test]
fn test_params_with_tuning_override() {
    let mut tuning = tempfile::NamedTempFile::new().unwrap();
    writeln!(tuning, "min_steer_speed = 5.5").unwrap();

    cli()
        .args([
            "params",
            "--variant",
            "CHRYSLER PACIFICA HYBRID 2017",
            "--tuning",
            tuning.path().to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"min_steer_speed\": 5.5"));
}

#[test]
fn test_replay_emits_one_report_per_cycle() {
    let mut log = tempfile::NamedTempFile::new().unwrap();
    // 两个周期：先无 EPS 帧（不下发），再正常行驶
    writeln!(log, "{{}}").unwrap();
    writeln!(
        log,
        r#"{{"pt": {{"EPS_STATUS": {{"COUNTER": 1}}, "GEAR": {{"PRNDL": 4}}, "SPEED_1": {{"SPEED_LEFT": 25, "SPEED_RIGHT": 25}}, "ACC_2": {{"ACC_STATUS_2": 7}}}}, "torque": 100}}"#
    )
    .unwrap();

    let output = cli()
        .args([
            "replay",
            "--log",
            log.path().to_str().unwrap(),
            "--variant",
            "CHRYSLER PACIFICA HYBRID 2017",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let lines: Vec<&str> = std::str::from_utf8(&output).unwrap().trim().lines().collect();
    assert_eq!(lines.len(), 2);

    let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    // 周期 0 尚未见到 EPS 帧：不下发
    assert_eq!(first["frames"].as_array().unwrap().len(), 0);

    let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
    assert_eq!(second["state"]["gear_shifter"], "Drive");
    assert!(second["state"]["cruise"]["enabled"].as_bool().unwrap());
    assert!(!second["frames"].as_array().unwrap().is_empty());
}

#[test]
fn test_replay_malformed_line_fails() {
    let mut log = tempfile::NamedTempFile::new().unwrap();
    writeln!(log, "not json").unwrap();

    cli()
        .args([
            "replay",
            "--log",
            log.path().to_str().unwrap(),
            "--variant",
            "CHRYSLER PACIFICA HYBRID 2017",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed log line"));
}
