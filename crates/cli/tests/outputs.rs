use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn nonce() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos()
}

fn write_temp_file(prefix: &str, contents: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push("eury-tests");
    let _ = std::fs::create_dir_all(&dir);

    let path = dir.join(format!("{}-{}.yaml", prefix, nonce()));
    std::fs::write(&path, contents).expect("Failed to write temp file");
    path
}

#[test]
fn test_cli_run_prints_campaign() {
    let output = Command::new(env!("CARGO_BIN_EXE_eury"))
        .args(["run", "--random-tx-words", "4"])
        .output()
        .expect("Failed to execute eury");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();

    assert!(lines.contains(&"START: visual control sequence - init sequence"));
    assert!(lines.contains(&"OK: visual control sequence - init sequence"));
    assert!(lines.contains(&"OK: default value detected"));
    assert!(lines.contains(&"OK: RX/TX control sequence - time domain analysis - tx data changed to all 0"));
    assert!(lines.contains(&"DONE: visual control sequence - stop sequence"));
    assert_eq!(
        lines.last(),
        Some(&"OpenRISC EurySPACE Space Segment test program stopped")
    );
}

#[test]
fn test_cli_run_mismatch_still_exits_zero() {
    let report_path = std::env::temp_dir().join(format!("eury-report-{}.json", nonce()));
    let _ = std::fs::remove_file(&report_path);

    let output = Command::new(env!("CARGO_BIN_EXE_eury"))
        .args([
            "run",
            "--rx-value",
            "0xDEADBEEF",
            "--random-tx-words",
            "2",
            "--no-console-stdout",
            "--report",
            report_path.to_str().unwrap(),
        ])
        .output()
        .expect("Failed to execute eury");

    assert!(output.status.success());
    assert!(String::from_utf8(output.stdout).unwrap().is_empty());

    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(report["result_schema_version"], "1.0");
    assert_eq!(report["summary"]["rx_default"], "ko");
    assert_eq!(report["summary"]["random_words"], 2);
    assert_eq!(report["snapshot"]["peripherals"]["ccsds_rxtx"]["rx_value"], 3735928559u32);
    let console = report["console"].as_array().unwrap();
    assert!(console.iter().any(|l| l == "KO: not default value detected"));
    assert!(console.iter().any(|l| l == "DEBUG: RX data: 3735928559"));

    let _ = std::fs::remove_file(&report_path);
}

#[test]
fn test_cli_test_mode_outputs() {
    let mut dir = std::env::temp_dir();
    dir.push(format!("eury-tests-outputs-{}", nonce()));
    let script = write_temp_file(
        "script-pass",
        r#"
schema_version: "1.0"
limits:
  random_tx_words: 8
  trace_depth: 4
assertions:
  - console_contains: "OK: default value detected"
  - led_data: 0
  - step_status:
      step: visual_init
      status: ok
"#,
    );

    let output = Command::new(env!("CARGO_BIN_EXE_eury"))
        .args([
            "test",
            "--script",
            script.to_str().unwrap(),
            "--no-console-stdout",
            "--output-dir",
            dir.to_str().unwrap(),
        ])
        .output()
        .expect("Failed to execute eury");

    assert!(output.status.success());

    let result: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.join("result.json")).unwrap()).unwrap();
    assert_eq!(result["status"], "pass");
    assert_eq!(result["assertions"].as_array().unwrap().len(), 3);
    assert!(result["violations"].as_array().unwrap().is_empty());

    let log = std::fs::read_to_string(dir.join("console.log")).unwrap();
    assert!(log.contains("CHECK: RX/TX control sequence - frequency domain analysis"));

    let _ = std::fs::remove_dir_all(&dir);
    let _ = std::fs::remove_file(&script);
}

#[test]
fn test_cli_test_mode_assertion_fail() {
    let script = write_temp_file(
        "script-fail",
        r#"
schema_version: "1.0"
board:
  rx_value: 7
limits:
  random_tx_words: 1
assertions:
  - step_status:
      step: rx_default
      status: ok
"#,
    );

    let output = Command::new(env!("CARGO_BIN_EXE_eury"))
        .args(["test", "--script", script.to_str().unwrap(), "--no-console-stdout"])
        .output()
        .expect("Failed to execute eury");

    assert_eq!(output.status.code(), Some(1)); // EXIT_ASSERT_FAIL
    let _ = std::fs::remove_file(&script);
}

#[test]
fn test_cli_test_mode_config_error() {
    let script = write_temp_file(
        "script-bad",
        r#"
schema_version: "9.9"
"#,
    );

    let output = Command::new(env!("CARGO_BIN_EXE_eury"))
        .args(["test", "--script", script.to_str().unwrap()])
        .output()
        .expect("Failed to execute eury");

    assert_eq!(output.status.code(), Some(2)); // EXIT_CONFIG_ERROR
    let _ = std::fs::remove_file(&script);
}
