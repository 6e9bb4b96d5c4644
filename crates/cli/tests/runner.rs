use std::process::Command;

#[test]
fn test_cli_help() {
    let output = Command::new(env!("CARGO_BIN_EXE_eury"))
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("EurySPACE bring-up bench"));
}

#[test]
fn test_cli_missing_script() {
    let output = Command::new(env!("CARGO_BIN_EXE_eury"))
        .args(["test", "--script", "non_existent_script.yaml"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(2));
}
