//! sr-cli 命令行集成测试

use assert_cmd::Command;
use predicates::prelude::*;

fn sr_cli() -> Command {
    let mut cmd = Command::cargo_bin("sr-cli").unwrap();
    cmd.env_remove("SR_ROBOT_CONFIG").env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_version() {
    sr_cli()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_marker_lookup() {
    sr_cli()
        .args(["marker", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Marker 5 is used in the game, size 200mm"));
}

#[test]
fn test_unused_marker_fails() {
    sr_cli()
        .args(["marker", "150"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("150 is not used for the game."));
}

#[test]
fn test_config_init_then_show() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");

    sr_cli()
        .args(["config", "init", "--environment", "console-with-vision", "--config"])
        .arg(&path)
        .assert()
        .success();
    assert!(path.exists());

    sr_cli()
        .args(["config", "show", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("environment = \"console-with-vision\""));

    sr_cli()
        .args(["config", "init", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_config_from_environment_variable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("robot.toml");

    sr_cli()
        .args(["config", "path"])
        .env("SR_ROBOT_CONFIG", &path)
        .assert()
        .success()
        .stdout(predicate::str::contains("robot.toml"));
}

#[test]
fn test_boards_in_console_environment() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "ignored_ruggeduinos = [\"RUGGEDUINO-CONSOLE\"]\n").unwrap();

    sr_cli()
        .args(["boards", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Console Environment"))
        .stdout(predicate::str::contains("SRPB-CONSOLE"))
        .stdout(predicate::str::contains("RUGGEDUINO-CONSOLE (firmware unknown) on console [ignored]"));
}

#[test]
fn test_metadata_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("metadata.json");
    std::fs::write(
        &path,
        r#"{"status": "RUNNING", "metadata": {"arena": "B", "zone": 3, "mode": "COMP"}}"#,
    )
    .unwrap();

    let output = sr_cli()
        .args(["metadata", "--path"])
        .arg(&path)
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["arena"], "B");
    assert_eq!(value["zone"], 3);
    assert_eq!(value["mode"], "comp");
}

#[test]
fn test_metadata_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();

    sr_cli()
        .args(["metadata", "--path"])
        .arg(dir.path().join("missing.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"arena\": \"A\""));
}
