//! End-to-end tests for the `guardian` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

/// Binary run inside `dir` with no inherited `GUARDIAN_*` overrides.
fn guardian(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("guardian").unwrap();
    cmd.current_dir(dir)
        .env_remove("GUARDIAN_BACKEND_URL")
        .env_remove("GUARDIAN_REFRESH_INTERVAL")
        .env_remove("GUARDIAN_SETTINGS_PATH")
        .env_remove("GUARDIAN_LOG_LEVEL")
        .env_remove("GUARDIAN_LOG_FORMAT");
    cmd
}

#[test]
fn test_version_and_help() {
    let dir = TempDir::new().unwrap();

    guardian(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("guardian"));

    guardian(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("watch"))
        .stdout(predicate::str::contains("acknowledge-emergency"))
        .stdout(predicate::str::contains("settings"));
}

#[test]
fn test_config_init_respects_force() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("guardian.toml");

    guardian(dir.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration file created"));
    assert!(std::fs::read_to_string(&target)
        .unwrap()
        .contains("[backend]"));

    std::fs::write(&target, "# mine").unwrap();
    guardian(dir.path())
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
    assert_eq!(std::fs::read_to_string(&target).unwrap(), "# mine");

    guardian(dir.path())
        .args(["config", "init", "--force"])
        .assert()
        .success();
    assert!(std::fs::read_to_string(&target)
        .unwrap()
        .contains("[settings]"));
}

#[test]
fn test_settings_round_trip_through_file() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("prefs.json");
    std::fs::write(
        dir.path().join("guardian.toml"),
        format!("[settings]\npath = {:?}\n", store.display().to_string()),
    )
    .unwrap();

    guardian(dir.path())
        .args(["settings", "get", "heartRateMin"])
        .assert()
        .success()
        .stdout("60\n");

    guardian(dir.path())
        .args(["settings", "set", "heartRateMin", "55", "heartRateMax=110"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Health thresholds saved successfully"));
    assert!(store.exists());

    guardian(dir.path())
        .args(["settings", "get", "heartRateMax"])
        .assert()
        .success()
        .stdout("110\n");

    let output = guardian(dir.path())
        .args(["settings", "list", "--json", "--category", "health"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let values: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let min = values
        .as_array()
        .unwrap()
        .iter()
        .find(|v| v["key"] == "heartRateMin")
        .unwrap();
    assert_eq!(min["value"], "55");
    assert_eq!(min["is_default"], false);

    guardian(dir.path())
        .args(["settings", "reset"])
        .assert()
        .success();
    guardian(dir.path())
        .args(["settings", "get", "heartRateMin"])
        .assert()
        .success()
        .stdout("60\n");
}

#[test]
fn test_settings_path_from_env() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("from-env.json");

    guardian(dir.path())
        .env("GUARDIAN_SETTINGS_PATH", &store)
        .args(["settings", "set", "voiceType", "male"])
        .assert()
        .success()
        .stdout(predicate::str::contains("System settings saved successfully"));

    assert!(std::fs::read_to_string(&store).unwrap().contains("male"));
}

#[test]
fn test_unknown_setting_fails() {
    let dir = TempDir::new().unwrap();

    guardian(dir.path())
        .env("GUARDIAN_SETTINGS_PATH", dir.path().join("prefs.json"))
        .args(["settings", "set", "fontSize", "12"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("fontSize"));
}

#[test]
fn test_status_unreachable_backend_fails_closed() {
    let dir = TempDir::new().unwrap();

    let output = guardian(dir.path())
        .args([
            "status",
            "--json",
            "--backend-url",
            "http://127.0.0.1:1",
        ])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Warning:"));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["state"]["running"], false);
    assert_eq!(report["state"]["emergency_mode"], false);
}

#[test]
fn test_start_unreachable_backend_exits_nonzero() {
    let dir = TempDir::new().unwrap();

    guardian(dir.path())
        .args(["start", "--backend-url", "http://127.0.0.1:1"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_completions_bash() {
    let dir = TempDir::new().unwrap();

    guardian(dir.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("guardian"));
}
