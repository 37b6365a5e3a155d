use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Binary isolated from the host: empty PATH, throwaway HOME
fn discripper(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("discripper").unwrap();
    cmd.env("HOME", home.path())
        .env("PATH", home.path())
        .env_remove("RUST_LOG")
        .env_remove("DISCRIPPER_OUTPUT_DIRECTORY")
        .env_remove("DISCRIPPER_LOG_LEVEL")
        .env_remove("DISCRIPPER_DRY_RUN")
        .env_remove("DISCRIPPER_COMPRESSION");
    cmd
}

#[test]
fn test_simulated_rip_prints_dry_run_lines() {
    let home = TempDir::new().unwrap();
    let out = home.path().join("rips");

    discripper(&home)
        .arg("rip")
        .arg("--simulate")
        .arg(fixture("movie.json"))
        .arg("--output-dir")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "[dry-run] Would execute: no backend available -> {}",
            out.join("Blade_Runner.mp4").display()
        )));

    assert!(!out.exists());
}

#[test]
fn test_simulated_series_uses_title_override() {
    let home = TempDir::new().unwrap();
    let out = home.path().join("rips");

    discripper(&home)
        .args(["rip", "--title", "Serenity Crew", "--simulate"])
        .arg(fixture("series.json"))
        .arg("--output-dir")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Serenity_Crew-s01e04_Shindig.mp4"))
        .stdout(predicate::str::contains("[dry-run]").count(4));
}

#[test]
fn test_missing_device_exits_with_disc_not_detected() {
    let home = TempDir::new().unwrap();

    discripper(&home)
        .args(["rip", "/definitely/not/a/drive"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("/definitely/not/a/drive"));
}

#[test]
fn test_readable_device_without_inspection_tools() {
    let home = TempDir::new().unwrap();
    let device = home.path().join("sr0");
    fs::write(&device, b"").unwrap();

    discripper(&home)
        .arg("rip")
        .arg(&device)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("lsdvd"));
}

#[test]
fn test_missing_fixture_exits_with_code_one() {
    let home = TempDir::new().unwrap();

    discripper(&home)
        .args(["inspect", "--simulate"])
        .arg(home.path().join("absent.json"))
        .assert()
        .code(1);
}

#[test]
fn test_inspect_json_reports_classification() {
    let home = TempDir::new().unwrap();

    let output = discripper(&home)
        .args(["inspect", "--json", "--simulate"])
        .arg(fixture("series.json"))
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["classification"]["type"], "series");
    assert_eq!(value["classification"]["episode_count"], 4);
    assert_eq!(value["tracks"][3]["episode_code"], "s01e04");
}

#[test]
fn test_config_file_is_applied() {
    let home = TempDir::new().unwrap();
    let config_dir = home.path().join(".config");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("discripper.toml"),
        "output_directory = \"~/Movies\"\n[naming]\nlowercase = true\nseparator = \"-\"\n",
    )
    .unwrap();

    discripper(&home)
        .args(["inspect", "--simulate"])
        .arg(fixture("movie.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains(
            home.path().join("Movies").join("blade-runner.mp4").display().to_string(),
        ));
}

#[test]
fn test_invalid_config_exits_with_code_three() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("bad.toml");
    fs::write(&config, "[naming]\nseparator = \".\"\n").unwrap();

    discripper(&home)
        .arg("--config")
        .arg(&config)
        .args(["inspect", "--simulate"])
        .arg(fixture("movie.json"))
        .assert()
        .code(3)
        .stderr(predicate::str::contains("separator"));
}
