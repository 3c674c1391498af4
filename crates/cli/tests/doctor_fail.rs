use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn doctor_fails_without_config_or_vault() {
    let tmp = tempdir().unwrap();

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("notegraph"));
    // Point config discovery at an empty directory
    cmd.env("XDG_CONFIG_HOME", tmp.path());
    cmd.env_remove("NOTEGRAPH_VAULT");
    cmd.arg("doctor");
    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("FAIL notegraph doctor"))
        .stdout(predicate::str::contains("looked for:"));
}

#[test]
fn doctor_fails_on_bad_version() {
    let tmp = tempdir().unwrap();
    let cfg = tmp.path().join("config.toml");
    std::fs::write(
        &cfg,
        "version = 9\n\n[profiles.default]\nvault_root = \"/tmp/v\"\n",
    )
    .unwrap();

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("notegraph"));
    cmd.env_remove("NOTEGRAPH_VAULT");
    cmd.args(["doctor", "--config", cfg.to_str().unwrap()]);
    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("version 9 is unsupported"));
}
