mod support;

use std::fs;

use predicates::prelude::*;

use support::TempHome;

#[test]
fn root_help_lists_flags_and_doctor() {
    TempHome::new()
        .jjdeck()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: jjdeck"))
        .stdout(predicate::str::contains("--diagnostics"))
        .stdout(predicate::str::contains("--path"))
        .stdout(predicate::str::contains("doctor"));
}

#[test]
fn doctor_help_runs_without_config() {
    TempHome::new()
        .jjdeck()
        .args(["doctor", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Run environment and configuration checks",
        ));
}

#[test]
fn doctor_reports_defaults_without_config() {
    TempHome::new()
        .jjdeck()
        .arg("doctor")
        .assert()
        .success()
        .stdout(predicate::str::contains("config parses and validates"))
        .stdout(predicate::str::contains("using defaults"))
        .stdout(predicate::str::contains(".config/jjdeck/config.toml"))
        .stdout(predicate::str::contains("passed"));
}

#[test]
fn doctor_flags_an_invalid_config() {
    let home = TempHome::new();
    home.write_config("version = 1\n[tickets]\nprovider = \"jira\"\n");

    home.jjdeck()
        .arg("doctor")
        .assert()
        .success()
        .stdout(predicate::str::contains("FAIL"))
        .stdout(predicate::str::contains("invalid config"));
}

#[test]
fn dashboard_refuses_an_invalid_config_before_touching_the_terminal() {
    let home = TempHome::new();
    home.write_config("version = 2\n");

    home.jjdeck()
        .current_dir(home.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: failed to load config at"))
        .stderr(predicate::str::contains("invalid config"));
}

#[test]
fn unknown_subcommands_are_rejected() {
    TempHome::new()
        .jjdeck()
        .arg("log")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn doctor_with_diagnostics_creates_log_file() {
    let home = TempHome::new();
    home.jjdeck()
        .args(["--diagnostics", "doctor"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Diagnostics enabled:"));

    let logs = home.diagnostics_logs();
    let contents = fs::read_to_string(&logs[0]).expect("read log");
    assert!(contents.starts_with("jjdeck diagnostics start"));
    assert!(contents.contains("pid="));
}
