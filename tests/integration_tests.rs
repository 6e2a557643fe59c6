//! Integration tests for the nyd CLI
//!
//! These tests exercise the CLI commands end-to-end using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use tempfile::TempDir;

const CASES_CSV: &str = "\
CNR_Number,Case_Number,Filing_Date,Decision_Date,Current_Status,NJDG_Judge_Name,Petitioner_Advocate,Respondent_Advocate,Nature_of_Disposal,RemappedStages
CNR001,CS/1/2021,2021-01-10,2021-06-10,Disposed,Ramesh Kumar,\"Adv. R. Sharma, Sr.\",P. Mehta,Decree,Judgment
CNR002,CS/2/2022,2022-03-01,,Pending,Ramesh Kumar,A. Gupta,R. Sharma,,Evidence
CNR003,CS/3/2022,05-05-2022,,Pending,Anita Rao,K. Iyer,L. Nair,,Appearance
";

const HEARINGS_CSV: &str = "\
CNR_Number,HearingDate,NextHearingDate,PreviousHearing,PurposeOfHearing,BeforeHonourableJudges
CNR002,2024-01-15,2030-02-01,2023-12-01,Evidence,Ramesh Kumar
CNR003,2024-01-20,2030-02-15,,Appearance,Anita Rao
";

/// Empty home directory shared by every test run, so a developer's global
/// config never leaks into the assertions
fn isolated_home() -> &'static Path {
    static HOME: OnceLock<TempDir> = OnceLock::new();
    HOME.get_or_init(|| TempDir::new().unwrap()).path()
}

/// Helper to get a nyd command
fn nyd() -> Command {
    let home = isolated_home();
    let mut cmd = Command::cargo_bin("nyd").unwrap();
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("NYD_PASSWORD")
        .env_remove("NYD_CASES_FILE")
        .env_remove("NYD_HEARINGS_FILE")
        .env_remove("NYD_AGING_DAYS");
    cmd
}

/// Helper to create a workspace with sample data
fn setup_workspace() -> TempDir {
    let tmp = TempDir::new().unwrap();
    nyd().current_dir(tmp.path()).arg("init").assert().success();
    fs::write(tmp.path().join("data/cases.csv"), CASES_CSV).unwrap();
    fs::write(tmp.path().join("data/hearings.csv"), HEARINGS_CSV).unwrap();
    tmp
}

fn register(tmp: &TempDir, role: &str, name: &str, password: &str) {
    nyd()
        .current_dir(tmp.path())
        .args(["auth", "register", "--role", role, "--name", name, "--password", password])
        .assert()
        .success();
}

// ============================================================================
// CLI Basic Tests
// ============================================================================

#[test]
fn test_help_displays() {
    nyd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("judge"))
        .stdout(predicate::str::contains("advocate"))
        .stdout(predicate::str::contains("analytics"));
}

#[test]
fn test_version_displays() {
    nyd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("nyd"));
}

#[test]
fn test_completions_bash() {
    nyd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nyd"));
}

// ============================================================================
// Init Tests
// ============================================================================

#[test]
fn test_init_creates_workspace() {
    let tmp = TempDir::new().unwrap();
    nyd()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized workspace"));

    assert!(tmp.path().join(".nyd/config.yaml").exists());
    assert!(tmp.path().join("data").is_dir());
}

#[test]
fn test_init_twice_reports_existing() {
    let tmp = setup_workspace();
    nyd()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn test_command_outside_workspace_fails() {
    let tmp = TempDir::new().unwrap();
    nyd()
        .current_dir(tmp.path())
        .arg("status")
        .assert()
        .failure();
}

// ============================================================================
// Auth Tests
// ============================================================================

#[test]
fn test_register_then_login() {
    let tmp = setup_workspace();
    register(&tmp, "judge", "Ramesh Kumar", "RAME01");

    nyd()
        .current_dir(tmp.path())
        .args(["auth", "login", "--role", "judge", "--name", "ramesh kumar", "--password", "RAME01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged in as Judge"));

    let stored = fs::read_to_string(tmp.path().join(".nyd/judge_passwords.json")).unwrap();
    assert!(stored.contains("RAMESH KUMAR"));
    assert!(!stored.contains("RAME01"));
}

#[test]
fn test_register_duplicate_refused() {
    let tmp = setup_workspace();
    register(&tmp, "judge", "Ramesh Kumar", "RAME01");

    nyd()
        .current_dir(tmp.path())
        .args(["auth", "register", "--role", "judge", "--name", "RAMESH KUMAR", "--password", "other"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already registered"));
}

#[test]
fn test_login_wrong_password() {
    let tmp = setup_workspace();
    register(&tmp, "judge", "Ramesh Kumar", "RAME01");

    nyd()
        .current_dir(tmp.path())
        .args(["auth", "login", "--role", "judge", "--name", "Ramesh Kumar", "--password", "wrong"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Incorrect password"));
}

#[test]
fn test_login_unregistered() {
    let tmp = setup_workspace();
    nyd()
        .current_dir(tmp.path())
        .args(["auth", "login", "--role", "advocate", "--name", "sharma", "--password", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not registered"));
}

#[test]
fn test_login_without_cases() {
    let tmp = setup_workspace();
    register(&tmp, "judge", "Nobody", "pw");

    nyd()
        .current_dir(tmp.path())
        .args(["auth", "login", "--role", "judge", "--name", "Nobody", "--password", "pw"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No cases found for Judge: Nobody"));
}

#[test]
fn test_password_from_env() {
    let tmp = setup_workspace();
    register(&tmp, "judge", "Anita Rao", "secret");

    nyd()
        .current_dir(tmp.path())
        .env("NYD_PASSWORD", "secret")
        .args(["auth", "login", "--role", "judge", "--name", "Anita Rao"])
        .assert()
        .success();
}

#[test]
fn test_reset_password() {
    let tmp = setup_workspace();
    register(&tmp, "advocate", "Sharma", "old");

    nyd()
        .current_dir(tmp.path())
        .args(["auth", "reset", "--role", "advocate", "--name", "sharma", "--password", "new"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Password reset"));

    nyd()
        .current_dir(tmp.path())
        .args(["auth", "login", "--role", "advocate", "--name", "sharma", "--password", "old"])
        .assert()
        .failure();

    nyd()
        .current_dir(tmp.path())
        .args(["auth", "login", "--role", "lawyer", "--name", "SHARMA", "--password", "new"])
        .assert()
        .success();
}

#[test]
fn test_reset_unknown_identity_fails() {
    let tmp = setup_workspace();
    nyd()
        .current_dir(tmp.path())
        .args(["auth", "reset", "--role", "judge", "--name", "Ghost", "--password", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not registered"));
}

// ============================================================================
// Judge Dashboard Tests
// ============================================================================

fn judge(tmp: &TempDir) -> Command {
    let mut cmd = nyd();
    cmd.current_dir(tmp.path())
        .args(["judge", "--name", "Ramesh Kumar", "--password", "RAME01"]);
    cmd
}

#[test]
fn test_judge_cases_scoped_to_portfolio() {
    let tmp = setup_workspace();
    register(&tmp, "judge", "Ramesh Kumar", "RAME01");

    judge(&tmp)
        .args(["cases", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CNR001"))
        .stdout(predicate::str::contains("CNR002"))
        .stdout(predicate::str::contains("CNR003").not());
}

#[test]
fn test_judge_cases_status_filter() {
    let tmp = setup_workspace();
    register(&tmp, "judge", "Ramesh Kumar", "RAME01");

    judge(&tmp)
        .args(["cases", "--status", "disposed", "--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CNR001"))
        .stdout(predicate::str::contains("CNR002").not());
}

#[test]
fn test_judge_disposal_days_derived() {
    let tmp = setup_workspace();
    register(&tmp, "judge", "Ramesh Kumar", "RAME01");

    judge(&tmp)
        .args(["cases", "--format", "tsv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("151"));
}

#[test]
fn test_judge_hearings_views() {
    let tmp = setup_workspace();
    register(&tmp, "judge", "Ramesh Kumar", "RAME01");

    judge(&tmp)
        .args(["hearings", "--on", "2000-01-01", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"upcoming\""))
        .stdout(predicate::str::contains("\"rescheduled\""))
        .stdout(predicate::str::contains("2030-02-01"))
        .stdout(predicate::str::contains("2030-02-15").not());
}

#[test]
fn test_judge_hearings_invalid_date() {
    let tmp = setup_workspace();
    register(&tmp, "judge", "Ramesh Kumar", "RAME01");

    judge(&tmp)
        .args(["hearings", "--on", "someday"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date"));
}

#[test]
fn test_judge_alerts_and_charts() {
    let tmp = setup_workspace();
    register(&tmp, "judge", "Ramesh Kumar", "RAME01");

    judge(&tmp)
        .args(["alerts", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"pending\""))
        .stdout(predicate::str::contains("age_days"));

    judge(&tmp)
        .args(["charts", "--format", "md"])
        .assert()
        .success()
        .stdout(predicate::str::contains("| disposal_year"))
        .stdout(predicate::str::contains("2021"));
}

// ============================================================================
// Advocate Workspace Tests
// ============================================================================

fn advocate(tmp: &TempDir) -> Command {
    let mut cmd = nyd();
    cmd.current_dir(tmp.path())
        .args(["advocate", "--name", "sharma", "--password", "pw"]);
    cmd
}

#[test]
fn test_advocate_portfolio_substring_match() {
    let tmp = setup_workspace();
    register(&tmp, "advocate", "sharma", "pw");

    advocate(&tmp)
        .args(["portfolio", "--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CNR001"))
        .stdout(predicate::str::contains("CNR002"))
        .stdout(predicate::str::contains("CNR003").not());
}

#[test]
fn test_advocate_note_and_case() {
    let tmp = setup_workspace();
    register(&tmp, "advocate", "sharma", "pw");

    advocate(&tmp)
        .args(["note", "CNR002", "File rejoinder"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Note saved"));

    advocate(&tmp)
        .args(["case", "CNR002"])
        .assert()
        .success()
        .stdout(predicate::str::contains("File rejoinder"));

    let notes = fs::read_to_string(tmp.path().join(".nyd/notes.json")).unwrap();
    assert!(notes.contains("File rejoinder"));
}

#[test]
fn test_advocate_cannot_annotate_foreign_case() {
    let tmp = setup_workspace();
    register(&tmp, "advocate", "sharma", "pw");

    advocate(&tmp)
        .args(["note", "CNR003", "Not mine"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("in your portfolio"));

    assert!(!tmp.path().join(".nyd/notes.json").exists());
}

#[test]
fn test_advocate_reminders() {
    let tmp = setup_workspace();
    register(&tmp, "advocate", "sharma", "pw");

    advocate(&tmp)
        .args(["remind", "CNR001", "2030-05-01"])
        .assert()
        .success();

    advocate(&tmp)
        .args(["reminders", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2030-05-01"))
        .stdout(predicate::str::contains("upcoming"));
}

#[test]
fn test_advocate_remind_rejects_bad_date() {
    let tmp = setup_workspace();
    register(&tmp, "advocate", "sharma", "pw");

    advocate(&tmp)
        .args(["remind", "CNR001", "next week"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date"));
}

// ============================================================================
// Analytics and Status Tests
// ============================================================================

#[test]
fn test_analytics_sections() {
    let tmp = setup_workspace();
    nyd()
        .current_dir(tmp.path())
        .args(["analytics", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"funnel\""))
        .stdout(predicate::str::contains("\"trend\""))
        .stdout(predicate::str::contains("151.0"))
        .stdout(predicate::str::contains("RAMESH KUMAR"));
}

#[test]
fn test_analytics_year_filter() {
    let tmp = setup_workspace();
    nyd()
        .current_dir(tmp.path())
        .args(["analytics", "--year", "2022", "--section", "funnel", "--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Evidence"))
        .stdout(predicate::str::contains("Judgment").not());
}

#[test]
fn test_analytics_workload_follows_year_filter() {
    let tmp = setup_workspace();
    nyd()
        .current_dir(tmp.path())
        .args(["analytics", "--year", "2022", "--section", "workload", "--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ANITA RAO"));

    nyd()
        .current_dir(tmp.path())
        .args(["analytics", "--year", "2021", "--section", "workload", "--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ANITA RAO").not());
}

#[test]
fn test_analytics_bins_out_of_range_rejected() {
    let tmp = setup_workspace();
    nyd()
        .current_dir(tmp.path())
        .args(["analytics", "--section", "histogram", "--bins", "18446744073709551615"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--bins"));

    nyd()
        .current_dir(tmp.path())
        .args(["analytics", "--section", "histogram", "--bins", "0"])
        .assert()
        .failure();
}

#[test]
fn test_status_quick_stats() {
    let tmp = setup_workspace();
    nyd()
        .current_dir(tmp.path())
        .args(["status", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"total_cases\": 3"))
        .stdout(predicate::str::contains("\"criminal_cases\": 0"));
}

#[test]
fn test_missing_source_is_fatal() {
    let tmp = TempDir::new().unwrap();
    nyd().current_dir(tmp.path()).arg("init").assert().success();

    nyd()
        .current_dir(tmp.path())
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("source_missing"));
}

#[test]
fn test_no_merge_key_degrades_to_cases() {
    let tmp = TempDir::new().unwrap();
    nyd().current_dir(tmp.path()).arg("init").assert().success();
    fs::write(
        tmp.path().join("data/cases.csv"),
        "Filing_Date,Decision_Date,Current_Status\n2022-01-10,2022-06-10,Disposed\n",
    )
    .unwrap();
    fs::write(
        tmp.path().join("data/hearings.csv"),
        "HearingDate,PurposeOfHearing\n2024-01-15,Evidence\n",
    )
    .unwrap();

    nyd()
        .current_dir(tmp.path())
        .args(["status", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"total_cases\": 1"))
        .stderr(predicate::str::contains("no linking key"));
}

#[test]
fn test_config_points_at_other_files() {
    let tmp = TempDir::new().unwrap();
    nyd().current_dir(tmp.path()).arg("init").assert().success();
    fs::create_dir_all(tmp.path().join("exports")).unwrap();
    fs::write(tmp.path().join("exports/c.csv"), CASES_CSV).unwrap();
    fs::write(tmp.path().join("exports/h.csv"), HEARINGS_CSV).unwrap();
    fs::write(
        tmp.path().join(".nyd/config.yaml"),
        "cases_file: exports/c.csv\nhearings_file: exports/h.csv\n",
    )
    .unwrap();

    nyd()
        .current_dir(tmp.path())
        .args(["status", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"total_cases\": 3"));
}

#[cfg(target_os = "linux")]
#[test]
fn test_global_config_read_from_config_home() {
    let tmp = setup_workspace();
    let config_home = TempDir::new().unwrap();
    fs::create_dir_all(config_home.path().join("nyd")).unwrap();
    fs::write(
        config_home.path().join("nyd/config.yaml"),
        "default_format: json\n",
    )
    .unwrap();

    nyd()
        .current_dir(tmp.path())
        .env("XDG_CONFIG_HOME", config_home.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"total_cases\": 3"));

    nyd()
        .current_dir(tmp.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"total_cases\"").not());
}
