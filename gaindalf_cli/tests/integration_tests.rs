//! Integration tests for the gaindalf binary.
//!
//! These tests drive the CLI end to end against a temporary data directory:
//! - Catalog and journal editing
//! - Lift suggestions
//! - Progression indexes and CSV export

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("gaindalf"))
}

/// Run a command against `data_dir` and require success
fn run(data_dir: &Path, args: &[&str]) -> String {
    let output = cli()
        .arg("--data-dir")
        .arg(data_dir)
        .args(args)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    String::from_utf8(output).expect("stdout is utf-8")
}

fn read_db(data_dir: &Path) -> serde_json::Value {
    let content = fs::read_to_string(data_dir.join("gaindalf.json")).expect("Failed to read db");
    serde_json::from_str(&content).expect("db is valid json")
}

/// Chest(1) with Bench(1), Back(2) with Row(2), a workout on 2025-01-01
/// with one bench set of 5 x 100
fn seed(data_dir: &Path) {
    run(data_dir, &["muscle-group", "add", "Chest"]);
    run(data_dir, &["muscle-group", "add", "Back"]);
    run(data_dir, &["lift", "add", "Bench", "--group", "1"]);
    run(data_dir, &["lift", "add", "Row", "--group", "2"]);
    run(data_dir, &["workout", "new", "--date", "2025-01-01"]);
    run(data_dir, &["workout", "add-lift", "1", "1"]);
    run(data_dir, &["set", "add", "1", "--reps", "5", "--weight", "100"]);
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Workout tracker with lift suggestions",
        ));
}

#[test]
fn test_first_write_creates_database() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().join("nested");

    cli()
        .arg("muscle-group")
        .arg("add")
        .arg("Chest")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Added muscle group 1 (Chest)"));

    assert!(data_dir.join("gaindalf.json").exists());
    let db = read_db(&data_dir);
    assert_eq!(db["muscle_groups"]["1"]["name"], "Chest");
}

#[test]
fn test_listing_empty_data_dir_succeeds() {
    let temp_dir = setup_test_dir();

    let out = run(temp_dir.path(), &["workout", "list"]);
    assert!(out.is_empty());
    // Reads never create the database
    assert!(!temp_dir.path().join("gaindalf.json").exists());
}

#[test]
fn test_catalog_editing() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    run(data_dir, &["muscle-group", "add", "Chest"]);
    run(data_dir, &["muscle-group", "add", "Triceps"]);
    run(data_dir, &["muscle-group", "rename", "2", "Arms"]);
    run(data_dir, &["lift", "add", "Bench", "--group", "1", "--group", "2"]);
    run(data_dir, &["lift", "update", "1", "--name", "Bench Press"]);

    let groups = run(data_dir, &["muscle-group", "list"]);
    assert!(groups.contains("Chest"));
    assert!(groups.contains("Arms"));
    assert!(!groups.contains("Triceps"));

    let lifts = run(data_dir, &["lift", "list"]);
    assert!(lifts.contains("Bench Press"));
    assert!(lifts.contains("[1, 2]"));

    run(data_dir, &["conflict", "add", "1", "2"]);
    let conflicts = run(data_dir, &["conflict", "list"]);
    assert!(conflicts.contains("Chest <-> Arms"));

    // Removing a group drops its links and conflicts
    run(data_dir, &["muscle-group", "remove", "2"]);
    let db = read_db(data_dir);
    assert!(db["conflicts"].as_object().unwrap().is_empty());
    assert_eq!(db["lift_muscle_groups"].as_array().unwrap().len(), 1);
}

#[test]
fn test_invalid_catalog_edits_fail() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    run(data_dir, &["muscle-group", "add", "Chest"]);

    cli()
        .arg("--data-dir")
        .arg(data_dir)
        .args(["conflict", "add", "1", "1"])
        .assert()
        .failure();

    cli()
        .arg("--data-dir")
        .arg(data_dir)
        .args(["lift", "add", "Bench", "--group", "7"])
        .assert()
        .failure();

    cli()
        .arg("--data-dir")
        .arg(data_dir)
        .args(["muscle-group", "add", "   "])
        .assert()
        .failure();

    // Nothing was written by the failed commands
    let db = read_db(data_dir);
    assert!(db["lifts"].as_object().unwrap().is_empty());
    assert!(db["conflicts"].as_object().unwrap().is_empty());
}

#[test]
fn test_workout_journal_flow() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    seed(data_dir);

    run(data_dir, &["set", "add", "1", "--reps", "4", "--weight", "105"]);
    run(data_dir, &["set", "update", "2", "--reps", "3"]);
    run(data_dir, &["workout", "subtitle", "1", "Push day"]);

    let show = run(data_dir, &["workout", "show", "1"]);
    assert!(show.contains("2025-01-01"));
    assert!(show.contains("Push day"));
    assert!(show.contains("Bench"));
    assert!(show.contains("#1 5 x 100.0kg"));
    assert!(show.contains("#2 3 x 105.0kg"));

    let list = run(data_dir, &["workout", "list"]);
    assert!(list.contains("[Bench]"));

    run(data_dir, &["set", "remove", "2"]);
    let db = read_db(data_dir);
    assert_eq!(db["sets"].as_object().unwrap().len(), 1);
    assert_eq!(db["workouts"]["1"]["subtitle"], "Push day");
    assert_eq!(db["workouts"]["1"]["date"], "2025-01-01");
}

#[test]
fn test_remove_workout_cascades() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    seed(data_dir);

    run(data_dir, &["workout", "remove", "1"]);

    let db = read_db(data_dir);
    assert!(db["workouts"].as_object().unwrap().is_empty());
    assert!(db["workout_lifts"].as_object().unwrap().is_empty());
    assert!(db["sets"].as_object().unwrap().is_empty());
}

#[test]
fn test_lift_in_use_cannot_be_removed() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    seed(data_dir);

    cli()
        .arg("--data-dir")
        .arg(data_dir)
        .args(["lift", "remove", "1"])
        .assert()
        .failure();

    // Row was never logged and can go
    run(data_dir, &["lift", "remove", "2"]);
    let db = read_db(data_dir);
    assert!(db["lifts"]["1"].is_object());
    assert!(db["lifts"]["2"].is_null());
}

#[test]
fn test_suggest_prefers_untrained_group_then_previous_sets() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    seed(data_dir);
    run(data_dir, &["workout", "new", "--date", "2025-01-08"]);

    // Back has never been trained
    let first = run(data_dir, &["workout", "suggest", "2"]);
    assert!(first.contains("NEXT: Row"));
    assert!(first.contains("Muscle group: Back"));
    assert!(first.contains("first time"));

    run(data_dir, &["workout", "add-lift", "2", "2"]);

    let second = run(data_dir, &["workout", "suggest", "2"]);
    assert!(second.contains("NEXT: Bench"));
    assert!(second.contains("Last time:"));
    assert!(second.contains("#1 5 x 100.0kg"));
}

#[test]
fn test_suggest_skips_conflicting_group() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    seed(data_dir);
    run(data_dir, &["muscle-group", "add", "Shoulders"]);
    run(data_dir, &["lift", "add", "Press", "--group", "3"]);
    run(data_dir, &["conflict", "add", "2", "3"]);
    run(data_dir, &["workout", "new", "--date", "2025-01-08"]);
    run(data_dir, &["workout", "add-lift", "2", "2"]);

    // Shoulders is untrained but conflicts with Back, so Chest wins
    let out = run(data_dir, &["workout", "suggest", "2"]);
    assert!(out.contains("NEXT: Bench"));
}

#[test]
fn test_suggest_unknown_workout_fails() {
    let temp_dir = setup_test_dir();
    seed(temp_dir.path());

    cli()
        .arg("--data-dir")
        .arg(temp_dir.path())
        .args(["workout", "suggest", "99"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Workout 99 not found"));
}

#[test]
fn test_suggest_without_muscle_groups_fails() {
    let temp_dir = setup_test_dir();
    run(temp_dir.path(), &["workout", "new", "--date", "2025-01-01"]);

    cli()
        .arg("--data-dir")
        .arg(temp_dir.path())
        .args(["workout", "suggest", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No muscle groups found"));
}

#[test]
fn test_last_sets() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    seed(data_dir);

    let bench = run(data_dir, &["lift", "last-sets", "1"]);
    assert!(bench.contains("#1 5 x 100.0kg"));

    let row = run(data_dir, &["lift", "last-sets", "2"]);
    assert!(row.contains("No previous sets"));
}

#[test]
fn test_progress_indexes() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    seed(data_dir);

    run(data_dir, &["workout", "new", "--date", "2025-01-08"]);
    run(data_dir, &["workout", "add-lift", "2", "1"]);
    run(data_dir, &["workout", "add-lift", "2", "2"]);
    run(data_dir, &["set", "add", "2", "--reps", "6", "--weight", "120"]);
    run(data_dir, &["set", "add", "3", "--reps", "10", "--weight", "50"]);

    let out = run(data_dir, &["progress"]);
    let lines: Vec<_> = out.lines().collect();
    assert!(lines[0].contains("strength"));
    assert!(lines[1].contains("2025-01-01"));
    assert!(lines[1].contains("1.000"));
    // Bench 1.2 / 1.44 and Row at its baseline 1.0 / 1.0
    assert!(lines[2].contains("2025-01-08"));
    assert!(lines[2].contains("1.100"));
    assert!(lines[2].contains("1.220"));

    let bench = run(data_dir, &["progress", "--lift", "1"]);
    assert!(bench.contains("1.200"));
    assert!(bench.contains("1.440"));
}

#[test]
fn test_progress_csv_export() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    seed(data_dir);
    run(data_dir, &["workout", "new", "--date", "2025-01-08"]);

    let csv_path = temp_dir.path().join("progress.csv");
    let out = run(
        data_dir,
        &["progress", "--csv", csv_path.to_str().unwrap()],
    );
    assert!(out.contains("Wrote 2 rows"));

    let content = fs::read_to_string(&csv_path).unwrap();
    let lines: Vec<_> = content.lines().collect();
    assert_eq!(lines[0], "workout_id,date,strength_index,endurance_index");
    assert_eq!(lines[1], "1,2025-01-01,1.0,1.0");
    // Empty workout has no defined indexes
    assert_eq!(lines[2], "2,2025-01-08,,");
}

#[test]
fn test_progress_unknown_lift_fails() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("--data-dir")
        .arg(temp_dir.path())
        .args(["progress", "--lift", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Lift 5 not found"));
}

#[test]
fn test_config_show_reflects_data_dir_override() {
    let temp_dir = setup_test_dir();

    let out = run(temp_dir.path(), &["config", "show"]);
    assert!(out.contains(&temp_dir.path().display().to_string()));
    assert!(out.contains("gaindalf.json"));
}

// dirs only honours XDG_CONFIG_HOME on Linux
#[cfg(target_os = "linux")]
#[test]
fn test_config_init_writes_defaults_once() {
    let temp_dir = setup_test_dir();
    let config_home = temp_dir.path().join("config");

    cli()
        .env("XDG_CONFIG_HOME", &config_home)
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote default config"));

    let written = fs::read_to_string(config_home.join("gaindalf/config.toml")).unwrap();
    assert!(written.contains("database_file = \"gaindalf.json\""));
    assert!(written.contains("level = \"info\""));

    cli()
        .env("XDG_CONFIG_HOME", &config_home)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    cli()
        .env("XDG_CONFIG_HOME", &config_home)
        .args(["config", "init", "--force"])
        .assert()
        .success();
}

#[test]
fn test_non_finite_weight_rejected() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    seed(data_dir);

    for weight in ["inf", "NaN"] {
        cli()
            .arg("--data-dir")
            .arg(data_dir)
            .args(["set", "add", "1", "--reps", "5", "--weight", weight])
            .assert()
            .failure()
            .stderr(predicate::str::contains("finite"));
    }

    cli()
        .arg("--data-dir")
        .arg(data_dir)
        .args(["set", "update", "1", "--weight", "inf"])
        .assert()
        .failure();

    let show = run(data_dir, &["workout", "show", "1"]);
    assert!(show.contains("#1 5 x 100.0kg"));
    assert!(!show.contains("#2"));
}

#[test]
fn test_lift_update_can_clear_groups() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    run(data_dir, &["muscle-group", "add", "Chest"]);
    run(data_dir, &["lift", "add", "Bench", "--group", "1"]);

    // Without flags the groups are kept
    run(data_dir, &["lift", "update", "1", "--name", "Bench Press"]);
    assert!(run(data_dir, &["lift", "list"]).contains("groups: [1]"));

    run(data_dir, &["lift", "update", "1", "--clear-groups"]);
    assert!(run(data_dir, &["lift", "list"]).contains("groups: []"));
    let db = read_db(data_dir);
    assert!(db["lift_muscle_groups"].as_array().unwrap().is_empty());

    cli()
        .arg("--data-dir")
        .arg(data_dir)
        .args(["lift", "update", "1", "--group", "1", "--clear-groups"])
        .assert()
        .failure();
}

#[cfg(target_os = "linux")]
#[test]
fn test_config_load_is_logged() {
    let temp_dir = setup_test_dir();
    let config_home = temp_dir.path().join("config");
    fs::create_dir_all(config_home.join("gaindalf")).unwrap();
    fs::write(
        config_home.join("gaindalf/config.toml"),
        "[logging]\nlevel = \"warn\"\n",
    )
    .unwrap();

    cli()
        .env("XDG_CONFIG_HOME", &config_home)
        .env_remove("RUST_LOG")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Loaded config from"))
        .stdout(predicate::str::contains("Log level:   warn"));
}
