#![cfg(feature = "cli_api")]

use assert_cmd::Command;
use predicates::str::contains as str_contains;
use std::path::Path;
use tempfile::TempDir;

#[allow(deprecated)]
fn run_cli(dir: &Path, script: &str) -> assert_cmd::assert::Assert {
    let mut cmd = Command::cargo_bin("cli").expect("cli binary");
    cmd.env("CURRICULUM_PLANNER_STORE", dir.join("status.json"))
        .env_remove("CURRICULUM_PLANNER_CONFIG")
        .env_remove("CURRICULUM_PLANNER_STRATEGY")
        .env_remove("CURRICULUM_PLANNER_FALLBACK")
        .write_stdin(script.to_string())
        .assert()
}

/// Two school weeks starting Monday 2025-01-06.
fn write_calendar(dir: &Path) -> String {
    let path = dir.join("calendar.csv");
    let mut contents = String::from("Date,Event\n");
    for day in 6..=17 {
        contents.push_str(&format!("2025-01-{day:02},\n"));
    }
    std::fs::write(&path, contents).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn cli_build_reports_missing_fields() {
    let dir = TempDir::new().unwrap();
    let calendar = write_calendar(dir.path());
    let script = format!("calendar {calendar}\nsubject Biology\nbuild\nquit\n");
    run_cli(dir.path(), &script)
        .success()
        .stdout(str_contains("Please complete all required fields"));
    assert!(!dir.path().join("status.json").exists());
}

#[test]
fn cli_build_without_calendar_is_rejected() {
    let dir = TempDir::new().unwrap();
    run_cli(dir.path(), "subject Biology\ngrade 10\ndays Mon\nbuild\nquit\n")
        .success()
        .stdout(str_contains("(missing: calendar)"));
}

#[test]
fn cli_reports_unknown_curriculum() {
    let dir = TempDir::new().unwrap();
    let calendar = write_calendar(dir.path());
    let script =
        format!("calendar {calendar}\nsubject Astronomy\ngrade 12\ndays Mon,Wed\nbuild\nquit\n");
    run_cli(dir.path(), &script).success().stdout(str_contains(
        "No preloaded curriculum found for Astronomy (Grade 12). Add it to the database.",
    ));
}

#[test]
fn cli_builds_and_tracks_progress() {
    let dir = TempDir::new().unwrap();
    let calendar = write_calendar(dir.path());
    let script = format!(
        "calendar {calendar}\nsubject Biology\ngrade 10\npacing slow\ndays Mon Wed Fri\nbuild\nstatus 0 completed\nactivity 1 Microscope lab\nprogress\nquit\n"
    );
    let assert = run_cli(dir.path(), &script).success();
    let output = String::from_utf8_lossy(&assert.get_output().stdout);

    assert!(output.contains("Loaded 12 calendar dates"));
    assert!(output.contains("Curriculum generated successfully! (6 lessons for Biology - Grade 10)"));
    assert!(output.contains("Scientific Method & Lab Safety"));
    assert!(output.contains("updated: Completed."));
    assert!(output.contains("lessons=6, completed=1, missed=0, upcoming=5, progress=17%"));

    let saved = std::fs::read_to_string(dir.path().join("status.json")).unwrap();
    assert!(saved.contains("Microscope lab"));
}

#[test]
fn cli_progress_survives_restart() {
    let dir = TempDir::new().unwrap();
    let calendar = write_calendar(dir.path());
    let first = format!(
        "calendar {calendar}\nsubject Biology\ngrade Grade 10\ndays Tue\nbuild\nstatus 1 missed\nquit\n"
    );
    run_cli(dir.path(), &first).success();

    run_cli(dir.path(), "classes\nuse Biology - Grade 10\nprogress\nquit\n")
        .success()
        .stdout(str_contains("Biology - Grade 10"))
        .stdout(str_contains("missed=1"));
}

#[test]
fn cli_rejects_out_of_range_lesson() {
    let dir = TempDir::new().unwrap();
    let calendar = write_calendar(dir.path());
    let script = format!(
        "calendar {calendar}\nsubject Biology\ngrade 10\ndays Mon\nbuild\nnotes 9 late\nquit\n"
    );
    run_cli(dir.path(), &script)
        .success()
        .stdout(str_contains("lesson index 9 is out of range"));
}

#[test]
fn cli_exports_summary_csv() {
    let dir = TempDir::new().unwrap();
    let calendar = write_calendar(dir.path());
    let export = dir.path().join("plan.csv");
    let export_arg = export.to_string_lossy().into_owned();
    let script = format!(
        "calendar {calendar}\nsubject English\ngrade 8\ndays Thu\nbuild\nexport summary {export_arg}\nquit\n"
    );
    run_cli(dir.path(), &script)
        .success()
        .stdout(str_contains("Curriculum exported to"));

    let csv = std::fs::read_to_string(&export).unwrap();
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("Date,Day,Subject,Topic"));
    assert!(lines.next().unwrap().starts_with("2025-01-09,Thursday,English,"));
}

#[test]
fn cli_switches_strategy() {
    let dir = TempDir::new().unwrap();
    run_cli(dir.path(), "strategy stride\nstrategy\nquit\n")
        .success()
        .stdout(str_contains("Distribution strategy set to stride."))
        .stdout(str_contains("Distribution strategy: stride"));
}

#[test]
fn cli_export_keeps_subject_with_separator() {
    let dir = TempDir::new().unwrap();
    let calendar = write_calendar(dir.path());
    let export = dir.path().join("art.csv");
    let export_arg = export.to_string_lossy().into_owned();
    let script = format!(
        "calendar {calendar}\nsubject Art - Studio\ngrade 9\ndays Mon\ntopics Color Theory; Perspective\nbuild\nexport summary {export_arg}\nquit\n"
    );
    run_cli(dir.path(), &script)
        .success()
        .stdout(str_contains("Art - Studio - Grade 9"));

    let csv = std::fs::read_to_string(&export).unwrap();
    let first_row = csv.lines().nth(1).unwrap();
    assert_eq!(first_row, "2025-01-06,Monday,Art - Studio,Color Theory");
}
