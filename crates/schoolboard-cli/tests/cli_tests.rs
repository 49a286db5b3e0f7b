//! CLI integration tests using assert_cmd.
//!
//! Everything here runs without a backend: offline commands, config files,
//! and the refusal paths taken before any request is sent.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// The binary, isolated from the user's home directory and environment.
fn schoolboard(dir: &TempDir) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("schoolboard").unwrap();
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env_remove("SCHOOLBOARD_BASE_URL")
        .env_remove("SCHOOLBOARD_EMAIL")
        .env_remove("SCHOOLBOARD_PASSWORD")
        .env_remove("RUST_LOG");
    cmd
}

const TIMETABLE: &str = r#"{
  "title": "Grade 7A",
  "entries": [
    {"day": "Monday", "startTime": "08:00", "endTime": "09:00", "courseId": "c1", "subjectId": "s1", "classId": "k1"},
    {"day": "wednesday", "startTime": "10:15", "endTime": "11:00", "courseId": "c2", "subjectId": "s2", "classId": "k1"},
    {"day": "Saturday", "startTime": "09:00", "endTime": "10:00", "courseId": "c1", "subjectId": "s1", "classId": "k1"}
  ],
  "courses": [{"_id": "c1", "name": "Algebra I"}, {"_id": "c2", "name": "Poetry"}],
  "subjects": [{"_id": "s1", "name": "Mathematics"}, {"_id": "s2", "name": "English"}]
}"#;

#[test]
fn check_dates_accepts_valid_range() {
    let dir = TempDir::new().unwrap();
    schoolboard(&dir)
        .args(["check-dates", "--start", "2030-05-01", "--end", "2030-05-10"])
        .args(["--today", "2030-04-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dates are valid"));
}

#[test]
fn check_dates_rejects_end_before_start() {
    let dir = TempDir::new().unwrap();
    schoolboard(&dir)
        .args(["check-dates", "--start", "2030-05-10", "--end", "2030-05-10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("End date must be after start date."));
}

#[test]
fn check_dates_rejects_past_start() {
    let dir = TempDir::new().unwrap();
    schoolboard(&dir)
        .args(["check-dates", "--start", "2030-03-31", "--end", "2030-05-10"])
        .args(["--today", "2030-04-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Start date cannot be in the past."));
}

#[test]
fn check_dates_rejects_malformed_date() {
    let dir = TempDir::new().unwrap();
    schoolboard(&dir)
        .args(["check-dates", "--start", "next week", "--end", "2030-05-10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid date"));
}

#[test]
fn timetable_markdown_from_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("week.json"), TIMETABLE).unwrap();

    schoolboard(&dir)
        .args(["timetable", "show", "--input", "week.json", "--format", "markdown"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Grade 7A"))
        .stdout(predicate::str::contains(
            "| Time | Monday | Tuesday | Wednesday | Thursday | Friday |",
        ))
        .stdout(predicate::str::contains(
            "| 08:00 AM - 09:00 AM | Algebra I / Mathematics |",
        ))
        .stdout(predicate::str::contains("| 10:00 AM - 11:00 AM |  |  | Poetry / English |"))
        .stdout(predicate::str::contains("1 entries not on the grid"));
}

#[test]
fn timetable_table_from_bare_entry_list() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("entries.json"),
        r#"[{"day": "Friday", "startTime": "04:00 PM", "endTime": "05:00 PM", "courseId": "Chemistry"}]"#,
    )
    .unwrap();

    schoolboard(&dir)
        .args(["timetable", "show", "--input", "entries.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("entries"))
        .stdout(predicate::str::contains("Chemistry"));
}

#[test]
fn timetable_html_to_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("week.json"), TIMETABLE).unwrap();

    schoolboard(&dir)
        .args(["timetable", "show", "--input", "week.json", "--format", "html"])
        .args(["--output", "out/week.html"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote"));

    let html = std::fs::read_to_string(dir.path().join("out/week.html")).unwrap();
    assert!(html.contains("<table class=\"timetable\">"));
    assert!(html.contains("Algebra I / Mathematics"));
}

#[test]
fn timetable_rejects_unknown_format() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("week.json"), TIMETABLE).unwrap();

    schoolboard(&dir)
        .args(["timetable", "show", "--input", "week.json", "--format", "pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown format"));
}

#[test]
fn timetable_needs_a_source() {
    let dir = TempDir::new().unwrap();
    schoolboard(&dir)
        .args(["timetable", "show"])
        .assert()
        .failure();
}

#[test]
fn init_creates_config_once() {
    let dir = TempDir::new().unwrap();

    schoolboard(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created schoolboard.toml"));
    assert!(dir.path().join("schoolboard.toml").exists());

    schoolboard(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists, skipping"));
}

#[test]
fn config_set_edits_in_place() {
    let dir = TempDir::new().unwrap();
    schoolboard(&dir).arg("init").assert().success();

    schoolboard(&dir)
        .args(["config", "set", "base_url", "https://api.school.test"])
        .assert()
        .success();
    schoolboard(&dir)
        .args(["config", "set", "auth.password", "hunter2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("****"))
        .stdout(predicate::str::contains("hunter2").not());

    let content = std::fs::read_to_string(dir.path().join("schoolboard.toml")).unwrap();
    assert!(content.starts_with("# schoolboard configuration"));
    assert!(content.contains("base_url = \"https://api.school.test\""));
    assert!(content.contains("password = \"hunter2\""));
}

#[test]
fn config_set_rejects_unknown_key() {
    let dir = TempDir::new().unwrap();
    schoolboard(&dir)
        .args(["config", "set", "colour", "blue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown config key"));
}

#[test]
fn list_requires_login() {
    let dir = TempDir::new().unwrap();
    schoolboard(&dir)
        .args(["list", "classes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not logged in"));
}

#[test]
fn expired_session_is_refused_before_sending() {
    let dir = TempDir::new().unwrap();
    let session = dir.path().join("session.json");
    std::fs::write(
        &session,
        r#"{"accessToken": "old", "user": {"_id": "u1", "name": "Admin", "email": "a@school.test", "role": "admin"}, "expiresAt": "2020-01-01T00:00:00Z"}"#,
    )
    .unwrap();
    std::fs::write(
        dir.path().join("schoolboard.toml"),
        format!(
            "base_url = \"http://127.0.0.1:9\"\nsession_file = {:?}\n",
            session.display().to_string()
        ),
    )
    .unwrap();

    schoolboard(&dir)
        .args(["assessment", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("session expired"));
    assert!(!session.exists(), "expired session should be removed");

    schoolboard(&dir)
        .args(["list", "classes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not logged in"));
}

#[test]
fn unknown_resource_is_a_usage_error() {
    let dir = TempDir::new().unwrap();
    schoolboard(&dir)
        .args(["list", "widgets"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown resource"));
}

#[test]
fn whoami_and_logout_without_session() {
    let dir = TempDir::new().unwrap();
    schoolboard(&dir)
        .arg("whoami")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not logged in"));
    schoolboard(&dir)
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not logged in."));
}

#[test]
fn whoami_reads_stored_session() {
    let dir = TempDir::new().unwrap();
    let session_dir = dir.path().join(".config").join("schoolboard");
    std::fs::create_dir_all(&session_dir).unwrap();
    std::fs::write(
        session_dir.join("session.json"),
        r#"{"accessToken": "t", "user": {"_id": "u1", "name": "Grace Admin", "email": "grace@school.test", "role": "admin", "schoolId": "s1"}}"#,
    )
    .unwrap();

    schoolboard(&dir)
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("Grace Admin <grace@school.test>"))
        .stdout(predicate::str::contains("school: s1"));

    schoolboard(&dir)
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged out."));
    assert!(!session_dir.join("session.json").exists());
}

#[test]
fn create_rejects_malformed_field_before_login_check() {
    let dir = TempDir::new().unwrap();
    schoolboard(&dir)
        .args(["create", "class", "--set", "Grade 7A"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected key=value"));
}
