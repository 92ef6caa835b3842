//! End-to-end tests: CSV agenda -> SQLite -> lookups
//!
//! These drive the library the same way the binaries do, plus a few checks on
//! the binaries' exit codes.

use std::path::{Path, PathBuf};
use std::process::Command;
use agenda::import::{ImportOptions, Importer};
use agenda::query::{LookupColumn, LookupEngine};
use agenda::{NewSession, SessionKind, SqliteStore};
use tempfile::TempDir;

const AGENDA_CSV: &str = "\
Annual Conference,,,,,,,
Date,Time Start,Time End,Session or Sub-session,Session Title,Room/Location,Description,Speakers
,,,,,,,
06/18/2024,09:00 AM,09:30 AM,Sub-session,Stray Breakout,Room 9,Listed before any session,Ghost
06/18/2024,10:00 AM,11:00 AM,Session,Opening Keynote,Main Hall,Welcome to the conference,Jane Doe; John Smith
06/18/2024,10:15 AM,10:45 AM,Sub-session,Keynote Q&A,Main Hall,Questions from the floor,
06/18/2024,11:30 AM,12:30 PM,Session,Storage Engines,Room 2,Deep dive into LSM trees,Ana Lima
06/18/2024,11:30 AM,12:00 PM,Sub-session,Compaction Lab,Lab 1,Hands-on compaction tuning,\"Jane Doe, Ana Lima\"
,,,,,,,
06/17/2024,04:00 PM,05:00 PM,Social,Welcome Reception,Rooftop,Drinks and snacks,
06/17/2024,04:30 PM,04:45 PM,Sub-session,Toast,Rooftop,Opening toast,John Smith
";

fn write_agenda(dir: &Path) -> PathBuf {
    let path = dir.join("agenda.csv");
    std::fs::write(&path, AGENDA_CSV).unwrap();
    path
}

fn imported_store() -> (TempDir, SqliteStore) {
    let dir = tempfile::tempdir().unwrap();
    let source = write_agenda(dir.path());
    let store = SqliteStore::open(&dir.path().join("agenda.db")).unwrap();

    let report = Importer::new(&store, ImportOptions { header_rows: 2, normalize_times: true })
        .import_file(&source)
        .unwrap();

    assert_eq!(report.sessions, 3);
    assert_eq!(report.sub_sessions, 3);
    assert_eq!(report.promoted, 1);
    assert_eq!(report.skipped_orphans, 1);
    assert_eq!(report.skipped_empty, 2);
    assert_eq!(report.speakers_created, 3);

    (dir, store)
}

fn titles(results: &[agenda::SessionMatch]) -> Vec<&str> {
    results.iter().map(|r| r.session.title.as_str()).collect()
}

#[test]
fn test_hierarchy_is_two_levels() {
    let (_dir, store) = imported_store();
    let sessions = store.sessions().unwrap();

    assert!(sessions.iter().all(|s| s.title != "Stray Breakout"));
    for session in sessions.iter().filter(|s| s.kind() == SessionKind::SubSession) {
        let parent = store.get_session(session.parent_id.unwrap()).unwrap().unwrap();
        assert!(parent.is_top_level(), "{} nests under a sub-session", session.title);
    }

    let toast = sessions.iter().find(|s| s.title == "Toast").unwrap();
    let reception = sessions.iter().find(|s| s.title == "Welcome Reception").unwrap();
    assert_eq!(toast.parent_id, Some(reception.id));
}

#[test]
fn test_lookup_by_date_is_exact() {
    let (_dir, store) = imported_store();
    let engine = LookupEngine::new(&store);

    let results = engine.find(LookupColumn::Date, "2024-06-17").unwrap();
    assert_eq!(titles(&results), vec!["Welcome Reception", "Toast"]);

    assert!(engine.find(LookupColumn::Date, "2024-06").unwrap().is_empty());
    assert!(engine.find(LookupColumn::Date, "06/17/2024").unwrap().is_empty());
}

#[test]
fn test_lookup_by_start_time() {
    let (_dir, store) = imported_store();
    let engine = LookupEngine::new(&store);

    let results = engine.find(LookupColumn::TimeStart, "2024-06-18 11:30").unwrap();
    assert_eq!(titles(&results), vec!["Storage Engines", "Compaction Lab"]);
}

#[test]
fn test_lookup_by_title_expands_children() {
    let (_dir, store) = imported_store();
    let engine = LookupEngine::new(&store);

    let results = engine.find(LookupColumn::Title, "OPENING keynote").unwrap();
    assert_eq!(titles(&results), vec!["Opening Keynote", "Keynote Q&A"]);
    assert_eq!(results[0].speakers_label(), "Jane Doe; John Smith");
    assert_eq!(results[1].speakers_label(), "N/A");
}

#[test]
fn test_lookup_by_speaker() {
    let (_dir, store) = imported_store();
    let engine = LookupEngine::new(&store);

    let results = engine.find(LookupColumn::Speaker, "jane doe").unwrap();
    assert_eq!(
        titles(&results),
        vec!["Opening Keynote", "Keynote Q&A", "Compaction Lab"]
    );

    // Toast is a sub-session: its parent is not pulled in
    let results = engine.find(LookupColumn::Speaker, "smith").unwrap();
    assert_eq!(
        titles(&results),
        vec!["Toast", "Opening Keynote", "Keynote Q&A"]
    );

    // The orphan row's speaker was never created
    assert!(engine.find(LookupColumn::Speaker, "ghost").unwrap().is_empty());
}

#[test]
fn test_missing_source_leaves_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteStore::open(&dir.path().join("agenda.db")).unwrap();

    let err = Importer::new(&store, ImportOptions::default())
        .import_file(&dir.path().join("missing.xls"))
        .unwrap_err();

    assert!(err.is_source_error());
    assert!(store.sessions().unwrap().is_empty());
}

#[test]
fn test_cli_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_agenda(dir.path());
    let database = dir.path().join("agenda.db");

    let status = Command::new(env!("CARGO_BIN_EXE_import_agenda"))
        .arg(&source)
        .args(["--header-rows", "2", "--database"])
        .arg(&database)
        .current_dir(dir.path())
        .output()
        .unwrap();
    assert!(status.status.success());
    let stdout = String::from_utf8_lossy(&status.stdout);
    assert!(stdout.contains("Agenda import completed successfully."));

    let output = Command::new(env!("CARGO_BIN_EXE_lookup_agenda"))
        .args(["location", "room 2", "--database"])
        .arg(&database)
        .current_dir(dir.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Looking up sessions where location = 'room 2'..."));
    assert!(stdout.contains("Title: Storage Engines"));
    assert!(stdout.contains("Title: Compaction Lab"));
    assert!(!stdout.contains("Title: Opening Keynote"));
}

#[test]
fn test_cli_usage_errors_exit_one() {
    let dir = tempfile::tempdir().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_lookup_agenda"))
        .args(["room", "2"])
        .current_dir(dir.path())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    // rejected before any database is created
    assert!(!dir.path().join("agenda.db").exists());

    let output = Command::new(env!("CARGO_BIN_EXE_lookup_agenda"))
        .arg("title")
        .current_dir(dir.path())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let output = Command::new(env!("CARGO_BIN_EXE_import_agenda"))
        .current_dir(dir.path())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_cli_missing_source_is_not_fatal() {
    let dir = tempfile::tempdir().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_import_agenda"))
        .arg("nope.xls")
        .current_dir(dir.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("not found"));
    assert!(dir.path().join("agenda.db").exists());

    // a path starting with '-' is still the source path
    let output = Command::new(env!("CARGO_BIN_EXE_import_agenda"))
        .arg("-missing.csv")
        .current_dir(dir.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("-missing.csv"));
}

#[test]
fn test_cli_lookup_value_may_start_with_hyphen() {
    let dir = tempfile::tempdir().unwrap();
    let database = dir.path().join("agenda.db");
    let store = SqliteStore::open(&database).unwrap();
    store
        .insert_session(&NewSession::new("Session", "Ask Me Anything -v session --x"))
        .unwrap();
    store.close().unwrap();

    for value in ["-v session", "--x"] {
        let output = Command::new(env!("CARGO_BIN_EXE_lookup_agenda"))
            .args(["title", value, "--database"])
            .arg(&database)
            .current_dir(dir.path())
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(0), "lookup of {:?} failed", value);
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("Title: Ask Me Anything -v session --x"));
    }
}
