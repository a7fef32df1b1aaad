//! On-disk tests: import and rename through `FsVault`.

use assert_fs::prelude::*;
use chrono::{NaiveDate, NaiveDateTime};
use predicates::prelude::*;

use notedrop::config::Config;
use notedrop::error::NotedropError;
use notedrop::intake::{guard, Intake};
use notedrop::notify::RecordingNotifier;
use notedrop::rename::rename_by_created;
use notedrop::template::STARTER_TEMPLATE;
use notedrop::vault::FsVault;

fn fixed_now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 5)
        .and_then(|d| d.and_hms_opt(18, 30, 0))
        .unwrap()
}

fn fixed_id() -> String {
    "cafe0001".to_string()
}

fn vault_dir() -> assert_fs::TempDir {
    let temp = assert_fs::TempDir::new().unwrap();
    for folder in ["_input", "_unsortiert/_files", "_templates"] {
        temp.child(folder).create_dir_all().unwrap();
    }
    temp
}

#[test]
fn test_import_on_disk() {
    let temp = vault_dir();
    temp.child("_input/hello.eml")
        .write_binary(include_bytes!("fixtures/hello.eml"))
        .unwrap();
    temp.child("_input/photo.jpg").write_binary(b"\xFF\xD8").unwrap();
    temp.child("_input/archive").create_dir_all().unwrap();
    temp.child("_templates/import.md")
        .write_str("imported: %date%\n")
        .unwrap();

    let vault = FsVault::open(temp.path()).unwrap();
    let mut config = Config::default();
    config.template.enabled = true;
    let notifier = RecordingNotifier::new();
    let report = Intake::new(&vault, &config, &notifier)
        .with_clock(fixed_now)
        .with_id_source(fixed_id)
        .run(None)
        .unwrap();

    assert_eq!(report.processed, 2);
    assert_eq!(report.skipped, 1);

    temp.child("_unsortiert/2024-03-05 hello.md")
        .assert(predicate::str::starts_with("imported: 2024-03-05 18:30\n\n# Hello"))
        .assert(predicate::str::contains("![[_unsortiert/_files/cafe0001_a.pdf]]"));
    temp.child("_unsortiert/2024-03-05 photo.md").assert(
        "imported: 2024-03-05 18:30\n\n![[_unsortiert/_files/cafe0001_photo.jpg]]\n",
    );
    temp.child("_unsortiert/_files/cafe0001_photo.jpg")
        .assert(predicate::path::is_file());
    temp.child("_unsortiert/_files/cafe0001_b")
        .assert(predicate::path::missing());
    temp.child("_input/hello.eml").assert(predicate::path::missing());
    temp.child("_input/photo.jpg").assert(predicate::path::missing());
    temp.child("_input/archive").assert(predicate::path::is_dir());
}

#[test]
fn test_rename_on_disk() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("notes/Meeting.md")
        .write_str("---\ncreated: 20.08.2023\n---\n# Meeting\n")
        .unwrap();

    let vault = FsVault::open(temp.path()).unwrap();
    let plan = rename_by_created(&vault, "notes/Meeting.md").unwrap();

    assert_eq!(plan.to, "notes/2023-08-20 Meeting.md");
    temp.child("notes/Meeting.md").assert(predicate::path::missing());
    temp.child("notes/2023-08-20 Meeting.md")
        .assert(predicate::str::contains("# Meeting"));
}

#[test]
fn test_rename_without_frontmatter_on_disk() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("Plain.md").write_str("# Plain\n").unwrap();

    let vault = FsVault::open(temp.path()).unwrap();
    let err = rename_by_created(&vault, "Plain.md").unwrap_err();

    assert!(matches!(err, NotedropError::NoFrontmatter(_)));
    temp.child("Plain.md").assert(predicate::path::exists());
}

#[test]
fn test_vault_path_of_file_on_disk() {
    let temp = assert_fs::TempDir::new().unwrap();
    let note = temp.child("notes/Meeting.md");
    note.write_str("# Meeting\n").unwrap();

    let vault = FsVault::open(temp.path()).unwrap();
    assert_eq!(vault.vault_path(note.path()), "notes/Meeting.md");
    assert_eq!(
        vault.vault_path(std::path::Path::new("notes/Missing.md")),
        "notes/Missing.md"
    );
}

#[test]
fn test_rename_through_absolute_path() {
    let temp = assert_fs::TempDir::new().unwrap();
    let note = temp.child("notes/Meeting.md");
    note.write_str("---\ncreated: 2023-08-20\n---\n").unwrap();

    let vault = FsVault::open(temp.path()).unwrap();
    let plan = rename_by_created(&vault, &vault.vault_path(note.path())).unwrap();

    assert_eq!(plan.to, "notes/2023-08-20 Meeting.md");
    temp.child("notes/2023-08-20 Meeting.md")
        .assert(predicate::path::is_file());
}

#[test]
fn test_prepare_vault_on_disk() {
    let temp = assert_fs::TempDir::new().unwrap();
    let vault = FsVault::open(temp.path()).unwrap();
    let mut config = Config::default();
    config.template.enabled = true;
    let notifier = RecordingNotifier::new();

    guard::prepare_vault(&vault, &config, &notifier).unwrap();

    for folder in ["_input", "_unsortiert", "_unsortiert/_files", "_templates"] {
        temp.child(folder).assert(predicate::path::is_dir());
    }
    temp.child("_templates/import.md").assert(STARTER_TEMPLATE);
    assert!(guard::check_folders(&vault, &config).is_ok());
}

#[cfg(unix)]
#[test]
fn test_dangling_link_is_skipped() {
    let temp = vault_dir();
    std::os::unix::fs::symlink(temp.path().join("gone.pdf"), temp.path().join("_input/link.pdf"))
        .unwrap();
    temp.child("_input/scan.pdf").write_binary(b"%PDF").unwrap();

    let vault = FsVault::open(temp.path()).unwrap();
    let notifier = RecordingNotifier::new();
    let report = Intake::new(&vault, &Config::default(), &notifier)
        .with_clock(fixed_now)
        .with_id_source(fixed_id)
        .run(None)
        .unwrap();

    assert_eq!(report.processed, 1);
    assert_eq!(report.skipped, 1);
    assert!(report.failures.is_empty());
}
