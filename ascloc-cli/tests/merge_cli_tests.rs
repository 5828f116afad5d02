use rust_xlsxwriter::Workbook;
use serde_json::{Value, json};
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn ascloc_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("ascloc"));
    cmd.current_dir(dir);
    cmd
}

fn write_snapshot(dir: &Path) -> std::path::PathBuf {
    let snapshot = dir.join("version_localizations.json");
    let body = json!({"data": [
        {"type": "appStoreVersionLocalizations", "id": "a1", "attributes": {"locale": "en-US", "whatsNew": "Old"}},
        {"type": "appStoreVersionLocalizations", "id": "a2", "attributes": {"locale": "fr-FR", "whatsNew": "Ancien"}}
    ]});
    fs::write(&snapshot, serde_json::to_string_pretty(&body).unwrap()).unwrap();
    snapshot
}

#[test]
fn test_merge_command_reads_default_workbook() {
    let temp_dir = TempDir::new().unwrap();
    let snapshot = write_snapshot(temp_dir.path());
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    let rows = [
        ["locale", "promotionalText", "whatsNew"],
        ["fr-FR", "", "Corrections de bogues"],
        ["de-DE", "Neu", "Fehlerbehebungen"],
    ];
    for (r, row) in rows.iter().enumerate() {
        for (c, text) in row.iter().enumerate() {
            if !text.is_empty() {
                sheet.write_string(r as u32, c as u16, *text).unwrap();
            }
        }
    }
    workbook.save(temp_dir.path().join("TestLocalization.xlsx")).unwrap();

    let output = ascloc_cmd(temp_dir.path())
        .args(["merge", "--server", snapshot.to_str().unwrap()])
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "CLI failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("1 matched, 1 unmatched"));
    assert!(stdout.contains("row 2: no server localization for locale de-DE"));

    let merged = fs::read_to_string(temp_dir.path().join("merged_file.json")).unwrap();
    assert!(merged.starts_with("{\n    \"data\": ["));
    let merged: Value = serde_json::from_str(&merged).unwrap();
    assert_eq!(
        merged,
        json!({"data": [
            {"id": "a2", "type": "appStoreVersionLocalizations", "attributes": {"whatsNew": "Corrections de bogues"}},
            {"type": "appStoreVersionLocalizations", "attributes": {"promotionalText": "Neu", "whatsNew": "Fehlerbehebungen"}}
        ]})
    );
}

#[test]
fn test_merge_command_event_kind_with_explicit_paths() {
    let temp_dir = TempDir::new().unwrap();
    let snapshot = temp_dir.path().join("event_localizations.json");
    fs::write(
        &snapshot,
        json!({"data": [
            {"type": "appEventLocalizations", "id": "e1", "attributes": {"locale": "ja"}}
        ]})
        .to_string(),
    )
    .unwrap();
    let sheet = temp_dir.path().join("events.tsv");
    fs::write(&sheet, "locale\tname\tshort\tlong\nja\t夏祭り\t参加しよう\t\n").unwrap();
    let merged_file = temp_dir.path().join("out/merged.json");
    fs::create_dir_all(merged_file.parent().unwrap()).unwrap();

    let output = ascloc_cmd(temp_dir.path())
        .args([
            "merge",
            "--kind",
            "event",
            "--server",
            snapshot.to_str().unwrap(),
            "--input",
            sheet.to_str().unwrap(),
            "--merged-file",
            merged_file.to_str().unwrap(),
        ])
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "CLI failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let written = fs::read_to_string(&merged_file).unwrap();
    assert!(written.contains("夏祭り"));
    let merged: Value = serde_json::from_str(&written).unwrap();
    assert_eq!(
        merged["data"][0],
        json!({
            "id": "e1",
            "type": "appEventLocalizations",
            "attributes": {"name": "夏祭り", "shortDescription": "参加しよう"}
        })
    );
}

#[test]
fn test_merge_command_missing_spreadsheet_fails() {
    let temp_dir = TempDir::new().unwrap();
    let snapshot = write_snapshot(temp_dir.path());

    let output = ascloc_cmd(temp_dir.path())
        .args(["merge", "--server", snapshot.to_str().unwrap()])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("file not found: TestLocalization.xlsx"));
    assert!(!temp_dir.path().join("merged_file.json").exists());
}

#[test]
fn test_merge_command_rejects_duplicate_locale() {
    let temp_dir = TempDir::new().unwrap();
    let snapshot = write_snapshot(temp_dir.path());
    fs::write(
        temp_dir.path().join("TestLocalization.csv"),
        "locale,whatsNew\nen-US,One\nen-US,Two\n",
    )
    .unwrap();

    let output = ascloc_cmd(temp_dir.path())
        .args(["merge", "--server", snapshot.to_str().unwrap(), "-i", "TestLocalization.csv"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("duplicate locale `en-US`"));
}

#[test]
fn test_merge_command_invalid_snapshot_fails() {
    let temp_dir = TempDir::new().unwrap();
    let snapshot = temp_dir.path().join("broken.json");
    fs::write(&snapshot, "not json").unwrap();
    fs::write(temp_dir.path().join("TestLocalization.csv"), "locale,whatsNew\nen-US,A\n").unwrap();

    let output = ascloc_cmd(temp_dir.path())
        .args(["merge", "--server", snapshot.to_str().unwrap(), "-i", "TestLocalization.csv"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to read snapshot"));
}
