use pretty_assertions::assert_eq;
use procset::service::{NotificationLog, ProcessVariablesService, VariableValues};
use procset::store::{BackendDocument, JsonStore};
use procset::{CommitOutcome, GroupStatus, ProcessVariables, RecordField, SettingsTable, VariableKind};
use time::UtcOffset;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

const BACKEND: &str = r#"{
  // Process records, as exported from the org.
  processes: [
    { id: "a01", name: "Account Sync", active: true, group: "Nightly", handler: "AccountSyncHandler", targetObject: "Account", order: 1 },
    { id: "a02", name: "Lead Purge", active: false, group: "Nightly", handler: "LeadPurgeHandler", targetObject: "Lead", order: 2 },
    { name: "Case Export", active: true, handler: "CaseExportHandler", targetObject: "Case" },
  ],
  variables: { flag: true, timestamp: "2024-03-05T14:30:00Z" },
  labels: { flag: "Nightly Batch Enabled" },
}
"#;

#[test]
fn settings_round_trip_through_the_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("backend.json5");
    std::fs::write(&path, BACKEND)?;

    let mut store = JsonStore::new(&path);
    let mut log = NotificationLog::default();
    let mut table = SettingsTable::new();
    table.load(&mut store, &mut log)?;

    let names: Vec<&str> = table.groups().iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["Nightly", "Ungrouped"]);
    assert_eq!(table.groups()[0].status, GroupStatus::Mixed);

    table.apply_edit("a02", RecordField::Active, true)?;
    table.apply_edit("Case Export", RecordField::Order, "3")?;
    assert_eq!(
        table.commit_changes(&mut store, &mut log)?,
        CommitOutcome::Saved(2)
    );

    // A fresh controller sees what was written.
    let mut reread = SettingsTable::new();
    reread.load(&mut store, &mut log)?;
    assert_eq!(reread.groups()[0].status, GroupStatus::Active);
    assert_eq!(reread.record("Case Export").and_then(|r| r.order), Some(3));
    assert_eq!(reread.records().len(), 3);

    let text = std::fs::read_to_string(&path)?;
    assert!(text.contains("\"targetObject\": \"Lead\""));
    assert!(!text.contains("identifier"));
    Ok(())
}

#[test]
fn renaming_a_record_without_id_updates_it_in_place() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("backend.json5");
    std::fs::write(&path, BACKEND)?;

    let mut store = JsonStore::new(&path);
    let mut log = NotificationLog::default();
    let mut table = SettingsTable::new();
    table.load(&mut store, &mut log)?;

    table.apply_edit("Case Export", RecordField::Name, "Case Archive")?;
    table.commit_changes(&mut store, &mut log)?;

    let doc = store.read()?;
    let names: Vec<&str> = doc.processes.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Account Sync", "Lead Purge", "Case Archive"]);
    Ok(())
}

#[test]
fn variables_round_trip_through_the_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("backend.json5");
    std::fs::write(&path, BACKEND)?;

    let mut store = JsonStore::new(&path);
    let mut log = NotificationLog::default();
    let mut vars = ProcessVariables::new(UtcOffset::UTC);
    vars.load(&mut store, &mut log)?;
    assert_eq!(vars.flag.label, "Nightly Batch Enabled");

    vars.begin_edit(VariableKind::Flag)?;
    vars.set_flag_draft(false)?;
    vars.save(&mut store, &mut log)?;

    assert_eq!(
        store.fetch_process_variables()?,
        VariableValues {
            flag: false,
            timestamp: Some("2024-03-05T14:30:00Z".to_string()),
        }
    );
    // Records are untouched by a variables save.
    assert_eq!(store.read()?.processes.len(), 3);
    Ok(())
}

#[test]
fn missing_backend_file_is_a_fetch_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = JsonStore::new(dir.path().join("absent.json5"));
    let mut log = NotificationLog::default();
    let mut table = SettingsTable::new();

    let err = table.load(&mut store, &mut log).unwrap_err();
    assert!(err.to_string().contains("absent.json5"));
    assert!(!table.is_loaded());
    assert_eq!(log.len(), 1);
}

fn dir_names(dir: &std::path::Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        names.push(entry?.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names)
}

#[test]
fn persisting_leaves_only_the_backend_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("backend.json5");
    std::fs::write(&path, BACKEND)?;

    let mut store = JsonStore::new(&path);
    let mut log = NotificationLog::default();
    let mut table = SettingsTable::new();
    table.load(&mut store, &mut log)?;
    table.apply_edit("a01", RecordField::Order, "7")?;
    table.commit_changes(&mut store, &mut log)?;

    assert_eq!(dir_names(dir.path())?, vec!["backend.json5".to_string()]);
    assert_eq!(store.read()?.processes[0].order, Some(7));
    Ok(())
}

#[test]
fn failed_replace_cleans_up_the_temp_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    // A directory in the document's place makes the final rename fail.
    let path = dir.path().join("backend.json5");
    std::fs::create_dir(&path)?;

    let store = JsonStore::new(&path);
    let err = store.write(&BackendDocument::default()).unwrap_err();
    assert!(format!("{err:#}").contains("replacing"));
    assert_eq!(dir_names(dir.path())?, vec!["backend.json5".to_string()]);
    assert!(path.is_dir());
    Ok(())
}
