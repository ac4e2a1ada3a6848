//! Integration tests for dataset import and the project session workflow.

use std::fs;
use std::io::Write;
use std::path::Path;

use rust_xlsxwriter::{ExcelDateTime, Format, Workbook, XlsxError};
use tempfile::{NamedTempFile, TempDir};

use mivisor::input::workbook;
use mivisor::{
    CellValue, ColumnRole, ColumnType, DrugEntry, DrugRegistry, ImportRequest, ImportWorker,
    MivisorError, ProjectConfig, ProjectSession, RegistryStore, SessionSettings,
};

/// Helper to create a temporary CSV file with given content.
fn create_csv(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(".csv").expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write to temp file");
    file
}

/// Write a small isolate workbook with a real date column.
fn write_isolates(path: &Path) -> Result<(), XlsxError> {
    let mut book = Workbook::new();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");

    let sheet = book.add_worksheet();
    sheet.set_name("Isolates")?;
    for (col, header) in ["HN", "Received", "Organism", "AMP", "GEN"].iter().enumerate() {
        sheet.write_string(0, col as u16, *header)?;
    }

    let rows = [
        ("H001", 14, "E.coli", "R", "S"),
        ("H002", 15, "E.coli", "S", "S"),
        ("H003", 16, "Klebsiella", "R", "I"),
    ];
    for (i, (hn, day, organism, amp, gentamicin)) in rows.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_string(row, 0, *hn)?;
        sheet.write_datetime_with_format(
            row,
            1,
            &ExcelDateTime::from_ymd(2023, 7, *day)?,
            &date_format,
        )?;
        sheet.write_string(row, 2, *organism)?;
        sheet.write_string(row, 3, *amp)?;
        sheet.write_string(row, 4, *gentamicin)?;
    }

    let notes = book.add_worksheet();
    notes.set_name("Notes")?;
    notes.write_string(0, 0, "comment")?;

    book.save(path)
}

fn drug_registry(dir: &Path) {
    let mut drugs = DrugRegistry::new();
    drugs
        .add("Penicillins", DrugEntry::new("Ampicillin", ["AMP", "AM"]))
        .unwrap();
    drugs
        .add("Aminoglycosides", DrugEntry::new("Gentamicin", ["GEN", "GM"]))
        .unwrap();
    RegistryStore::new(dir).save_drugs(&drugs).unwrap();
}

// =============================================================================
// Workbook Import
// =============================================================================

#[test]
fn test_workbook_sheets_and_dates() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("isolates.xlsx");
    write_isolates(&path).unwrap();

    assert_eq!(workbook::sheet_names(&path).unwrap(), vec!["Isolates", "Notes"]);

    let dataset = workbook::read_sheet(&path, "Isolates").unwrap();
    assert_eq!(dataset.row_count(), 3);
    assert_eq!(
        dataset.column_names(),
        vec!["HN", "Received", "Organism", "AMP", "GEN"]
    );
    assert!(dataset.is_date_column("Received"));
    assert!(!dataset.is_date_column("HN"));
    assert_eq!(dataset.column_type("Received"), Some(ColumnType::DateTime));
    assert_eq!(dataset.cell_display(0, 1), "2023-07-14");

    let source = dataset.source().unwrap();
    assert_eq!(source.sheet.as_deref(), Some("Isolates"));
    assert_eq!(source.format, "xlsx");
    assert_eq!(source.row_count, 3);
}

#[test]
fn test_unknown_sheet_is_sheet_read_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("isolates.xlsx");
    write_isolates(&path).unwrap();

    let err = workbook::read_sheet(&path, "2024").unwrap_err();
    assert!(matches!(err, MivisorError::SheetRead { .. }));
}

#[test]
fn test_corrupt_workbook_is_workbook_open_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.xlsx");
    fs::write(&path, b"not a zip archive").unwrap();

    let err = workbook::sheet_names(&path).unwrap_err();
    assert!(matches!(err, MivisorError::WorkbookOpen { .. }));
}

// =============================================================================
// Delimited Import
// =============================================================================

#[test]
fn test_date_like_text_is_not_a_date_column() {
    let file = create_csv("HN,Received,MIC\nH001,2023-07-14,0.5\nH002,2023-07-15,2\n");
    let dataset = mivisor::input::read_delimited(file.path()).unwrap();

    assert!(!dataset.is_date_column("Received"));
    assert_eq!(dataset.column_type("MIC"), Some(ColumnType::Float));
    assert_eq!(dataset.get(1, 2), Some(&CellValue::Integer(2)));
}

#[test]
fn test_headers_are_normalized() {
    let file = create_csv("AMP,,AMP\nR,1,S\n");
    let dataset = mivisor::input::read_delimited(file.path()).unwrap();
    assert_eq!(dataset.column_names(), vec!["AMP", "Unnamed: 1", "AMP.1"]);
}

// =============================================================================
// Import Worker
// =============================================================================

#[test]
fn test_second_import_rejected_while_in_flight() {
    let file = create_csv("Organism\nE.coli\n");
    let mut worker = ImportWorker::new();

    worker
        .submit(ImportRequest::for_path(file.path(), None).unwrap())
        .unwrap();
    let err = worker
        .submit(ImportRequest::for_path(file.path(), None).unwrap())
        .unwrap_err();
    assert!(matches!(err, MivisorError::ImportInProgress));

    let outcome = worker.wait().unwrap();
    assert_eq!(outcome.result.unwrap().row_count(), 1);
    worker
        .submit(ImportRequest::for_path(file.path(), None).unwrap())
        .unwrap();
}

#[test]
fn test_workbook_request_needs_sheet() {
    assert!(ImportRequest::for_path("isolates.xlsx", None).is_err());
    assert!(matches!(
        ImportRequest::for_path("isolates.csv", None).unwrap(),
        ImportRequest::Delimited { .. }
    ));
}

// =============================================================================
// Session Workflow
// =============================================================================

#[test]
fn test_session_import_group_export_reopen() {
    let dir = TempDir::new().unwrap();
    drug_registry(dir.path());
    let book = dir.path().join("isolates.xlsx");
    write_isolates(&book).unwrap();

    let project = dir.path().join("ward");
    let settings = SessionSettings::default().with_registry_dir(dir.path());
    let mut session = ProjectSession::create(&project, "Ward", settings.clone()).unwrap();

    let request = ImportRequest::for_path(&book, Some("Isolates")).unwrap();
    let profiles = session.import(request).unwrap();
    let drugs: Vec<&str> = profiles
        .iter()
        .filter(|p| p.drug)
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(drugs, vec!["AMP", "GEN"]);
    assert!(profiles.iter().all(|p| p.keep));

    session
        .toggle_role("Received", ColumnRole::Date, true)
        .unwrap();
    session
        .toggle_role("Organism", ColumnRole::Organism, true)
        .unwrap();
    session.toggle_role("HN", ColumnRole::Key, true).unwrap();

    let grouping = session.begin_grouping("Organism").unwrap();
    grouping.assign("E.coli", "GramNeg").unwrap();
    session.commit_grouping("Gram", Some("Other")).unwrap();

    let export = dir.path().join("export.csv");
    session.export_dataset(&export).unwrap();
    session.save_profile().unwrap();

    let exported = fs::read_to_string(&export).unwrap();
    let mut lines = exported.lines();
    assert_eq!(lines.next(), Some("HN,Received,Organism,Gram,AMP,GEN"));
    assert_eq!(lines.next(), Some("H001,2023-07-14,E.coli,GramNeg,R,S"));
    assert!(exported.contains("H003,2023-07-16,Klebsiella,Other,R,I"));

    let config = ProjectConfig::load(&project).unwrap();
    assert_eq!(config.organism_column.as_deref(), Some("Organism"));
    assert!(config.date_columns.contains("Received"));
    assert!(config.keep_columns.contains("Gram"));

    // Reopening reuses the stored roles instead of the defaults.
    let mut reopened = ProjectSession::open(&project, settings).unwrap();
    let request = ImportRequest::for_path(&book, Some("Isolates")).unwrap();
    let profiles = reopened.import(request).unwrap();
    let received = profiles.iter().find(|p| p.name == "Received").unwrap();
    assert!(received.date);
    assert!(profiles.iter().find(|p| p.name == "HN").unwrap().key);
}

#[test]
fn test_open_without_config_is_fatal() {
    let dir = TempDir::new().unwrap();
    let err = ProjectSession::open(dir.path(), SessionSettings::default()).unwrap_err();
    assert!(matches!(err, MivisorError::MissingConfig { .. }));
    assert!(err.is_fatal());
}
