//! Spreadsheet workbooks (xlsx, xlsm, xlsb, xls, ods).

use std::fs;
use std::path::Path;

use calamine::{open_workbook_auto, Data, DataType, Reader};
use tracing::info;

use super::cell::CellValue;
use super::parser::{hash_bytes, normalize_headers};
use super::source::{Dataset, SourceMetadata};
use crate::error::{MivisorError, Result};

/// File extensions handled by the workbook reader.
pub const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Whether the path looks like a spreadsheet workbook.
pub fn is_workbook(path: impl AsRef<Path>) -> bool {
    path.as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            WORKBOOK_EXTENSIONS
                .iter()
                .any(|w| w.eq_ignore_ascii_case(ext))
        })
}

/// List the worksheet names of a workbook.
pub fn sheet_names(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let workbook = open_workbook_auto(path).map_err(|e| MivisorError::WorkbookOpen {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(workbook.sheet_names())
}

/// Read one worksheet into a dataset. The first row is the header.
pub fn read_sheet(path: impl AsRef<Path>, sheet: &str) -> Result<Dataset> {
    let path = path.as_ref();
    let sheet_error = |message: String| MivisorError::SheetRead {
        sheet: sheet.to_string(),
        message,
    };

    let mut workbook = open_workbook_auto(path).map_err(|e| MivisorError::WorkbookOpen {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    if !workbook.sheet_names().iter().any(|s| s == sheet) {
        return Err(sheet_error("no such worksheet".to_string()));
    }

    let range = workbook
        .worksheet_range(sheet)
        .map_err(|e| sheet_error(e.to_string()))?;

    let mut rows = range.rows();
    let headers = match rows.next() {
        Some(header_row) => normalize_headers(header_row.iter().map(header_text)),
        None => return Err(sheet_error("worksheet is empty".to_string())),
    };
    let body: Vec<Vec<CellValue>> = rows
        .map(|row| row.iter().map(cell_value).collect())
        .collect();

    let dataset = Dataset::from_rows(headers, body).map_err(|e| sheet_error(e.to_string()))?;

    let contents = fs::read(path).map_err(|e| MivisorError::io(path, e))?;
    let format = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_else(|| "workbook".to_string());
    let source = SourceMetadata::new(
        path.to_path_buf(),
        hash_bytes(&contents),
        contents.len() as u64,
        format,
        dataset.row_count(),
        dataset.column_count(),
    )
    .with_sheet(sheet);

    info!(
        file = %source.file,
        sheet,
        rows = source.row_count,
        columns = source.column_count,
        "read worksheet"
    );

    Ok(dataset.with_source(source))
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => cell_value(other).to_string(),
    }
}

/// Convert a spreadsheet cell, keeping date cells typed.
fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Boolean(*b),
        Data::DateTime(dt) if dt.is_datetime() => cell
            .as_datetime()
            .map(CellValue::DateTime)
            .unwrap_or_else(|| CellValue::Float(dt.as_f64())),
        // Durations keep their serial value in days.
        Data::DateTime(dt) => CellValue::Float(dt.as_f64()),
        Data::DateTimeIso(s) => cell
            .as_datetime()
            .map(CellValue::DateTime)
            .unwrap_or_else(|| CellValue::Text(s.clone())),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(format!("#{e:?}")),
    }
}
