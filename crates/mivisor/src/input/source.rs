//! Imported dataset and its source metadata.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{MivisorError, Result};
use crate::inference::summarize_cells;
use crate::schema::{ColumnSummary, ColumnType};

use super::cell::CellValue;

/// Metadata about the imported file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// Worksheet the data came from (workbooks only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet: Option<String>,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Detected format (xlsx, csv, tsv, etc.).
    pub format: String,
    /// Number of data rows (excluding header).
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
    /// When the import happened.
    pub imported_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Create metadata for a file that has been imported.
    pub fn new(
        path: PathBuf,
        hash: String,
        size_bytes: u64,
        format: String,
        row_count: usize,
        column_count: usize,
    ) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            file,
            path,
            sheet: None,
            hash,
            size_bytes,
            format,
            row_count,
            column_count,
            imported_at: Utc::now(),
        }
    }

    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = Some(sheet.into());
        self
    }
}

/// A named column of cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub cells: Vec<CellValue>,
}

impl Column {
    pub fn new(name: impl Into<String>, cells: Vec<CellValue>) -> Self {
        Self {
            name: name.into(),
            cells,
        }
    }

    /// Storage type of the column.
    pub fn dtype(&self) -> ColumnType {
        ColumnType::infer(&self.cells)
    }
}

/// Tabular data held column-major.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    columns: Vec<Column>,
    row_count: usize,
    source: Option<SourceMetadata>,
}

impl Dataset {
    /// Build a dataset from a header row and data rows.
    ///
    /// Short rows are padded with empty cells, extra cells are dropped.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Result<Self> {
        let mut columns: Vec<Column> = headers
            .into_iter()
            .map(|name| Column::new(name, Vec::with_capacity(rows.len())))
            .collect();
        let row_count = rows.len();

        for row in rows {
            let mut cells = row.into_iter();
            for column in columns.iter_mut() {
                column.cells.push(cells.next().unwrap_or(CellValue::Empty));
            }
        }

        Self::from_columns(columns).map(|mut ds| {
            ds.row_count = row_count;
            ds
        })
    }

    /// Build a dataset from columns. All columns must have the same length
    /// and distinct names.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self> {
        let row_count = columns.first().map(|c| c.cells.len()).unwrap_or(0);

        for (i, column) in columns.iter().enumerate() {
            if column.cells.len() != row_count {
                return Err(MivisorError::Validation(format!(
                    "column '{}' has {} values, expected {}",
                    column.name,
                    column.cells.len(),
                    row_count
                )));
            }
            if columns[..i].iter().any(|c| c.name == column.name) {
                return Err(MivisorError::DuplicateColumn(column.name.clone()));
            }
        }

        Ok(Self {
            columns,
            row_count,
            source: None,
        })
    }

    pub fn with_source(mut self, source: SourceMetadata) -> Self {
        self.source = Some(source);
        self
    }

    pub fn source(&self) -> Option<&SourceMetadata> {
        self.source.as_ref()
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Get the number of rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Column names in display order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    fn require_column(&self, name: &str) -> Result<&Column> {
        self.column(name)
            .ok_or_else(|| MivisorError::ColumnNotFound(name.to_string()))
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.columns.get(col).and_then(|c| c.cells.get(row))
    }

    /// Display string for a cell; out-of-range cells render empty.
    pub fn cell_display(&self, row: usize, col: usize) -> String {
        self.get(row, col).map(|c| c.to_string()).unwrap_or_default()
    }

    /// Storage type of the named column.
    pub fn column_type(&self, name: &str) -> Option<ColumnType> {
        self.column(name).map(Column::dtype)
    }

    /// True only if every non-null value is a date/time cell and there is at
    /// least one such value. Unknown columns are never date columns.
    pub fn is_date_column(&self, name: &str) -> bool {
        let Some(column) = self.column(name) else {
            return false;
        };
        let mut seen = false;
        for cell in column.cells.iter().filter(|c| !c.is_null()) {
            if !matches!(cell, CellValue::DateTime(_)) {
                return false;
            }
            seen = true;
        }
        seen
    }

    /// Summarize the named column over all of its rows.
    pub fn summarize(&self, name: &str) -> Result<ColumnSummary> {
        let column = self.require_column(name)?;
        Ok(summarize_cells(&column.name, column.dtype(), &column.cells))
    }

    /// Insert a column immediately to the right of `after`.
    ///
    /// Returns the position of the new column.
    pub fn insert_column_after(
        &mut self,
        after: &str,
        name: &str,
        values: Vec<CellValue>,
    ) -> Result<usize> {
        if self.column(name).is_some() {
            return Err(MivisorError::DuplicateColumn(name.to_string()));
        }
        let index = self
            .column_index(after)
            .ok_or_else(|| MivisorError::ColumnNotFound(after.to_string()))?;
        if values.len() != self.row_count {
            return Err(MivisorError::Validation(format!(
                "derived column '{}' has {} values, expected {}",
                name,
                values.len(),
                self.row_count
            )));
        }

        self.columns.insert(index + 1, Column::new(name, values));
        Ok(index + 1)
    }

    /// Write the dataset as CSV using display strings.
    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut writer = csv::Writer::from_path(path)?;

        writer.write_record(self.columns.iter().map(|c| c.name.as_str()))?;
        for row in 0..self.row_count {
            writer.write_record((0..self.columns.len()).map(|col| self.cell_display(row, col)))?;
        }
        writer.flush().map_err(|e| MivisorError::io(path, e))?;

        Ok(())
    }
}
