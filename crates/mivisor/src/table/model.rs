//! Table model over the imported dataset.

use std::fmt;

use tracing::debug;

use crate::error::Result;
use crate::input::{CellValue, Dataset};
use crate::schema::ColumnSummary;

/// Structural change notifications for views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEvent {
    /// The dataset was replaced.
    Reset { rows: usize, columns: usize },
    /// A column was inserted at `index`.
    ColumnInserted { index: usize, name: String },
}

type Listener = Box<dyn FnMut(&TableEvent)>;

/// Exposes a dataset to a table view.
///
/// With a preview limit, row counts and cell access are restricted to the
/// first rows for display, while summaries and date checks always use the
/// full data.
pub struct TableModel {
    dataset: Dataset,
    preview_limit: Option<usize>,
    listeners: Vec<Listener>,
}

impl TableModel {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            dataset,
            preview_limit: None,
            listeners: Vec::new(),
        }
    }

    /// Show only the first `rows` rows.
    pub fn with_preview_limit(mut self, rows: usize) -> Self {
        self.preview_limit = Some(rows);
        self
    }

    pub fn preview_limit(&self) -> Option<usize> {
        self.preview_limit
    }

    /// Register a listener for structural changes.
    pub fn subscribe(&mut self, listener: impl FnMut(&TableEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn notify(&mut self, event: TableEvent) {
        debug!(?event, "table changed");
        for listener in self.listeners.iter_mut() {
            listener(&event);
        }
    }

    /// Replace the underlying dataset.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.dataset = dataset;
        let event = TableEvent::Reset {
            rows: self.row_count(),
            columns: self.column_count(),
        };
        self.notify(event);
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn into_dataset(self) -> Dataset {
        self.dataset
    }

    /// Number of displayed rows.
    pub fn row_count(&self) -> usize {
        let total = self.dataset.row_count();
        self.preview_limit.map_or(total, |limit| total.min(limit))
    }

    /// Number of rows in the full dataset.
    pub fn total_row_count(&self) -> usize {
        self.dataset.row_count()
    }

    pub fn column_count(&self) -> usize {
        self.dataset.column_count()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.dataset.column_names()
    }

    pub fn header(&self, col: usize) -> Option<&str> {
        self.dataset.columns().get(col).map(|c| c.name.as_str())
    }

    /// Display string for a cell; rows outside the preview render empty.
    pub fn cell_display(&self, row: usize, col: usize) -> String {
        if row >= self.row_count() {
            return String::new();
        }
        self.dataset.cell_display(row, col)
    }

    /// Summarize a column over the full dataset.
    pub fn summarize(&self, column: &str) -> Result<ColumnSummary> {
        self.dataset.summarize(column)
    }

    /// See [`Dataset::is_date_column`]. Checks every row.
    pub fn is_date_column(&self, column: &str) -> bool {
        self.dataset.is_date_column(column)
    }

    /// Insert a column right after `after` and notify listeners.
    pub fn insert_derived_column(
        &mut self,
        after: &str,
        name: &str,
        values: Vec<CellValue>,
    ) -> Result<usize> {
        let index = self.dataset.insert_column_after(after, name, values)?;
        self.notify(TableEvent::ColumnInserted {
            index,
            name: name.to_string(),
        });
        Ok(index)
    }
}

impl Default for TableModel {
    fn default() -> Self {
        Self::new(Dataset::default())
    }
}

impl fmt::Debug for TableModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableModel")
            .field("rows", &self.dataset.row_count())
            .field("columns", &self.dataset.column_count())
            .field("preview_limit", &self.preview_limit)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
