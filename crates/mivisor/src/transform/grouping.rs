//! Interactive grouping of one column's values into labels.

use indexmap::{IndexMap, IndexSet};
use tracing::{debug, info};

use crate::error::{MivisorError, Result};
use crate::input::Dataset;
use crate::project::ProjectConfig;
use crate::table::TableModel;

use super::operations::{compute_derived_column, GroupingSpec};

/// Where a grouping session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupingState {
    /// A column was chosen; no groups edited yet.
    ColumnSelected,
    /// Groups are being edited.
    Grouping,
    /// The derived column was inserted.
    Committed,
    /// The session was abandoned.
    Cancelled,
}

impl GroupingState {
    pub fn is_finished(self) -> bool {
        matches!(self, GroupingState::Committed | GroupingState::Cancelled)
    }
}

/// Grouping of a single source column.
///
/// Values are the column's distinct non-null display strings. Each value is
/// either ungrouped or assigned to exactly one group.
#[derive(Debug, Clone)]
pub struct GroupingSession {
    source_column: String,
    values: Vec<String>,
    groups: IndexSet<String>,
    assignment: IndexMap<String, String>,
    state: GroupingState,
}

impl GroupingSession {
    /// Start grouping `column`, which must be a kept dataset column.
    pub fn select(dataset: &Dataset, config: &ProjectConfig, column: &str) -> Result<Self> {
        let source = dataset
            .column(column)
            .ok_or_else(|| MivisorError::ColumnNotFound(column.to_string()))?;

        if !config.keep_columns.contains(column) {
            return Err(MivisorError::Validation(format!(
                "column '{}' is not kept and cannot be grouped",
                column
            )));
        }

        let values: IndexSet<String> = source
            .cells
            .iter()
            .filter(|cell| !cell.is_null())
            .map(ToString::to_string)
            .collect();

        debug!(column, distinct = values.len(), "selected column for grouping");
        Ok(Self {
            source_column: column.to_string(),
            values: values.into_iter().collect(),
            groups: IndexSet::new(),
            assignment: IndexMap::new(),
            state: GroupingState::ColumnSelected,
        })
    }

    pub fn source_column(&self) -> &str {
        &self.source_column
    }

    pub fn state(&self) -> GroupingState {
        self.state
    }

    /// Distinct values of the source column in first-seen order.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    fn editable(&mut self) -> Result<()> {
        if self.state.is_finished() {
            return Err(MivisorError::Validation(format!(
                "grouping of '{}' is already {:?}",
                self.source_column, self.state
            )));
        }
        self.state = GroupingState::Grouping;
        Ok(())
    }

    /// Add an empty group. Adding an existing label is a no-op.
    pub fn create_group(&mut self, label: &str) -> Result<()> {
        let label = label.trim();
        if label.is_empty() {
            return Err(MivisorError::Validation("group label is empty".to_string()));
        }
        self.editable()?;
        self.groups.insert(label.to_string());
        Ok(())
    }

    /// Put `value` into group `label`, moving it out of wherever it was.
    /// The group is created if needed.
    pub fn assign(&mut self, value: &str, label: &str) -> Result<()> {
        if !self.values.iter().any(|v| v == value) {
            return Err(MivisorError::Validation(format!(
                "'{}' is not a value of column '{}'",
                value, self.source_column
            )));
        }
        self.create_group(label)?;
        self.assignment
            .insert(value.to_string(), label.trim().to_string());
        Ok(())
    }

    /// Return `value` to the ungrouped list.
    pub fn unassign(&mut self, value: &str) -> Result<()> {
        self.editable()?;
        self.assignment.shift_remove(value);
        Ok(())
    }

    /// Delete a group, returning its values to the ungrouped list.
    pub fn remove_group(&mut self, label: &str) -> Result<()> {
        self.editable()?;
        self.groups.shift_remove(label);
        self.assignment.retain(|_, group| group.as_str() != label);
        Ok(())
    }

    /// Values not assigned to any group, in first-seen order.
    pub fn ungrouped(&self) -> Vec<&str> {
        self.values
            .iter()
            .filter(|v| !self.assignment.contains_key(v.as_str()))
            .map(String::as_str)
            .collect()
    }

    /// Groups in creation order with their values in first-seen order.
    pub fn groups(&self) -> Vec<(&str, Vec<&str>)> {
        self.groups
            .iter()
            .map(|label| {
                let members = self
                    .values
                    .iter()
                    .filter(|v| self.assignment.get(v.as_str()) == Some(label))
                    .map(String::as_str)
                    .collect();
                (label.as_str(), members)
            })
            .collect()
    }

    /// The recode the current groups describe.
    pub fn spec(&self, new_column_name: &str, default_value: Option<&str>) -> GroupingSpec {
        GroupingSpec {
            source_column: self.source_column.clone(),
            value_to_group: self
                .values
                .iter()
                .filter_map(|v| self.assignment.get(v).map(|g| (v.clone(), g.clone())))
                .collect(),
            new_column_name: new_column_name.trim().to_string(),
            default_value: default_value.map(str::to_string),
        }
    }

    /// Materialize the derived column right after the source column.
    ///
    /// Returns the index of the new column. If the name is empty or already
    /// taken the session stays open so the caller can retry with another
    /// name.
    pub fn commit(
        &mut self,
        table: &mut TableModel,
        new_column_name: &str,
        default_value: Option<&str>,
    ) -> Result<usize> {
        if self.state.is_finished() {
            return Err(MivisorError::Validation(format!(
                "grouping of '{}' is already {:?}",
                self.source_column, self.state
            )));
        }

        let spec = self.spec(new_column_name, default_value);
        if spec.new_column_name.is_empty() {
            return Err(MivisorError::Validation(
                "new column name is empty".to_string(),
            ));
        }

        let derived = compute_derived_column(table.dataset(), &spec)?;
        let index =
            table.insert_derived_column(&self.source_column, &derived.name, derived.values)?;

        info!(
            source = %self.source_column,
            column = %derived.name,
            mapped = derived.mapped,
            defaulted = derived.defaulted,
            copied = derived.copied,
            "committed grouping"
        );
        self.state = GroupingState::Committed;
        Ok(index)
    }

    /// Abandon the session without touching the dataset.
    pub fn cancel(&mut self) {
        if !self.state.is_finished() {
            self.state = GroupingState::Cancelled;
        }
    }
}
