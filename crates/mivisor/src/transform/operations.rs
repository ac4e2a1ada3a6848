//! Recode operation: map categorical values to group labels.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{MivisorError, Result};
use crate::input::{CellValue, Dataset};

/// What a recode should produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupingSpec {
    /// Column whose values are recoded.
    pub source_column: String,
    /// Original display value -> group label.
    pub value_to_group: IndexMap<String, String>,
    /// Name of the derived column.
    pub new_column_name: String,
    /// Value for unmapped entries. When absent or empty, unmapped entries
    /// keep their original value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

impl GroupingSpec {
    pub fn new(source_column: impl Into<String>, new_column_name: impl Into<String>) -> Self {
        Self {
            source_column: source_column.into(),
            value_to_group: IndexMap::new(),
            new_column_name: new_column_name.into(),
            default_value: None,
        }
    }

    pub fn with_group(mut self, value: impl Into<String>, label: impl Into<String>) -> Self {
        self.value_to_group.insert(value.into(), label.into());
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default_value = Some(default.into());
        self
    }

    fn default(&self) -> Option<&str> {
        self.default_value.as_deref().filter(|d| !d.is_empty())
    }

    /// Get a human-readable description of the operation.
    pub fn description(&self) -> String {
        let examples: Vec<String> = self
            .value_to_group
            .iter()
            .take(3)
            .map(|(from, to)| format!("'{}' → '{}'", from, to))
            .collect();
        format!(
            "Group '{}' into '{}': {}",
            self.source_column,
            self.new_column_name,
            examples.join(", ")
        )
    }
}

/// A derived column ready for insertion, with substitution counts.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedColumn {
    pub name: String,
    pub values: Vec<CellValue>,
    /// Rows whose value had a group label.
    pub mapped: usize,
    /// Rows that received the default value.
    pub defaulted: usize,
    /// Rows copied verbatim from the source.
    pub copied: usize,
}

/// Derive the recoded column for `spec` without touching the dataset.
///
/// Per row: the group label if the source value is mapped, else the default
/// value if one is set, else the original cell.
pub fn compute_derived_column(dataset: &Dataset, spec: &GroupingSpec) -> Result<DerivedColumn> {
    let source = dataset
        .column(&spec.source_column)
        .ok_or_else(|| MivisorError::ColumnNotFound(spec.source_column.clone()))?;

    let default = spec.default();
    let mut derived = DerivedColumn {
        name: spec.new_column_name.clone(),
        values: Vec::with_capacity(source.cells.len()),
        mapped: 0,
        defaulted: 0,
        copied: 0,
    };

    for cell in &source.cells {
        let key = cell.to_string();
        let value = match (spec.value_to_group.get(&key), default) {
            (Some(label), _) if !cell.is_null() => {
                derived.mapped += 1;
                CellValue::Text(label.clone())
            }
            (_, Some(default)) => {
                derived.defaulted += 1;
                CellValue::Text(default.to_string())
            }
            _ => {
                derived.copied += 1;
                cell.clone()
            }
        };
        derived.values.push(value);
    }

    Ok(derived)
}
