//! Column summaries and per-column classification results.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::types::{ColumnRole, ColumnType};

/// Descriptive statistics for numeric columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericStatistics {
    /// Number of non-null values.
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1). NaN for fewer than two values.
    pub std: f64,
    pub min: f64,
    /// First quartile (25th percentile).
    pub q1: f64,
    pub median: f64,
    /// Third quartile (75th percentile).
    pub q3: f64,
    pub max: f64,
}

impl NumericStatistics {
    /// Calculate the interquartile range.
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

/// Summary of one column.
///
/// Which variant is produced depends only on the column's storage type:
/// numeric columns are described, everything else is counted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnSummary {
    /// Descriptive statistics for numeric columns.
    Describe {
        column: String,
        dtype: ColumnType,
        statistics: NumericStatistics,
    },
    /// Value frequencies for non-numeric columns, most frequent first.
    ValueCounts {
        column: String,
        dtype: ColumnType,
        counts: IndexMap<String, usize>,
    },
}

impl ColumnSummary {
    pub fn column(&self) -> &str {
        match self {
            ColumnSummary::Describe { column, .. } | ColumnSummary::ValueCounts { column, .. } => {
                column
            }
        }
    }

    pub fn dtype(&self) -> ColumnType {
        match self {
            ColumnSummary::Describe { dtype, .. } | ColumnSummary::ValueCounts { dtype, .. } => {
                *dtype
            }
        }
    }

    pub fn statistics(&self) -> Option<&NumericStatistics> {
        match self {
            ColumnSummary::Describe { statistics, .. } => Some(statistics),
            ColumnSummary::ValueCounts { .. } => None,
        }
    }

    pub fn value_counts(&self) -> Option<&IndexMap<String, usize>> {
        match self {
            ColumnSummary::ValueCounts { counts, .. } => Some(counts),
            ColumnSummary::Describe { .. } => None,
        }
    }
}

/// Role defaults and labels assigned to a column on import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnProfile {
    /// Column name.
    pub name: String,
    /// Zero-based position in the dataset.
    pub position: usize,
    pub keep: bool,
    pub key: bool,
    pub date: bool,
    pub drug: bool,
    pub organism: bool,
    /// Display alias (defaults to the column name).
    pub alias: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
}

impl ColumnProfile {
    /// Create a profile with no roles, aliased to its own name.
    pub fn new(name: impl Into<String>, position: usize) -> Self {
        let name = name.into();
        Self {
            alias: name.clone(),
            name,
            position,
            keep: false,
            key: false,
            date: false,
            drug: false,
            organism: false,
            description: String::new(),
        }
    }

    pub fn has_role(&self, role: ColumnRole) -> bool {
        match role {
            ColumnRole::Keep => self.keep,
            ColumnRole::Key => self.key,
            ColumnRole::Date => self.date,
            ColumnRole::Drug => self.drug,
            ColumnRole::Organism => self.organism,
        }
    }

    pub fn set_role(&mut self, role: ColumnRole, enabled: bool) {
        let flag = match role {
            ColumnRole::Keep => &mut self.keep,
            ColumnRole::Key => &mut self.key,
            ColumnRole::Date => &mut self.date,
            ColumnRole::Drug => &mut self.drug,
            ColumnRole::Organism => &mut self.organism,
        };
        *flag = enabled;
    }

    /// Roles currently assigned, in [`ColumnRole::ALL`] order.
    pub fn roles(&self) -> Vec<ColumnRole> {
        ColumnRole::ALL
            .into_iter()
            .filter(|role| self.has_role(*role))
            .collect()
    }
}
