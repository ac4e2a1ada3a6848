//! Core type definitions for column storage and roles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::input::CellValue;

/// Storage type of a column, derived from its non-null cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// Whole numbers only.
    Integer,
    /// Numbers, at least one with a fractional part.
    Float,
    /// Boolean values (true/false).
    Boolean,
    /// Date and/or time values.
    DateTime,
    /// Text or a mix of types.
    #[default]
    Object,
}

impl ColumnType {
    /// Returns true if this type is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float)
    }

    /// Infer the storage type from a column's cells.
    ///
    /// Null cells are ignored. A column with no non-null cells is `Object`.
    pub fn infer<'a>(cells: impl IntoIterator<Item = &'a CellValue>) -> Self {
        let mut current: Option<ColumnType> = None;

        for cell in cells {
            if cell.is_null() {
                continue;
            }
            let cell_type = match cell {
                CellValue::Integer(_) => ColumnType::Integer,
                CellValue::Float(_) => ColumnType::Float,
                CellValue::Boolean(_) => ColumnType::Boolean,
                CellValue::DateTime(_) => ColumnType::DateTime,
                CellValue::Text(_) | CellValue::Empty => return ColumnType::Object,
            };
            current = Some(match (current, cell_type) {
                (None, t) => t,
                (Some(a), b) if a == b => a,
                (Some(a), b) if a.is_numeric() && b.is_numeric() => ColumnType::Float,
                _ => return ColumnType::Object,
            });
        }

        current.unwrap_or(ColumnType::Object)
    }

    /// Storage type name as shown to users.
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Integer => "int64",
            ColumnType::Float => "float64",
            ColumnType::Boolean => "bool",
            ColumnType::DateTime => "datetime64",
            ColumnType::Object => "object",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role a column plays in the project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    /// Retained for analysis.
    Keep,
    /// Part of the record identity key.
    Key,
    /// Holds collection or report dates.
    Date,
    /// Holds susceptibility results for a drug.
    Drug,
    /// Holds the organism code (at most one column).
    Organism,
}

impl ColumnRole {
    pub const ALL: [ColumnRole; 5] = [
        ColumnRole::Keep,
        ColumnRole::Key,
        ColumnRole::Date,
        ColumnRole::Drug,
        ColumnRole::Organism,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnRole::Keep => "keep",
            ColumnRole::Key => "key",
            ColumnRole::Date => "date",
            ColumnRole::Drug => "drug",
            ColumnRole::Organism => "organism",
        }
    }
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColumnRole::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown column role '{}'", s))
    }
}
