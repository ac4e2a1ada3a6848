//! Value grouping: recode a column's categorical values into labels and
//! insert the result as a new column.

mod grouping;
mod operations;

pub use grouping::{GroupingSession, GroupingState};
pub use operations::{compute_derived_column, DerivedColumn, GroupingSpec};
