//! Schema types describing column storage, roles and summaries.

mod column;
mod types;

pub use column::{ColumnProfile, ColumnSummary, NumericStatistics};
pub use types::{ColumnRole, ColumnType};
