//! Statistical summaries over dataset columns.

mod statistical;

pub use statistical::{summarize_cells, value_counts};
