//! Table view adapter over the current dataset.

mod model;

pub use model::{TableEvent, TableModel};
