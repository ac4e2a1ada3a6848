//! Column role classification.

mod classifier;

pub use classifier::ColumnClassifier;
