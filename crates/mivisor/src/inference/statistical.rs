//! Per-column summary statistics.

use indexmap::IndexMap;

use crate::input::CellValue;
use crate::schema::{ColumnSummary, ColumnType, NumericStatistics};

// =============================================================================
// STREAMING STATISTICS
// =============================================================================
// Welford's online algorithm for computing mean and variance in a single pass.

/// Streaming statistics accumulator using Welford's algorithm.
///
/// Values are retained so quartiles are exact over the whole column.
#[derive(Debug, Clone, Default)]
struct StreamingStats {
    count: usize,
    mean: f64,
    m2: f64, // Sum of squared differences from mean
    min: f64,
    max: f64,
    values: Vec<f64>,
}

impl StreamingStats {
    fn new() -> Self {
        Self {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            ..Self::default()
        }
    }

    /// Add a value using Welford's online algorithm.
    fn add(&mut self, value: f64) {
        self.count += 1;

        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        let delta2 = value - self.mean;
        self.m2 += delta * delta2;

        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }

        self.values.push(value);
    }

    /// Sample standard deviation; NaN for fewer than two values.
    fn std(&self) -> f64 {
        if self.count < 2 {
            f64::NAN
        } else {
            (self.m2 / (self.count - 1) as f64).sqrt()
        }
    }

    /// Percentile with linear interpolation between closest ranks.
    /// `values` must already be sorted.
    fn percentile(&self, p: f64) -> f64 {
        let n = self.values.len();
        if n == 0 {
            return f64::NAN;
        }
        let pos = p * (n - 1) as f64;
        let lo = pos.floor() as usize;
        let hi = pos.ceil() as usize;
        let (a, b) = (self.values[lo], self.values[hi.min(n - 1)]);
        a + (b - a) * (pos - lo as f64)
    }

    fn into_numeric_statistics(mut self) -> NumericStatistics {
        if self.count == 0 {
            return NumericStatistics {
                count: 0,
                mean: f64::NAN,
                std: f64::NAN,
                min: f64::NAN,
                q1: f64::NAN,
                median: f64::NAN,
                q3: f64::NAN,
                max: f64::NAN,
            };
        }

        self.values.sort_by(|a, b| a.total_cmp(b));

        NumericStatistics {
            count: self.count,
            mean: self.mean,
            std: self.std(),
            min: self.min,
            q1: self.percentile(0.25),
            median: self.percentile(0.5),
            q3: self.percentile(0.75),
            max: self.max,
        }
    }
}

/// Summarize a column according to its storage type.
///
/// Numeric columns get descriptive statistics; every other storage type gets
/// value frequencies sorted by descending count, ties kept in first-seen
/// order. Null cells are excluded from both.
pub fn summarize_cells<'a>(
    column: &str,
    dtype: ColumnType,
    cells: impl IntoIterator<Item = &'a CellValue>,
) -> ColumnSummary {
    if dtype.is_numeric() {
        let mut stats = StreamingStats::new();
        for value in cells.into_iter().filter_map(CellValue::as_f64) {
            stats.add(value);
        }
        ColumnSummary::Describe {
            column: column.to_string(),
            dtype,
            statistics: stats.into_numeric_statistics(),
        }
    } else {
        ColumnSummary::ValueCounts {
            column: column.to_string(),
            dtype,
            counts: value_counts(cells),
        }
    }
}

/// Count occurrences of each distinct non-null display value.
pub fn value_counts<'a>(cells: impl IntoIterator<Item = &'a CellValue>) -> IndexMap<String, usize> {
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for cell in cells {
        if cell.is_null() {
            continue;
        }
        *counts.entry(cell.to_string()).or_insert(0) += 1;
    }
    counts.sort_by(|_, a, _, b| b.cmp(a));
    counts
}
