//! Property-based tests for configuration, registries and recoding.
//!
//! # Running Property Tests
//!
//! ```bash
//! cargo test -p mivisor --test property_tests
//!
//! # More cases
//! PROPTEST_CASES=10000 cargo test -p mivisor --test property_tests
//! ```

use proptest::prelude::*;
use tempfile::TempDir;

use mivisor::input::Column;
use mivisor::{
    CellValue, ColumnRole, ColumnSummary, ColumnType, Dataset, DrugEntry, GroupingSpec,
    ProjectConfig, compute_derived_column,
};

// =============================================================================
// Test Strategies
// =============================================================================

/// Column-name-like strings, including spaces and punctuation.
fn column_name() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9 _.()-]{0,15}"
}

/// Drug abbreviations as found in lab exports.
fn abbreviation() -> impl Strategy<Value = String> {
    "[A-Z]{2,4}[0-9]?"
}

fn role() -> impl Strategy<Value = ColumnRole> {
    prop::sample::select(ColumnRole::ALL.to_vec())
}

fn config() -> impl Strategy<Value = ProjectConfig> {
    (
        "[a-z]{0,8}",
        "[A-Za-z ]{0,20}",
        prop::collection::vec((column_name(), role()), 0..12),
        prop::collection::vec((column_name(), "[A-Za-z ]{1,12}"), 0..4),
    )
        .prop_map(|(creator, description, roles, aliases)| {
            let mut config = ProjectConfig::new(creator, description);
            for (column, role) in roles {
                config.set_column_role(&column, role, true);
            }
            for (column, alias) in aliases {
                config.set_alias(&column, &alias);
                config.set_description(&column, &alias);
            }
            config
        })
}

fn cell() -> impl Strategy<Value = CellValue> {
    prop_oneof![
        Just(CellValue::Empty),
        "[A-Za-z]{1,6}".prop_map(CellValue::Text),
        (-1000i64..1000).prop_map(CellValue::Integer),
        (-1000.0f64..1000.0).prop_map(CellValue::Float),
        any::<bool>().prop_map(CellValue::Boolean),
    ]
}

// =============================================================================
// Configuration
// =============================================================================

proptest! {
    #[test]
    fn config_save_load_round_trip(config in config()) {
        let dir = TempDir::new().unwrap();
        config.save(dir.path()).unwrap();
        prop_assert_eq!(ProjectConfig::load(dir.path()).unwrap(), config);
    }

    #[test]
    fn toggling_keep_on_then_off_is_identity(config in config(), column in column_name()) {
        prop_assume!(!config.keep_columns.contains(&column));
        let mut toggled = config.clone();

        toggled.set_column_role(&column, ColumnRole::Keep, true);
        toggled.set_column_role(&column, ColumnRole::Keep, false);

        prop_assert_eq!(toggled.keep_columns, config.keep_columns);
    }
}

// =============================================================================
// Drug Entries
// =============================================================================

proptest! {
    #[test]
    fn drug_entry_flatten_expand(
        name in "[A-Z][a-z]{2,12}( [a-z]{2,8})?",
        abbreviations in prop::collection::btree_set(abbreviation(), 0..5),
    ) {
        let entry = DrugEntry::new(name.as_str(), abbreviations.iter().map(String::as_str));
        let expanded = DrugEntry::expand(&entry.flatten()).unwrap();

        prop_assert_eq!(&expanded.name, &name);
        prop_assert_eq!(expanded.abbreviations, abbreviations);
    }
}

// =============================================================================
// Summaries and Recoding
// =============================================================================

proptest! {
    #[test]
    fn summary_kind_follows_storage_type(cells in prop::collection::vec(cell(), 1..40)) {
        let dataset = Dataset::from_columns(vec![Column::new("c", cells)]).unwrap();
        let dtype = dataset.column_type("c").unwrap();

        match dataset.summarize("c").unwrap() {
            ColumnSummary::Describe { .. } => prop_assert!(dtype.is_numeric()),
            ColumnSummary::ValueCounts { .. } => prop_assert!(!dtype.is_numeric()),
        }
    }

    #[test]
    fn integer_columns_are_described(values in prop::collection::vec(-50i64..50, 1..30)) {
        let cells = values.iter().copied().map(CellValue::Integer).collect();
        let dataset = Dataset::from_columns(vec![Column::new("n", cells)]).unwrap();

        prop_assert_eq!(dataset.column_type("n"), Some(ColumnType::Integer));
        let summary = dataset.summarize("n").unwrap();
        let stats = summary.statistics().unwrap();
        prop_assert_eq!(stats.count, values.len());
        prop_assert!(stats.min <= stats.q1 && stats.q1 <= stats.median);
        prop_assert!(stats.median <= stats.q3 && stats.q3 <= stats.max);
    }

    #[test]
    fn empty_recode_copies_column(cells in prop::collection::vec(cell(), 0..40)) {
        let dataset = Dataset::from_columns(vec![Column::new("c", cells.clone())]).unwrap();
        let spec = GroupingSpec::new("c", "c2").with_default("");

        let derived = compute_derived_column(&dataset, &spec).unwrap();

        prop_assert_eq!(derived.values.len(), cells.len());
        prop_assert_eq!(derived.copied, cells.len());
        for (derived, original) in derived.values.iter().zip(&cells) {
            prop_assert_eq!(derived.to_string(), original.to_string());
        }
    }

    #[test]
    fn recode_with_default_never_copies(
        cells in prop::collection::vec("[ABC]", 1..30),
        mapped in "[AB]",
    ) {
        let column = cells.iter().map(|s| CellValue::Text(s.clone())).collect();
        let dataset = Dataset::from_columns(vec![Column::new("c", column)]).unwrap();
        let spec = GroupingSpec::new("c", "g")
            .with_group(mapped.clone(), "G")
            .with_default("Other");

        let derived = compute_derived_column(&dataset, &spec).unwrap();

        prop_assert_eq!(derived.copied, 0);
        for (value, original) in derived.values.iter().zip(&cells) {
            let expected = if *original == mapped { "G" } else { "Other" };
            prop_assert_eq!(value.to_string(), expected);
        }
    }
}
