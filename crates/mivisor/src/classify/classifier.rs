//! Default role assignment on import and validated role toggles.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::error::{MivisorError, Result};
use crate::input::Dataset;
use crate::project::ProjectConfig;
use crate::registry::DrugRegistry;
use crate::schema::{ColumnProfile, ColumnRole};

/// Assigns initial column roles from the project configuration and the drug
/// registry.
pub struct ColumnClassifier {
    drug_abbreviations: BTreeSet<String>,
}

impl ColumnClassifier {
    /// Create a classifier that detects drug columns by the registry's
    /// abbreviations.
    pub fn new(drugs: &DrugRegistry) -> Self {
        Self {
            drug_abbreviations: drugs
                .all_abbreviations()
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }

    /// Profile every dataset column, in column order.
    ///
    /// Rules:
    /// - With no recorded keep columns every column is kept and the full
    ///   column list is recorded; otherwise only listed columns are kept.
    /// - Key and date roles come from the configuration.
    /// - Drug columns: with none recorded, any column named after a registry
    ///   abbreviation is a drug column. Otherwise only the recorded set
    ///   applies. Detected drug columns are not written to the configuration,
    ///   so later imports detect again.
    /// - The organism column is the one named in the configuration.
    /// - Alias falls back to the column name, description to empty.
    ///
    /// Configured names that are not dataset columns are ignored.
    pub fn classify(&self, dataset: &Dataset, config: &mut ProjectConfig) -> Vec<ColumnProfile> {
        let names = dataset.column_names();
        let seed_keep = config.keep_columns.is_empty();
        let detect_drugs = config.drug_columns.is_empty();

        let mut profiles = Vec::with_capacity(names.len());

        for (position, name) in names.iter().copied().enumerate() {
            let mut profile = ColumnProfile::new(name, position);

            profile.keep = seed_keep || config.keep_columns.contains(name);
            profile.key = config.key_columns.contains(name);
            profile.date = config.date_columns.contains(name);
            profile.drug = if detect_drugs {
                self.drug_abbreviations.contains(name.trim())
            } else {
                config.drug_columns.contains(name)
            };
            profile.organism = config.organism_column.as_deref() == Some(name);

            if let Some(alias) = config.alias(name) {
                profile.alias = alias.to_string();
            }
            if let Some(text) = config.description_of(name) {
                profile.description = text.to_string();
            }

            profiles.push(profile);
        }

        if seed_keep {
            config
                .keep_columns
                .extend(names.iter().map(|n| n.to_string()));
        }
        if detect_drugs {
            let detected: Vec<&str> = profiles
                .iter()
                .filter(|p| p.drug)
                .map(|p| p.name.as_str())
                .collect();
            debug!(columns = ?detected, "detected drug columns by abbreviation");
        }

        debug!(
            columns = profiles.len(),
            kept = profiles.iter().filter(|p| p.keep).count(),
            "classified columns"
        );
        profiles
    }

    /// Apply a user role toggle to the configuration.
    ///
    /// Marking a column as a date column requires every non-null value to be
    /// date-typed; otherwise the toggle is rejected and the configuration is
    /// left unchanged.
    pub fn toggle_role(
        config: &mut ProjectConfig,
        dataset: &Dataset,
        column: &str,
        role: ColumnRole,
        enabled: bool,
    ) -> Result<()> {
        if dataset.column_index(column).is_none() {
            return Err(MivisorError::ColumnNotFound(column.to_string()));
        }

        if role == ColumnRole::Date && enabled && !dataset.is_date_column(column) {
            warn!(column, "rejected date role for a column without date values");
            return Err(MivisorError::InvalidRoleAssignment {
                column: column.to_string(),
                role: role.to_string(),
                reason: "values are not date-typed".to_string(),
            });
        }

        config.set_column_role(column, role, enabled);
        Ok(())
    }
}
