//! Organism registry keyed by organism code.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{MivisorError, Result};

/// Reference record for one organism.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganismEntry {
    pub code: String,
    pub group: String,
    /// Gram stain ("positive", "negative", or empty).
    pub gram: String,
    pub genus: String,
    pub species: String,
    pub subspecies: String,
    pub property: String,
    pub note: String,
}

impl OrganismEntry {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            ..Self::default()
        }
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    pub fn with_gram(mut self, gram: impl Into<String>) -> Self {
        self.gram = gram.into();
        self
    }

    pub fn with_genus(mut self, genus: impl Into<String>) -> Self {
        self.genus = genus.into();
        self
    }

    pub fn with_species(mut self, species: impl Into<String>) -> Self {
        self.species = species.into();
        self
    }

    /// Data-entry rule: a code plus at least one of genus or group.
    pub fn validate(&self) -> Result<()> {
        if self.code.trim().is_empty() {
            return Err(MivisorError::Validation(
                "organism code is required".to_string(),
            ));
        }
        if self.genus.trim().is_empty() && self.group.trim().is_empty() {
            return Err(MivisorError::Validation(format!(
                "organism '{}' needs a genus or a group",
                self.code
            )));
        }
        Ok(())
    }

    /// "Genus species subspecies", skipping empty parts.
    pub fn scientific_name(&self) -> String {
        [&self.genus, &self.species, &self.subspecies]
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Organisms keyed by code, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrganismRegistry {
    entries: IndexMap<String, OrganismEntry>,
}

impl OrganismRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, code: &str) -> Option<&OrganismEntry> {
        self.entries.get(code)
    }

    pub fn iter(&self) -> impl Iterator<Item = &OrganismEntry> {
        self.entries.values()
    }

    /// Validate and insert an entry, replacing any entry with the same code.
    ///
    /// Returns the replaced entry.
    pub fn insert(&mut self, mut entry: OrganismEntry) -> Result<Option<OrganismEntry>> {
        entry.validate()?;
        entry.code = entry.code.trim().to_string();
        Ok(self.entries.insert(entry.code.clone(), entry))
    }

    pub fn remove(&mut self, code: &str) -> Option<OrganismEntry> {
        self.entries.shift_remove(code)
    }

    /// Fill in codes omitted from the document body from their map keys.
    pub(crate) fn normalize_codes(&mut self) {
        for (code, entry) in self.entries.iter_mut() {
            if entry.code.is_empty() {
                entry.code = code.clone();
            }
        }
    }
}
