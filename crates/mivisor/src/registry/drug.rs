//! Drug registry: drugs grouped by category, each with its abbreviations.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{MivisorError, Result};

/// A drug and the column abbreviations it is recorded under.
///
/// Serialized as a single `"name;abbr1,abbr2"` string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrugEntry {
    pub name: String,
    pub abbreviations: BTreeSet<String>,
}

impl DrugEntry {
    pub fn new<I, S>(name: impl Into<String>, abbreviations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            name: name.into().trim().to_string(),
            abbreviations: abbreviations
                .into_iter()
                .map(|a| a.as_ref().trim().to_string())
                .filter(|a| !a.is_empty())
                .collect(),
        }
    }

    /// Flatten to the `"name;abbr1,abbr2"` form.
    pub fn flatten(&self) -> String {
        self.to_string()
    }

    /// Expand a `"name;abbr1,abbr2"` string.
    ///
    /// Exactly one `;` is required. Abbreviations are split on `,` and
    /// trimmed; empty pieces are dropped.
    pub fn expand(flat: &str) -> std::result::Result<Self, String> {
        let mut parts = flat.split(';');
        let (Some(name), Some(abbrs), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(format!(
                "drug entry '{}' must contain exactly one ';' separator",
                flat
            ));
        };
        if name.trim().is_empty() {
            return Err(format!("drug entry '{}' has no name", flat));
        }
        Ok(DrugEntry::new(name, abbrs.split(',')))
    }
}

impl fmt::Display for DrugEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let abbrs: Vec<&str> = self.abbreviations.iter().map(String::as_str).collect();
        write!(f, "{};{}", self.name, abbrs.join(","))
    }
}

impl FromStr for DrugEntry {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        DrugEntry::expand(s)
    }
}

impl Serialize for DrugEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.flatten())
    }
}

impl<'de> Deserialize<'de> for DrugEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let flat = String::deserialize(deserializer)?;
        DrugEntry::expand(&flat).map_err(serde::de::Error::custom)
    }
}

/// Drugs grouped by category name, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DrugRegistry {
    groups: IndexMap<String, Vec<DrugEntry>>,
}

impl DrugRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.values().all(Vec::is_empty)
    }

    pub fn groups(&self) -> impl Iterator<Item = (&str, &[DrugEntry])> {
        self.groups.iter().map(|(g, d)| (g.as_str(), d.as_slice()))
    }

    pub fn group(&self, name: &str) -> Option<&[DrugEntry]> {
        self.groups.get(name).map(Vec::as_slice)
    }

    /// Add a drug to a group, creating the group if needed.
    ///
    /// Drug names are unique within a group.
    pub fn add(&mut self, group: &str, entry: DrugEntry) -> Result<()> {
        if entry.name.is_empty() {
            return Err(MivisorError::Validation("drug name is required".to_string()));
        }
        let drugs = self.groups.entry(group.trim().to_string()).or_default();
        if drugs.iter().any(|d| d.name == entry.name) {
            return Err(MivisorError::Validation(format!(
                "drug '{}' already exists in group '{}'",
                entry.name, group
            )));
        }
        drugs.push(entry);
        Ok(())
    }

    /// Remove a drug by name. Returns the removed entry.
    pub fn remove(&mut self, group: &str, name: &str) -> Option<DrugEntry> {
        let drugs = self.groups.get_mut(group)?;
        let index = drugs.iter().position(|d| d.name == name)?;
        Some(drugs.remove(index))
    }

    /// Every abbreviation across all groups.
    pub fn all_abbreviations(&self) -> BTreeSet<&str> {
        self.groups
            .values()
            .flatten()
            .flat_map(|d| d.abbreviations.iter().map(String::as_str))
            .collect()
    }

    /// Find the drug recorded under an abbreviation.
    pub fn find_by_abbreviation(&self, abbreviation: &str) -> Option<(&str, &DrugEntry)> {
        let abbreviation = abbreviation.trim();
        self.groups.iter().find_map(|(group, drugs)| {
            drugs
                .iter()
                .find(|d| d.abbreviations.contains(abbreviation))
                .map(|d| (group.as_str(), d))
        })
    }

    /// Check the name-uniqueness invariant after loading.
    pub(crate) fn validate(&self) -> std::result::Result<(), String> {
        for (group, drugs) in &self.groups {
            for (i, drug) in drugs.iter().enumerate() {
                if drugs[..i].iter().any(|d| d.name == drug.name) {
                    return Err(format!(
                        "drug '{}' appears more than once in group '{}'",
                        drug.name, group
                    ));
                }
            }
        }
        Ok(())
    }
}
