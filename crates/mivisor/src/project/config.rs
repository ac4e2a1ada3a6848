//! Per-project settings document.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::schema::ColumnRole;

/// Column roles, aliases and descriptions for one project.
///
/// This is a passive store: it records whatever it is told. Checks such as
/// "only date-typed columns may be date columns" belong to the classifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default, deserialize_with = "null_as_default")]
    pub creator: String,

    #[serde(rename = "desc", default, deserialize_with = "null_as_default")]
    pub description: String,

    /// Columns retained for analysis, in display order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub keep_columns: IndexSet<String>,

    /// Columns forming the record identity key.
    #[serde(default, deserialize_with = "null_as_default")]
    pub key_columns: IndexSet<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub date_columns: IndexSet<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub drug_columns: IndexSet<String>,

    /// The single organism column, if any. Stored as `""` when unset.
    #[serde(
        default,
        serialize_with = "none_as_empty",
        deserialize_with = "empty_as_none"
    )]
    pub organism_column: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub aliases: IndexMap<String, String>,

    #[serde(rename = "descs", default, deserialize_with = "null_as_default")]
    pub descriptions: IndexMap<String, String>,
}

impl ProjectConfig {
    pub fn new(creator: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            creator: creator.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    /// Add or remove `column` from a role.
    ///
    /// For [`ColumnRole::Organism`], enabling replaces any previous organism
    /// column; disabling clears it only if `column` is the current one.
    pub fn set_column_role(&mut self, column: &str, role: ColumnRole, enabled: bool) {
        let set = match role {
            ColumnRole::Keep => &mut self.keep_columns,
            ColumnRole::Key => &mut self.key_columns,
            ColumnRole::Date => &mut self.date_columns,
            ColumnRole::Drug => &mut self.drug_columns,
            ColumnRole::Organism => {
                if enabled {
                    self.organism_column = Some(column.to_string());
                } else if self.organism_column.as_deref() == Some(column) {
                    self.organism_column = None;
                }
                return;
            }
        };

        if enabled {
            set.insert(column.to_string());
        } else {
            set.shift_remove(column);
        }
    }

    pub fn has_role(&self, column: &str, role: ColumnRole) -> bool {
        match role {
            ColumnRole::Keep => self.keep_columns.contains(column),
            ColumnRole::Key => self.key_columns.contains(column),
            ColumnRole::Date => self.date_columns.contains(column),
            ColumnRole::Drug => self.drug_columns.contains(column),
            ColumnRole::Organism => self.organism_column.as_deref() == Some(column),
        }
    }

    /// Set the display alias. An empty alias removes it.
    pub fn set_alias(&mut self, column: &str, alias: &str) {
        if alias.is_empty() {
            self.aliases.shift_remove(column);
        } else {
            self.aliases.insert(column.to_string(), alias.to_string());
        }
    }

    /// Set the free-text description. Empty text removes it.
    pub fn set_description(&mut self, column: &str, text: &str) {
        if text.is_empty() {
            self.descriptions.shift_remove(column);
        } else {
            self.descriptions.insert(column.to_string(), text.to_string());
        }
    }

    pub fn alias(&self, column: &str) -> Option<&str> {
        self.aliases.get(column).map(String::as_str)
    }

    pub fn description_of(&self, column: &str) -> Option<&str> {
        self.descriptions.get(column).map(String::as_str)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

fn none_as_empty<S>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(value.as_deref().unwrap_or(""))
}
