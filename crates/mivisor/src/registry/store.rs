//! Loading and saving registry documents.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{MivisorError, Result};
use crate::persist::{parse_yaml, read_document, write_yaml_atomic};

use super::drug::DrugRegistry;
use super::organism::OrganismRegistry;

/// File name of the drug registry document.
pub const DRUG_REGISTRY_FILE: &str = "drugs.yaml";

/// File name of the organism registry document.
pub const ORGANISM_REGISTRY_FILE: &str = "organisms.yaml";

/// Reads and writes the registry documents in one directory.
///
/// Registries are shared by every project; the directory is usually the
/// application data directory.
#[derive(Debug, Clone)]
pub struct RegistryStore {
    dir: PathBuf,
}

impl RegistryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn drug_path(&self) -> PathBuf {
        self.dir.join(DRUG_REGISTRY_FILE)
    }

    pub fn organism_path(&self) -> PathBuf {
        self.dir.join(ORGANISM_REGISTRY_FILE)
    }

    /// Load the drug registry. The document must exist.
    pub fn load_drugs(&self) -> Result<DrugRegistry> {
        let path = self.drug_path();
        let text = read_document(&path)?.ok_or_else(|| MivisorError::NotFound {
            path: path.clone(),
        })?;

        let registry: DrugRegistry = parse_yaml(&path, &text)?;
        registry
            .validate()
            .map_err(|message| MivisorError::parse(&path, message))?;

        info!(path = %path.display(), "loaded drug registry");
        Ok(registry)
    }

    /// Replace the drug registry document with `registry`.
    pub fn save_drugs(&self, registry: &DrugRegistry) -> Result<()> {
        let path = self.drug_path();
        write_yaml_atomic(&path, registry)?;
        info!(path = %path.display(), "saved drug registry");
        Ok(())
    }

    /// Load the organism registry. A missing or empty document is an empty
    /// registry.
    pub fn load_organisms(&self) -> Result<OrganismRegistry> {
        let path = self.organism_path();
        let Some(text) = read_document(&path)? else {
            info!(path = %path.display(), "no organism registry, starting empty");
            return Ok(OrganismRegistry::new());
        };

        let mut registry: OrganismRegistry = parse_yaml(&path, &text)?;
        registry.normalize_codes();

        info!(path = %path.display(), organisms = registry.len(), "loaded organism registry");
        Ok(registry)
    }

    /// Replace the organism registry document with `registry`.
    pub fn save_organisms(&self, registry: &OrganismRegistry) -> Result<()> {
        let path = self.organism_path();
        write_yaml_atomic(&path, registry)?;
        info!(path = %path.display(), "saved organism registry");
        Ok(())
    }
}
