//! Persistence for project configurations - `config.yml` in the project
//! directory.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{MivisorError, Result};
use crate::persist::{parse_yaml, read_document, write_yaml_atomic};

use super::config::ProjectConfig;

/// File name of the project configuration document.
pub const CONFIG_FILE: &str = "config.yml";

impl ProjectConfig {
    /// Initialize a new project in `project_dir` and write its configuration.
    ///
    /// The directory is created if needed. An existing `config.yml` is
    /// overwritten.
    pub fn create(project_dir: impl AsRef<Path>, name: &str) -> Result<Self> {
        let project_dir = project_dir.as_ref();

        fs::create_dir_all(project_dir).map_err(|e| MivisorError::io(project_dir, e))?;

        let config = ProjectConfig::new(current_user(), format!("{} project", name.trim()));
        config.save(project_dir)?;

        info!(dir = %project_dir.display(), name, "created project");
        Ok(config)
    }

    /// Load the configuration of an existing project.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use mivisor::ProjectConfig;
    /// let config = ProjectConfig::load("projects/ward-survey").unwrap();
    /// println!("Kept columns: {}", config.keep_columns.len());
    /// ```
    pub fn load(project_dir: impl AsRef<Path>) -> Result<Self> {
        let path = config_path(project_dir);

        let text = read_document(&path)?
            .ok_or_else(|| MivisorError::MissingConfig { path: path.clone() })?;
        let config: ProjectConfig = parse_yaml(&path, &text)?;

        info!(path = %path.display(), "loaded project configuration");
        Ok(config)
    }

    /// Write the configuration back to `config.yml`, replacing it atomically.
    pub fn save(&self, project_dir: impl AsRef<Path>) -> Result<()> {
        let path = config_path(project_dir);
        write_yaml_atomic(&path, self)?;
        info!(path = %path.display(), "saved project configuration");
        Ok(())
    }
}

/// Path of the configuration document for a project directory.
///
/// # Example
///
/// ```
/// use mivisor::project::config_path;
///
/// let path = config_path("projects/ward-survey");
/// assert_eq!(path.to_string_lossy(), "projects/ward-survey/config.yml");
/// ```
pub fn config_path(project_dir: impl AsRef<Path>) -> PathBuf {
    project_dir.as_ref().join(CONFIG_FILE)
}

fn current_user() -> String {
    env::var("USER")
        .or_else(|_| env::var("USERNAME"))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_create_writes_config() {
        let dir = TempDir::new().unwrap();
        let project = dir.path().join("nested").join("ward");

        let config = ProjectConfig::create(&project, "Ward").unwrap();

        assert_eq!(config.description, "Ward project");
        assert!(config_path(&project).exists());
        assert_eq!(ProjectConfig::load(&project).unwrap(), config);
    }

    #[test]
    fn test_load_missing_is_fatal() {
        let dir = TempDir::new().unwrap();
        let err = ProjectConfig::load(dir.path()).unwrap_err();
        assert!(matches!(err, MivisorError::MissingConfig { .. }));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_load_malformed_is_parse_error() {
        let dir = TempDir::new().unwrap();
        fs::write(config_path(dir.path()), "keep_columns: [a, b\n").unwrap();
        let err = ProjectConfig::load(dir.path()).unwrap_err();
        assert!(matches!(err, MivisorError::Parse { .. }));
    }

    #[test]
    fn test_create_in_unwritable_location_fails() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("plain-file");
        fs::write(&file, "x").unwrap();
        // A regular file cannot become a project directory.
        let err = ProjectConfig::create(file.join("project"), "P").unwrap_err();
        assert!(matches!(err, MivisorError::Io { .. }));
    }
}
