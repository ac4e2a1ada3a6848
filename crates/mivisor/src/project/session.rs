//! A project opened for editing.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::classify::ColumnClassifier;
use crate::error::{MivisorError, Result};
use crate::input::{Dataset, ImportRequest, ImportWorker};
use crate::registry::{DrugRegistry, OrganismRegistry, RegistryStore};
use crate::schema::{ColumnProfile, ColumnRole};
use crate::table::{TableEvent, TableModel};
use crate::transform::GroupingSession;

use super::config::ProjectConfig;

/// Rows shown by the table model unless configured otherwise.
pub const DEFAULT_PREVIEW_ROWS: usize = 100;

/// Settings shared by every project opened in one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    /// Directory holding `drugs.yaml` and `organisms.yaml`.
    pub registry_dir: PathBuf,
    /// Rows shown by the table model; `None` shows everything.
    pub preview_rows: Option<usize>,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            registry_dir: PathBuf::from("."),
            preview_rows: Some(DEFAULT_PREVIEW_ROWS),
        }
    }
}

impl SessionSettings {
    pub fn with_registry_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.registry_dir = dir.into();
        self
    }

    pub fn with_preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = Some(rows);
        self
    }

    /// Show every row in the table model.
    pub fn without_preview_limit(mut self) -> Self {
        self.preview_rows = None;
        self
    }
}

/// Project directory, configuration, dataset and registries in one place.
///
/// The session owns everything it edits. Configuration changes stay in
/// memory until [`ProjectSession::save_profile`] writes them out.
#[derive(Debug)]
pub struct ProjectSession {
    dir: PathBuf,
    config: ProjectConfig,
    settings: SessionSettings,
    registries: RegistryStore,
    drugs: Option<DrugRegistry>,
    organisms: Option<OrganismRegistry>,
    table: TableModel,
    profiles: Vec<ColumnProfile>,
    grouping: Option<GroupingSession>,
    worker: ImportWorker,
}

impl ProjectSession {
    /// Create a new project directory and open it.
    pub fn create(dir: impl AsRef<Path>, name: &str, settings: SessionSettings) -> Result<Self> {
        let config = ProjectConfig::create(dir.as_ref(), name)?;
        Ok(Self::with_config(dir.as_ref(), config, settings))
    }

    /// Open an existing project. Fails with `MissingConfig` when the
    /// directory holds no configuration.
    pub fn open(dir: impl AsRef<Path>, settings: SessionSettings) -> Result<Self> {
        let config = ProjectConfig::load(dir.as_ref())?;
        Ok(Self::with_config(dir.as_ref(), config, settings))
    }

    fn with_config(dir: &Path, config: ProjectConfig, settings: SessionSettings) -> Self {
        let mut table = TableModel::default();
        if let Some(rows) = settings.preview_rows {
            table = table.with_preview_limit(rows);
        }
        Self {
            dir: dir.to_path_buf(),
            config,
            registries: RegistryStore::new(&settings.registry_dir),
            settings,
            drugs: None,
            organisms: None,
            table,
            profiles: Vec::new(),
            grouping: None,
            worker: ImportWorker::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn table(&self) -> &TableModel {
        &self.table
    }

    /// Register a listener for structural changes to the table.
    pub fn subscribe_table(&mut self, listener: impl FnMut(&TableEvent) + 'static) {
        self.table.subscribe(listener);
    }

    pub fn dataset(&self) -> &Dataset {
        self.table.dataset()
    }

    /// Column profiles of the installed dataset, in column order.
    pub fn profiles(&self) -> &[ColumnProfile] {
        &self.profiles
    }

    pub fn profile(&self, column: &str) -> Option<&ColumnProfile> {
        self.profiles.iter().find(|p| p.name == column)
    }

    /// The drug registry, loaded on first use.
    ///
    /// A missing `drugs.yaml` yields an empty registry so classification
    /// can still run; a malformed one is an error.
    pub fn drug_registry(&mut self) -> Result<&DrugRegistry> {
        if self.drugs.is_none() {
            let drugs = match self.registries.load_drugs() {
                Ok(drugs) => drugs,
                Err(MivisorError::NotFound { path }) => {
                    warn!(path = %path.display(), "drug registry not found, using an empty one");
                    DrugRegistry::new()
                }
                Err(e) => return Err(e),
            };
            self.drugs = Some(drugs);
        }
        Ok(self.drugs.get_or_insert_with(DrugRegistry::new))
    }

    /// The organism registry, loaded on first use.
    pub fn organism_registry(&mut self) -> Result<&OrganismRegistry> {
        if self.organisms.is_none() {
            self.organisms = Some(self.registries.load_organisms()?);
        }
        Ok(self.organisms.get_or_insert_with(OrganismRegistry::default))
    }

    /// Replace the dataset and assign default column roles.
    pub fn install_dataset(&mut self, dataset: Dataset) -> Result<&[ColumnProfile]> {
        let classifier = ColumnClassifier::new(self.drug_registry()?);
        self.profiles = classifier.classify(&dataset, &mut self.config);
        self.grouping = None;
        self.table.set_dataset(dataset);

        info!(
            dir = %self.dir.display(),
            rows = self.table.total_row_count(),
            columns = self.table.column_count(),
            "installed dataset"
        );
        Ok(&self.profiles)
    }

    /// Import a file and install it, waiting for the import to finish.
    pub fn import(&mut self, request: ImportRequest) -> Result<&[ColumnProfile]> {
        self.submit_import(request)?;
        match self.worker.wait() {
            Some(outcome) => self.install_dataset(outcome.result?),
            None => Err(MivisorError::ImportFailed(
                "no import was running".to_string(),
            )),
        }
    }

    /// Start an import in the background.
    pub fn submit_import(&mut self, request: ImportRequest) -> Result<()> {
        info!(path = %request.path().display(), "importing");
        self.worker.submit(request)
    }

    pub fn is_importing(&self) -> bool {
        self.worker.is_busy()
    }

    /// Install the background import's dataset if it has finished.
    ///
    /// Returns `Ok(false)` while the import is still running or when none
    /// was started.
    pub fn poll_import(&mut self) -> Result<bool> {
        match self.worker.poll() {
            Some(outcome) => {
                self.install_dataset(outcome.result?)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Toggle a column role, keeping profiles in step with the
    /// configuration. Rejected toggles change nothing.
    ///
    /// The first drug toggle records the detected drug columns in the
    /// configuration before applying the change.
    pub fn toggle_role(&mut self, column: &str, role: ColumnRole, enabled: bool) -> Result<()> {
        if role == ColumnRole::Drug && self.config.drug_columns.is_empty() {
            self.require_column(column)?;
            let detected = self.profiles.iter().filter(|p| p.drug).map(|p| p.name.clone());
            self.config.drug_columns.extend(detected);
        }
        ColumnClassifier::toggle_role(&mut self.config, self.table.dataset(), column, role, enabled)?;
        self.sync_profiles();
        if let Some(profile) = self.profiles.iter_mut().find(|p| p.name == column) {
            profile.set_role(role, enabled);
        }
        debug!(column, %role, enabled, "toggled role");
        Ok(())
    }

    /// Set a display alias. An empty alias falls back to the column name.
    pub fn set_alias(&mut self, column: &str, alias: &str) -> Result<()> {
        self.require_column(column)?;
        self.config.set_alias(column, alias);
        self.sync_profiles();
        Ok(())
    }

    pub fn set_description(&mut self, column: &str, text: &str) -> Result<()> {
        self.require_column(column)?;
        self.config.set_description(column, text);
        self.sync_profiles();
        Ok(())
    }

    fn require_column(&self, column: &str) -> Result<()> {
        match self.table.dataset().column_index(column) {
            Some(_) => Ok(()),
            None => Err(MivisorError::ColumnNotFound(column.to_string())),
        }
    }

    /// Copy roles, aliases and descriptions from the configuration.
    /// Detected drug flags stand while no drug columns are recorded.
    fn sync_profiles(&mut self) {
        let drugs_recorded = !self.config.drug_columns.is_empty();
        for profile in &mut self.profiles {
            for role in ColumnRole::ALL {
                if role == ColumnRole::Drug && !drugs_recorded {
                    continue;
                }
                profile.set_role(role, self.config.has_role(&profile.name, role));
            }
            profile.alias = self
                .config
                .alias(&profile.name)
                .unwrap_or(profile.name.as_str())
                .to_string();
            profile.description = self
                .config
                .description_of(&profile.name)
                .unwrap_or_default()
                .to_string();
        }
    }

    /// Start grouping a kept column, replacing any unfinished grouping.
    pub fn begin_grouping(&mut self, column: &str) -> Result<&mut GroupingSession> {
        let session = GroupingSession::select(self.table.dataset(), &self.config, column)?;
        Ok(self.grouping.insert(session))
    }

    pub fn grouping(&self) -> Option<&GroupingSession> {
        self.grouping.as_ref()
    }

    pub fn grouping_mut(&mut self) -> Option<&mut GroupingSession> {
        self.grouping.as_mut()
    }

    /// Commit the current grouping as a new kept column.
    ///
    /// On failure the grouping stays open for another attempt.
    pub fn commit_grouping(
        &mut self,
        new_column_name: &str,
        default_value: Option<&str>,
    ) -> Result<usize> {
        let grouping = self
            .grouping
            .as_mut()
            .ok_or_else(|| MivisorError::Validation("no grouping in progress".to_string()))?;

        let index = grouping.commit(&mut self.table, new_column_name, default_value)?;
        self.grouping = None;

        self.config
            .set_column_role(new_column_name.trim(), ColumnRole::Keep, true);
        self.rebuild_profiles();
        Ok(index)
    }

    /// Line profiles up with the dataset columns, reusing existing profiles
    /// by name.
    fn rebuild_profiles(&mut self) {
        let mut previous = std::mem::take(&mut self.profiles);
        self.profiles = self
            .table
            .dataset()
            .column_names()
            .into_iter()
            .enumerate()
            .map(|(position, name)| {
                let mut profile = match previous.iter().position(|p| p.name == name) {
                    Some(i) => previous.swap_remove(i),
                    None => ColumnProfile::new(name, position),
                };
                profile.position = position;
                profile
            })
            .collect();
        self.sync_profiles();
    }

    /// Abandon the current grouping, if any.
    pub fn cancel_grouping(&mut self) {
        if let Some(mut grouping) = self.grouping.take() {
            grouping.cancel();
        }
    }

    /// Write the configuration to the project directory.
    pub fn save_profile(&self) -> Result<()> {
        self.config.save(&self.dir)
    }

    /// Write the full dataset, derived columns included, as CSV.
    pub fn export_dataset(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.table.dataset().write_csv(path)?;
        info!(path = %path.display(), "exported dataset");
        Ok(())
    }
}
