//! CLI command implementations.

pub mod new;
pub mod open;
pub mod registry;
pub mod sheets;
pub mod summary;

use std::path::PathBuf;

use mivisor::SessionSettings;

pub(crate) fn settings(registry_dir: PathBuf) -> SessionSettings {
    SessionSettings::default().with_registry_dir(registry_dir)
}
