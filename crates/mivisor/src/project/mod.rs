//! Project configuration and the editing session built on it.

mod config;
mod persistence;
mod session;

pub use config::ProjectConfig;
pub use persistence::{config_path, CONFIG_FILE};
pub use session::{ProjectSession, SessionSettings, DEFAULT_PREVIEW_ROWS};
