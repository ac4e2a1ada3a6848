//! Mivisor: project setup and column curation for antimicrobial
//! susceptibility datasets.
//!
//! A project is a directory holding `config.yml`. Opening a project and
//! importing a spreadsheet assigns each column its roles (kept, key, date,
//! drug, organism) from the stored configuration and the shared drug
//! registry. Categorical columns can be recoded into coarser groups, which
//! are added as new columns.
//!
//! # Example
//!
//! ```no_run
//! use mivisor::{ImportRequest, ProjectSession, SessionSettings};
//!
//! let settings = SessionSettings::default().with_registry_dir("registries");
//! let mut session = ProjectSession::open("projects/ward-survey", settings).unwrap();
//!
//! let request = ImportRequest::for_path("isolates.xlsx", Some("2023")).unwrap();
//! for profile in session.import(request).unwrap() {
//!     println!("{}: {:?}", profile.name, profile.roles());
//! }
//! session.save_profile().unwrap();
//! ```

pub mod classify;
pub mod error;
pub mod inference;
pub mod input;
pub mod project;
pub mod registry;
pub mod schema;
pub mod table;
pub mod transform;

mod persist;

pub use classify::ColumnClassifier;
pub use error::{MivisorError, Result};
pub use input::{CellValue, Dataset, ImportRequest, ImportWorker, SourceMetadata};
pub use project::{ProjectConfig, ProjectSession, SessionSettings};
pub use registry::{DrugEntry, DrugRegistry, OrganismEntry, OrganismRegistry, RegistryStore};
pub use schema::{ColumnProfile, ColumnRole, ColumnSummary, ColumnType, NumericStatistics};
pub use table::{TableEvent, TableModel};
pub use transform::{compute_derived_column, GroupingSession, GroupingSpec, GroupingState};
