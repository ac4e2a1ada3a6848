//! Reference registries shared across projects.
//!
//! ```text
//! <registry dir>/
//! ├── drugs.yaml        # group -> ["name;abbr1,abbr2", ...]
//! └── organisms.yaml    # code -> {code, group, gram, genus, ...}
//! ```
//!
//! Both documents are rewritten in full on save.

mod drug;
mod organism;
mod store;

pub use drug::{DrugEntry, DrugRegistry};
pub use organism::{OrganismEntry, OrganismRegistry};
pub use store::{DRUG_REGISTRY_FILE, ORGANISM_REGISTRY_FILE, RegistryStore};
