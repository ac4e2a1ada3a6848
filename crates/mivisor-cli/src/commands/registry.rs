//! Registry command - show the drug or organism registry.

use std::path::PathBuf;

use colored::Colorize;
use mivisor::RegistryStore;

use crate::cli::RegistryKind;

pub fn run(
    kind: RegistryKind,
    json_output: bool,
    registry_dir: PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = RegistryStore::new(registry_dir);

    match kind {
        RegistryKind::Drugs => {
            let drugs = store.load_drugs()?;
            if json_output {
                println!("{}", serde_json::to_string_pretty(&drugs)?);
                return Ok(());
            }
            for (group, entries) in drugs.groups() {
                println!("{}", group.cyan().bold());
                for entry in entries {
                    let abbreviations: Vec<&str> =
                        entry.abbreviations.iter().map(String::as_str).collect();
                    println!("  {:<30} {}", entry.name, abbreviations.join(", ").dimmed());
                }
            }
        }
        RegistryKind::Organisms => {
            let organisms = store.load_organisms()?;
            if json_output {
                println!("{}", serde_json::to_string_pretty(&organisms)?);
                return Ok(());
            }
            for entry in organisms.iter() {
                println!(
                    "{:<10} {:<40} {}",
                    entry.code.cyan(),
                    entry.scientific_name(),
                    entry.gram.dimmed()
                );
            }
            println!();
            println!("{} organisms", organisms.len());
        }
    }
    Ok(())
}
