//! New command - create a project directory.

use std::path::PathBuf;

use colored::Colorize;
use mivisor::ProjectSession;

pub fn run(
    dir: PathBuf,
    name: String,
    registry_dir: PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    let session = ProjectSession::create(&dir, &name, super::settings(registry_dir))?;
    let config = session.config();

    println!("{} {}", "Created project".green().bold(), dir.display());
    println!("  Description: {}", config.description);
    if !config.creator.is_empty() {
        println!("  Creator:     {}", config.creator);
    }
    Ok(())
}
