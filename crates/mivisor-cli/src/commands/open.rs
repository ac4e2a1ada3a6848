//! Open command - load a project and classify an imported dataset.

use std::path::PathBuf;

use colored::Colorize;
use mivisor::{ColumnProfile, ImportRequest, ProjectSession};

pub struct OpenArgs {
    pub dir: PathBuf,
    pub import: Option<PathBuf>,
    pub sheet: Option<String>,
    pub save: bool,
    pub export: Option<PathBuf>,
    pub json: bool,
}

pub fn run(args: OpenArgs, registry_dir: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = ProjectSession::open(&args.dir, super::settings(registry_dir))?;

    if let Some(file) = &args.import {
        let request = ImportRequest::for_path(file, args.sheet.as_deref())?;
        session.import(request)?;
    }

    if let Some(path) = &args.export {
        session.export_dataset(path)?;
    }
    if args.save {
        session.save_profile()?;
    }

    if args.json {
        let output = serde_json::json!({
            "project": session.dir(),
            "config": session.config(),
            "source": session.dataset().source(),
            "profiles": session.profiles(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let config = session.config();
    println!(
        "{} {}",
        "Project".cyan().bold(),
        session.dir().display().to_string().white()
    );
    println!("  Description: {}", config.description);
    println!("  Creator:     {}", config.creator);

    if let Some(source) = session.dataset().source() {
        println!();
        print!("{} {}", "Dataset".cyan().bold(), source.file.white());
        if let Some(sheet) = &source.sheet {
            print!(" [{}]", sheet);
        }
        println!(" ({} rows, {} columns)", source.row_count, source.column_count);
        println!();
        print_profiles(session.profiles());
    }

    if args.save {
        println!();
        println!("{}", "Configuration saved".green());
    }
    if let Some(path) = &args.export {
        println!("{} {}", "Exported to".green(), path.display());
    }
    Ok(())
}

fn print_profiles(profiles: &[ColumnProfile]) {
    let width = profiles
        .iter()
        .map(|p| p.name.chars().count())
        .max()
        .unwrap_or(0)
        .max(6);

    println!(
        "{:<width$}  {:<5} {:<4} {:<5} {:<5} {:<8} {}",
        "Column".bold(),
        "keep",
        "key",
        "date",
        "drug",
        "organism",
        "alias",
        width = width
    );
    for profile in profiles {
        let flag = |on: bool| if on { "x".green() } else { "-".dimmed() };
        println!(
            "{:<width$}  {:<5} {:<4} {:<5} {:<5} {:<8} {}",
            profile.name,
            flag(profile.keep),
            flag(profile.key),
            flag(profile.date),
            flag(profile.drug),
            flag(profile.organism),
            profile.alias,
            width = width
        );
    }
}
