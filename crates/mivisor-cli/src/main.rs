//! Mivisor CLI - project launcher and dataset inspection.

mod cli;
mod commands;
mod logging;

use std::path::PathBuf;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let registry_dir = cli.registry_dir.unwrap_or_else(|| PathBuf::from("."));

    let result = match cli.command {
        Commands::New { dir, name } => commands::new::run(dir, name, registry_dir),

        Commands::Open {
            dir,
            import,
            sheet,
            save,
            export,
            json,
        } => commands::open::run(
            commands::open::OpenArgs {
                dir,
                import,
                sheet,
                save,
                export,
                json,
            },
            registry_dir,
        ),

        Commands::Sheets { file } => commands::sheets::run(file),

        Commands::Summary {
            dir,
            import,
            sheet,
            column,
            json,
        } => commands::summary::run(dir, import, sheet, column, json, registry_dir),

        Commands::Registry { kind, json } => commands::registry::run(kind, json, registry_dir),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
