//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Mivisor: antimicrobial susceptibility project workspace
#[derive(Parser)]
#[command(name = "mivisor")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding drugs.yaml and organisms.yaml
    #[arg(long, global = true, env = "MIVISOR_REGISTRY_DIR")]
    pub registry_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new project directory
    New {
        /// Project directory
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Project name
        #[arg(short, long)]
        name: String,
    },

    /// Open a project, optionally importing a dataset
    Open {
        /// Project directory
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Spreadsheet or CSV/TSV file to import
        #[arg(short, long, value_name = "FILE")]
        import: Option<PathBuf>,

        /// Worksheet to read from a workbook
        #[arg(short, long, requires = "import")]
        sheet: Option<String>,

        /// Write the updated configuration back to config.yml
        #[arg(long)]
        save: bool,

        /// Export the imported dataset as CSV
        #[arg(long, value_name = "FILE", requires = "import")]
        export: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the worksheets of a workbook
    Sheets {
        /// Workbook file (xlsx, xls, ods)
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Summarize one column of an imported dataset
    Summary {
        /// Project directory
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Spreadsheet or CSV/TSV file to import
        #[arg(short, long, value_name = "FILE")]
        import: PathBuf,

        /// Worksheet to read from a workbook
        #[arg(short, long)]
        sheet: Option<String>,

        /// Column to summarize
        #[arg(short, long)]
        column: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the contents of a registry
    Registry {
        /// Which registry to show
        #[arg(value_enum)]
        kind: RegistryKind,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum RegistryKind {
    /// Antimicrobial drugs by group
    Drugs,
    /// Organisms by code
    Organisms,
}
