//! Summary command - describe or count one column.

use std::path::PathBuf;

use colored::Colorize;
use mivisor::{ColumnSummary, ImportRequest, ProjectSession};

pub fn run(
    dir: PathBuf,
    import: PathBuf,
    sheet: Option<String>,
    column: String,
    json_output: bool,
    registry_dir: PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = ProjectSession::open(&dir, super::settings(registry_dir))?;
    session.import(ImportRequest::for_path(&import, sheet.as_deref())?)?;

    let summary = session.table().summarize(&column)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!(
        "{} {} ({})",
        "Column".cyan().bold(),
        summary.column().white(),
        summary.dtype()
    );
    println!();

    match &summary {
        ColumnSummary::Describe { statistics, .. } => {
            let rows = [
                ("count", statistics.count as f64),
                ("mean", statistics.mean),
                ("std", statistics.std),
                ("min", statistics.min),
                ("25%", statistics.q1),
                ("50%", statistics.median),
                ("75%", statistics.q3),
                ("max", statistics.max),
            ];
            for (label, value) in rows {
                println!("  {:<6} {:>12.4}", label.yellow(), value);
            }
        }
        ColumnSummary::ValueCounts { counts, .. } => {
            let width = counts.keys().map(|k| k.chars().count()).max().unwrap_or(0);
            for (value, count) in counts {
                println!("  {:<width$}  {}", value, count.to_string().white(), width = width);
            }
            if counts.is_empty() {
                println!("  {}", "(no values)".dimmed());
            }
        }
    }
    Ok(())
}
