//! Sheets command - list the worksheets of a workbook.

use std::path::PathBuf;

use mivisor::input::workbook;

pub fn run(file: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    for name in workbook::sheet_names(&file)? {
        println!("{}", name);
    }
    Ok(())
}
