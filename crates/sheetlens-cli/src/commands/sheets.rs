//! Sheets command - list the sheets of a workbook.

use std::path::PathBuf;

use colored::Colorize;
use sheetlens::{SheetlensConfig, TableNormalizer, Workbook};

pub fn run(file: PathBuf, config: SheetlensConfig) -> Result<(), Box<dyn std::error::Error>> {
    let workbook = Workbook::open(&file)?;
    let normalizer = TableNormalizer::with_config(config.normalizer);

    println!(
        "{} {}",
        "Sheets in".cyan().bold(),
        file.display().to_string().white()
    );
    if let Some(source) = workbook.source() {
        println!("  Format: {}  Size: {} bytes", source.format, source.size_bytes);
    }
    println!();

    for (name, sheet) in workbook.sheets() {
        match normalizer.normalize(sheet) {
            Ok(table) => println!(
                "  {}  {} rows, {} columns (header on row {})",
                name.white().bold(),
                table.row_count(),
                table.column_count(),
                table.header_row + 1
            ),
            Err(e) => println!("  {}  {}", name.white().bold(), e.to_string().yellow()),
        }
    }

    Ok(())
}
