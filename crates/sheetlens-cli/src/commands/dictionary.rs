//! Dictionary command - print the variable catalogue of a dictionary sheet.

use std::path::PathBuf;

use colored::Colorize;
use sheetlens::{DictionaryParser, Workbook};

pub fn run(file: PathBuf, sheet: String, json_output: bool) -> Result<(), Box<dyn std::error::Error>> {
    let workbook = Workbook::open(&file)?;
    let rows = workbook.sheet(&sheet)?.keyed_rows();
    let catalogue = DictionaryParser::new().parse(&rows);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&catalogue)?);
        return Ok(());
    }

    if catalogue.is_empty() {
        println!(
            "{} No variable definitions found in sheet '{}'.",
            "Note:".yellow(),
            sheet
        );
        return Ok(());
    }

    println!(
        "{} {} variables",
        "Dictionary:".cyan().bold(),
        catalogue.len().to_string().white().bold()
    );
    println!();

    for variable in catalogue.variables() {
        println!("{}  {}", variable.name.white().bold(), variable.description);
        for value in &variable.values {
            println!("    {} = {}", value.value.green(), value.description.dimmed());
        }
    }

    Ok(())
}
