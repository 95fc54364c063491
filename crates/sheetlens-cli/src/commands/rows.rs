//! Rows command - page through the normalized rows of a data sheet.

use std::path::PathBuf;

use colored::Colorize;
use sheetlens::{SheetlensConfig, TableNormalizer, Workbook};

pub fn run(
    file: PathBuf,
    sheet: Option<String>,
    page: usize,
    per_page: usize,
    json_output: bool,
    config: SheetlensConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let workbook = Workbook::open(&file)?;
    let name = match sheet {
        Some(name) => name,
        None => workbook
            .first_sheet_name()
            .ok_or("Workbook has no sheets")?
            .to_string(),
    };
    let table = TableNormalizer::with_config(config.normalizer).normalize(workbook.sheet(&name)?)?;
    let page = table.page(page, per_page);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&page)?);
        return Ok(());
    }

    println!(
        "{} {} (page {} of {}, {} rows)",
        "Sheet:".cyan().bold(),
        name.white().bold(),
        page.page,
        page.total_pages,
        page.total_rows
    );
    println!();

    if page.rows.is_empty() {
        println!("{} No rows on this page.", "Note:".yellow());
        return Ok(());
    }

    println!("{}", page.headers.join("\t").bold());
    for row in &page.rows {
        let cells: Vec<String> = page
            .headers
            .iter()
            .map(|h| row.get(h).map(|v| v.to_string()).unwrap_or_default())
            .collect();
        println!("{}", cells.join("\t"));
    }

    Ok(())
}
