//! Aggregate command - group rows and aggregate observed fields.

use std::path::PathBuf;

use colored::Colorize;
use sheetlens::export::{self, ExportFormat};
use sheetlens::input::format_number;
use sheetlens::{
    Analysis, CalculationMode, ChartKind, Selection, Session, SheetlensConfig, ValueBasis, Workbook,
};

use crate::cli::{OutputFormat, SummarizerChoice};

pub struct AggregateArgs {
    pub file: PathBuf,
    pub sheet: Option<String>,
    pub dictionary: Option<String>,
    pub reference: Vec<String>,
    pub observed: Vec<String>,
    pub mode: CalculationMode,
    pub max_groups: Option<usize>,
    pub output: Option<PathBuf>,
    pub format: OutputFormat,
    pub chart: Option<ChartKind>,
    pub summarizer: SummarizerChoice,
    pub config: SheetlensConfig,
}

pub fn run(args: AggregateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = args.config;
    if let Some(max) = args.max_groups {
        config.aggregation.max_groups = (max > 0).then_some(max);
    }
    let summarizer = super::build_summarizer(args.summarizer, &config.summary)?;

    let workbook = Workbook::open(&args.file)?;
    let mut session = Session::from_workbook(
        &workbook,
        args.sheet.as_deref(),
        args.dictionary.as_deref(),
        config,
    )?;
    if let Some(summarizer) = summarizer {
        session = session.with_shared_summarizer(summarizer);
    }

    session.set_selection(Selection {
        reference_fields: args.reference,
        observed_fields: args.observed,
        mode: args.mode,
    })?;

    let analysis = session.analyze();

    if let Some(reason) = analysis.result.skipped {
        println!("{} {}", "Note:".yellow(), reason.message());
        return Ok(());
    }

    if analysis.result.truncated {
        eprintln!(
            "{} Showing the {} most populated of {} groups.",
            "Warning:".yellow().bold(),
            analysis.result.groups.len(),
            analysis.result.total_groups
        );
    }

    match (args.format, &args.output) {
        (OutputFormat::Table, None) => print_table(&analysis),
        (OutputFormat::Table, Some(path)) | (OutputFormat::Csv, Some(path)) => {
            export::save(&analysis.result, &analysis.request, ExportFormat::Csv, path)?;
            println!("Saved {}", path.display().to_string().cyan());
        }
        (OutputFormat::Json, Some(path)) => {
            export::save(&analysis.result, &analysis.request, ExportFormat::Json, path)?;
            println!("Saved {}", path.display().to_string().cyan());
        }
        (OutputFormat::Csv, None) => {
            export::write_delimited(&analysis.result, &analysis.request, std::io::stdout().lock())?;
        }
        (OutputFormat::Json, None) => {
            println!("{}", serde_json::to_string_pretty(&analysis.result)?);
        }
    }

    if let Some(summary) = session.summarize(&analysis, args.chart) {
        let text = render_summary(&summary);
        if data_on_stdout(args.format, args.output.as_ref()) {
            eprint!("{}", text);
        } else {
            print!("{}", text);
        }
    }

    Ok(())
}

/// Whether machine-readable data goes to stdout, which prose must not follow.
fn data_on_stdout(format: OutputFormat, output: Option<&PathBuf>) -> bool {
    output.is_none() && format != OutputFormat::Table
}

fn render_summary(summary: &str) -> String {
    let mut text = format!("\n{}\n", "Summary:".yellow().bold());
    for paragraph in summary.split('\n').filter(|p| !p.trim().is_empty()) {
        text.push_str(&format!("  {}\n", paragraph));
    }
    text
}

fn print_table(analysis: &Analysis) {
    let result = &analysis.result;
    let request = &analysis.request;

    println!(
        "{} {} groups by {} ({} of {})",
        "Result:".cyan().bold(),
        result.groups.len().to_string().white().bold(),
        request.reference_fields.join(", "),
        request.mode,
        request.observed_fields.join(", ")
    );
    if result.has_non_numeric {
        println!(
            "{} Non-numeric values found; only bar and pie charts apply.",
            "Note:".yellow()
        );
    }
    println!();

    for group in &result.groups {
        println!(
            "{}  {}",
            group.name.white().bold(),
            format!("({} entries)", group.entry_count).dimmed()
        );
        for (field, stat) in &group.observed {
            let value = match stat.basis {
                ValueBasis::Numeric => format!("{:.2}", stat.value).green(),
                ValueBasis::NonNumeric => match &stat.most_frequent {
                    Some(most) => format!(
                        "{} values, most common: {} ({})",
                        format_number(stat.value),
                        most.value,
                        most.count
                    )
                    .blue(),
                    None => format_number(stat.value).blue(),
                },
                ValueBasis::Empty => "-".dimmed(),
            };
            println!("    {}: {}", field, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_kept_off_piped_data() {
        assert!(data_on_stdout(OutputFormat::Csv, None));
        assert!(data_on_stdout(OutputFormat::Json, None));
        assert!(!data_on_stdout(OutputFormat::Table, None));

        let path = PathBuf::from("out.csv");
        assert!(!data_on_stdout(OutputFormat::Csv, Some(&path)));
        assert!(!data_on_stdout(OutputFormat::Json, Some(&path)));
    }

    #[test]
    fn test_render_summary_skips_blank_lines() {
        colored::control::set_override(false);
        let text = render_summary("First.\n\nSecond.");
        assert_eq!(text, "\nSummary:\n  First.\n  Second.\n");
    }
}
