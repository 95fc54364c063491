//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use sheetlens::{CalculationMode, ChartKind};
use std::path::PathBuf;

/// Sheetlens: group and aggregate spreadsheet data with its data dictionary
#[derive(Parser)]
#[command(name = "sheetlens")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a JSON configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the sheets of a workbook
    Sheets {
        /// Path to the workbook (xlsx, xls, ods, csv, tsv)
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Browse the normalized rows of a data sheet
    Rows {
        /// Path to the workbook
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Data sheet name (default: first sheet)
        #[arg(short, long)]
        sheet: Option<String>,

        /// Page to show, starting at 1
        #[arg(short, long, default_value = "1")]
        page: usize,

        /// Rows per page
        #[arg(long, default_value = "10")]
        per_page: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the variable catalogue of a dictionary sheet
    Dictionary {
        /// Path to the workbook
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Dictionary sheet name
        #[arg(short, long)]
        sheet: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Group rows by reference fields and aggregate observed fields
    Aggregate {
        /// Path to the workbook
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Data sheet name (default: first sheet)
        #[arg(short, long)]
        sheet: Option<String>,

        /// Dictionary sheet name
        #[arg(short, long)]
        dictionary: Option<String>,

        /// Reference field to group by (repeatable)
        #[arg(short, long = "reference", value_name = "FIELD", required = true)]
        reference: Vec<String>,

        /// Observed field to aggregate (repeatable)
        #[arg(short, long = "observed", value_name = "FIELD", required = true)]
        observed: Vec<String>,

        /// Calculation mode (average, sum, count, min, max, median)
        #[arg(short, long, default_value = "average")]
        mode: CalculationMode,

        /// Maximum number of groups (0 = unlimited)
        #[arg(long)]
        max_groups: Option<usize>,

        /// Write the result to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,

        /// Chart the result is meant for (affects the summary)
        #[arg(long)]
        chart: Option<ChartKind>,

        /// Generate a prose summary of the result
        #[arg(long)]
        summarize: bool,

        /// Summarizer to use with --summarize
        #[arg(long, default_value = "mock")]
        llm: SummarizerChoice,
    },

    /// Serve a JSON API for interactive analysis
    Serve {
        /// Path to the workbook
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Data sheet name (default: first sheet)
        #[arg(short, long)]
        sheet: Option<String>,

        /// Dictionary sheet name
        #[arg(short, long)]
        dictionary: Option<String>,

        /// Port for web server
        #[arg(short, long, default_value = "3141")]
        port: u16,

        /// Summarizer for the analysis endpoint
        #[arg(long, default_value = "none")]
        llm: SummarizerChoice,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use table, csv, or json.", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Csv => write!(f, "csv"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Summarizer choice
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SummarizerChoice {
    /// No summaries
    #[default]
    None,
    /// Anthropic Claude API (requires ANTHROPIC_API_KEY)
    Anthropic,
    /// Deterministic offline summaries
    Mock,
}

impl std::str::FromStr for SummarizerChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(SummarizerChoice::None),
            "anthropic" | "claude" => Ok(SummarizerChoice::Anthropic),
            "mock" | "test" => Ok(SummarizerChoice::Mock),
            _ => Err(format!(
                "Unknown summarizer: {}. Use: none, anthropic, or mock.",
                s
            )),
        }
    }
}

impl std::fmt::Display for SummarizerChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SummarizerChoice::None => write!(f, "none"),
            SummarizerChoice::Anthropic => write!(f, "anthropic"),
            SummarizerChoice::Mock => write!(f, "mock"),
        }
    }
}
