//! Serve command - JSON API for interactive analysis.

use std::path::PathBuf;

use colored::Colorize;
use sheetlens::{Session, SheetlensConfig, Workbook};

use crate::cli::SummarizerChoice;
use crate::server::{app, state::AppState};

pub fn run(
    file: PathBuf,
    sheet: Option<String>,
    dictionary: Option<String>,
    port: u16,
    llm: SummarizerChoice,
    config: SheetlensConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let summarizer = super::build_summarizer(llm, &config.summary)?;

    let workbook = Workbook::open(&file)?;
    let mut session =
        Session::from_workbook(&workbook, sheet.as_deref(), dictionary.as_deref(), config)?;
    let summarizer_name = summarizer.as_ref().map(|s| s.name().to_string());
    if let Some(summarizer) = summarizer {
        session = session.with_shared_summarizer(summarizer);
    }

    let state = AppState::new(session, file.clone(), summarizer_name);

    let url = format!("http://localhost:{}", port);
    println!();
    println!(
        "{} {}",
        "Starting analysis server at".cyan().bold(),
        url.white().bold()
    );
    println!();
    println!("  File: {}", file.display());
    if let Some(name) = &state.summarizer_name {
        println!("  Summarizer: {}", name);
    }
    println!();
    println!("Press {} to stop the server", "Ctrl+C".yellow().bold());
    println!();

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(app::run_server(state, port))?;

    Ok(())
}
