//! Sheetlens CLI - group and aggregate spreadsheet data.

mod cli;
mod commands;
mod logging;
mod server;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = commands::load_config(cli.config.as_deref()).and_then(|config| match cli.command {
        Commands::Sheets { file } => commands::sheets::run(file, config),

        Commands::Rows {
            file,
            sheet,
            page,
            per_page,
            json,
        } => commands::rows::run(file, sheet, page, per_page, json, config),

        Commands::Dictionary { file, sheet, json } => {
            commands::dictionary::run(file, sheet, json)
        }

        Commands::Aggregate {
            file,
            sheet,
            dictionary,
            reference,
            observed,
            mode,
            max_groups,
            output,
            format,
            chart,
            summarize,
            llm,
        } => commands::aggregate::run(commands::aggregate::AggregateArgs {
            file,
            sheet,
            dictionary,
            reference,
            observed,
            mode,
            max_groups,
            output,
            format,
            chart,
            summarizer: if summarize { llm } else { cli::SummarizerChoice::None },
            config,
        }),

        Commands::Serve {
            file,
            sheet,
            dictionary,
            port,
            llm,
        } => commands::serve::run(file, sheet, dictionary, port, llm, config),
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
