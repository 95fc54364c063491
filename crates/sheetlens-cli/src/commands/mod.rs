//! CLI command implementations.

pub mod aggregate;
pub mod dictionary;
pub mod rows;
pub mod serve;
pub mod sheets;

use std::path::Path;
use std::sync::Arc;

use sheetlens::{AnthropicSummarizer, MockSummarizer, SheetlensConfig, Summarizer, SummarizerConfig};

use crate::cli::SummarizerChoice;

/// Load the configuration file, or defaults when none is given.
pub fn load_config(path: Option<&Path>) -> Result<SheetlensConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(SheetlensConfig::load(path)?),
        None => Ok(SheetlensConfig::default()),
    }
}

/// Create the chosen summarizer.
pub fn build_summarizer(
    choice: SummarizerChoice,
    config: &SummarizerConfig,
) -> Result<Option<Arc<dyn Summarizer>>, Box<dyn std::error::Error>> {
    let summarizer: Option<Arc<dyn Summarizer>> = match choice {
        SummarizerChoice::None => None,
        SummarizerChoice::Mock => Some(Arc::new(MockSummarizer::with_config(config.clone()))),
        SummarizerChoice::Anthropic => {
            Some(Arc::new(AnthropicSummarizer::from_env(config.clone())?))
        }
    };
    Ok(summarizer)
}
