//! Mock summarizer for testing and offline use.

use crate::error::Result;
use crate::input::format_number;

use super::provider::{Summarizer, SummarizerConfig};
use super::request::SummaryRequest;

/// Summarizer that describes the result deterministically without a model.
pub struct MockSummarizer {
    config: SummarizerConfig,
}

impl MockSummarizer {
    /// Create a new mock summarizer.
    pub fn new() -> Self {
        Self {
            config: SummarizerConfig::default(),
        }
    }

    /// Create with custom configuration.
    pub fn with_config(config: SummarizerConfig) -> Self {
        Self { config }
    }
}

impl Default for MockSummarizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Summarizer for MockSummarizer {
    fn summarize(&self, request: &SummaryRequest) -> Result<String> {
        let mut paragraphs = vec![format!(
            "The {} shows the {} of {} across {} groups of {}.",
            request
                .chart_kind
                .map(|k| format!("{} chart", k))
                .unwrap_or_else(|| "table".to_string()),
            request.mode,
            request.observed_fields.join(", "),
            request.total_groups,
            request.reference_fields.join(", "),
        )];

        for field in &request.observed_fields {
            let highest = request
                .sample
                .iter()
                .filter_map(|g| g.values.get(field).map(|v| (g, *v)))
                .fold(None, |best: Option<(_, f64)>, (g, v)| match best {
                    Some((_, b)) if b >= v => best,
                    _ => Some((g, v)),
                });
            if let Some((group, value)) = highest {
                paragraphs.push(format!(
                    "{} peaks at {} for {}.",
                    field,
                    format_number(value),
                    group.name
                ));
            }
        }

        Ok(paragraphs.join("\n\n"))
    }

    fn config(&self) -> &SummarizerConfig {
        &self.config
    }

    fn name(&self) -> &str {
        "mock"
    }
}
