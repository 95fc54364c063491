//! Summarizer trait and configuration.

use serde::{Deserialize, Serialize};

use crate::error::Result;

use super::request::SummaryRequest;

/// Default number of groups shown to a summarizer.
pub const DEFAULT_SAMPLE_SIZE: usize = 15;

/// Configuration for summarizers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizerConfig {
    /// Model to use (e.g., "claude-sonnet-4-20250514").
    pub model: String,

    /// Maximum tokens in response.
    pub max_tokens: usize,

    /// Temperature for generation (0.0-1.0).
    pub temperature: f64,

    /// Number of leading groups included in the request.
    pub sample_size: usize,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            model: "claude-sonnet-4-20250514".to_string(),
            max_tokens: 1024,
            temperature: 0.3,
            sample_size: DEFAULT_SAMPLE_SIZE,
        }
    }
}

/// Produces a prose analysis of an aggregation result.
///
/// Implementations must be thread-safe (Send + Sync) so one summarizer can
/// be shared by the HTTP handlers.
pub trait Summarizer: Send + Sync {
    /// Describe the result in a few paragraphs of plain text.
    fn summarize(&self, request: &SummaryRequest) -> Result<String>;

    /// Get the configuration for this summarizer.
    fn config(&self) -> &SummarizerConfig;

    /// Get the name of this summarizer (for logging/debugging).
    fn name(&self) -> &str;
}
