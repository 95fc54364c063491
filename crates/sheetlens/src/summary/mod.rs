//! Optional prose summaries of aggregation results.
//!
//! Summarization never affects aggregation: a failing summarizer is logged
//! and the result stands on its own.
//!
//! # Providers
//!
//! - **Anthropic** - Claude models via API (requires `ANTHROPIC_API_KEY`)
//! - **Mock** - deterministic text, no network

mod anthropic;
mod mock;
mod prompts;
mod provider;
mod request;

pub use anthropic::{API_KEY_VAR, AnthropicSummarizer};
pub use mock::MockSummarizer;
pub use prompts::{summary_prompt, system_prompt};
pub use provider::{DEFAULT_SAMPLE_SIZE, Summarizer, SummarizerConfig};
pub use request::{NO_DEFINITION, SampleGroup, SummaryRequest};
