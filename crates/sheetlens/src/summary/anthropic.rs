//! Anthropic Claude summarizer.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde_json::json;

use crate::error::{Result, SheetlensError};

use super::prompts;
use super::provider::{Summarizer, SummarizerConfig};
use super::request::SummaryRequest;

/// Anthropic API endpoint.
const API_URL: &str = "https://api.anthropic.com/v1/messages";

/// Anthropic API version.
const API_VERSION: &str = "2023-06-01";

/// Environment variable holding the API key.
pub const API_KEY_VAR: &str = "ANTHROPIC_API_KEY";

/// Summarizer backed by the Anthropic messages API.
pub struct AnthropicSummarizer {
    client: Client,
    api_key: String,
    config: SummarizerConfig,
}

impl AnthropicSummarizer {
    /// Create a summarizer with the given API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(api_key, SummarizerConfig::default())
    }

    /// Create a summarizer with custom configuration.
    pub fn with_config(api_key: impl Into<String>, config: SummarizerConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| SheetlensError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            config,
        })
    }

    /// Create from the `ANTHROPIC_API_KEY` environment variable.
    pub fn from_env(config: SummarizerConfig) -> Result<Self> {
        let api_key = std::env::var(API_KEY_VAR).map_err(|_| {
            SheetlensError::Config(format!("{} environment variable not set", API_KEY_VAR))
        })?;
        Self::with_config(api_key, config)
    }

    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(&self.api_key)
                .map_err(|e| SheetlensError::Config(format!("Invalid API key: {}", e)))?,
        );
        headers.insert("anthropic-version", HeaderValue::from_static(API_VERSION));
        Ok(headers)
    }

    fn send_message(&self, user_prompt: &str) -> Result<String> {
        let body = json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "system": prompts::system_prompt(),
            "messages": [
                {
                    "role": "user",
                    "content": user_prompt
                }
            ]
        });

        let response = self
            .client
            .post(API_URL)
            .headers(self.build_headers()?)
            .json(&body)
            .send()
            .map_err(|e| SheetlensError::Summary(format!("API request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().unwrap_or_default();
            return Err(SheetlensError::Summary(format!(
                "API error ({}): {}",
                status, error_text
            )));
        }

        let api_response: ApiResponse = response
            .json()
            .map_err(|e| SheetlensError::Summary(format!("Failed to parse API response: {}", e)))?;

        extract_text(api_response)
    }
}

impl Summarizer for AnthropicSummarizer {
    fn summarize(&self, request: &SummaryRequest) -> Result<String> {
        let prompt = prompts::summary_prompt(request);
        let response = self.send_message(&prompt)?;
        Ok(response.trim().to_string())
    }

    fn config(&self) -> &SummarizerConfig {
        &self.config
    }

    fn name(&self) -> &str {
        "anthropic"
    }
}

/// First text block of a response.
fn extract_text(response: ApiResponse) -> Result<String> {
    response
        .content
        .into_iter()
        .find(|block| block.content_type == "text")
        .map(|block| block.text)
        .ok_or_else(|| SheetlensError::Summary("No text in API response".to_string()))
}

/// Anthropic API response structure.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    content: Vec<ContentBlock>,
}

/// Content block in API response.
#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    #[serde(default)]
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_first_text_block() {
        let response: ApiResponse = serde_json::from_str(
            r#"{"content": [{"type": "tool_use"}, {"type": "text", "text": "Scores rise."}]}"#,
        )
        .unwrap();
        assert_eq!(extract_text(response).unwrap(), "Scores rise.");
    }

    #[test]
    fn test_missing_text_is_summary_error() {
        let response: ApiResponse = serde_json::from_str(r#"{"content": []}"#).unwrap();
        assert!(matches!(extract_text(response), Err(SheetlensError::Summary(_))));
    }

    #[test]
    fn test_headers_carry_version() {
        let summarizer = AnthropicSummarizer {
            client: Client::new(),
            api_key: "test".to_string(),
            config: SummarizerConfig::default(),
        };
        let headers = summarizer.build_headers().unwrap();
        assert_eq!(headers.get("anthropic-version").unwrap(), API_VERSION);
    }
}
