//! Library configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::aggregation::AggregationConfig;
use crate::error::{Result, SheetlensError};
use crate::input::NormalizerConfig;
use crate::summary::SummarizerConfig;

/// Settings for reading sheets, aggregating and summarizing.
///
/// Every section is optional in the JSON form; missing sections and fields
/// take their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetlensConfig {
    /// Header detection.
    pub normalizer: NormalizerConfig,
    /// Group cap.
    pub aggregation: AggregationConfig,
    /// Summarizer model and sample size.
    pub summary: SummarizerConfig,
}

impl SheetlensConfig {
    /// Load a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| SheetlensError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&text).map_err(|e| {
            SheetlensError::Config(format!("Invalid config '{}': {}", path.display(), e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"aggregation": {{"max_groups": null}}, "summary": {{"sample_size": 5}}}}"#)
            .unwrap();

        let config = SheetlensConfig::load(file.path()).unwrap();
        assert_eq!(config.aggregation.max_groups, None);
        assert_eq!(config.summary.sample_size, 5);
        assert_eq!(config.summary.max_tokens, 1024);
        assert_eq!(config.normalizer.header_scan_limit, 10);
    }

    #[test]
    fn test_default_caps_groups() {
        assert_eq!(SheetlensConfig::default().aggregation.max_groups, Some(100));
    }

    #[test]
    fn test_invalid_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            SheetlensConfig::load(file.path()),
            Err(SheetlensError::Config(_))
        ));
    }
}
