//! Writing aggregation results to delimited text or JSON.

mod delimited;

use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::aggregation::{AggregationRequest, AggregationResult};
use crate::error::{Result, SheetlensError};

pub use delimited::{REFERENCE_PREFIX, header, to_delimited_string, write_delimited};

/// File format of an export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            _ => Err(format!("Unknown export format: {}. Use csv or json.", s)),
        }
    }
}

/// Pretty-printed JSON of the whole result.
pub fn write_json<W: Write>(result: &AggregationResult, writer: W) -> Result<()> {
    serde_json::to_writer_pretty(writer, result)?;
    Ok(())
}

/// Write an export to `writer`.
pub fn write<W: Write>(
    result: &AggregationResult,
    request: &AggregationRequest,
    format: ExportFormat,
    writer: W,
) -> Result<()> {
    match format {
        ExportFormat::Csv => write_delimited(result, request, writer),
        ExportFormat::Json => write_json(result, writer),
    }
}

/// Write an export to a file, creating parent directories as needed.
pub fn save(
    result: &AggregationResult,
    request: &AggregationRequest,
    format: ExportFormat,
    path: impl AsRef<Path>,
) -> Result<()> {
    let path = path.as_ref();
    let io_err = |source| SheetlensError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
    }

    let file = File::create(path).map_err(io_err)?;
    write(result, request, format, BufWriter::new(file))?;

    info!(path = %path.display(), %format, groups = result.groups.len(), "Exported result");
    Ok(())
}
