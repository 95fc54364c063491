//! Workbook loading: spreadsheets through calamine, delimited text through csv.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use calamine::{DataType, Reader, open_workbook_auto};
use indexmap::IndexMap;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::error::{Result, SheetlensError};

use super::normalizer::RawSheet;
use super::source::SourceMetadata;
use super::value::CellValue;

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Extensions read through the spreadsheet reader.
const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Extensions read as delimited text.
const DELIMITED_EXTENSIONS: &[&str] = &["csv", "tsv", "txt"];

/// All sheets of one input file, in workbook order.
#[derive(Debug, Clone)]
pub struct Workbook {
    sheets: IndexMap<String, RawSheet>,
    source: Option<SourceMetadata>,
}

impl Workbook {
    /// Build a workbook from in-memory sheets.
    pub fn from_sheets<I, S>(sheets: I) -> Self
    where
        I: IntoIterator<Item = (S, RawSheet)>,
        S: Into<String>,
    {
        Self {
            sheets: sheets.into_iter().map(|(n, s)| (n.into(), s)).collect(),
            source: None,
        }
    }

    /// Load a workbook from disk, choosing the reader by file extension.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let mut file = File::open(path).map_err(|e| SheetlensError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut contents = Vec::new();
        file.read_to_end(&mut contents)
            .map_err(|e| SheetlensError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        let (sheets, format) = if SPREADSHEET_EXTENSIONS.contains(&extension.as_str()) {
            (read_spreadsheet(path)?, extension.clone())
        } else if DELIMITED_EXTENSIONS.contains(&extension.as_str()) {
            let delimiter = detect_delimiter(&contents)?;
            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "Sheet1".to_string());
            let mut sheets = IndexMap::new();
            sheets.insert(name, parse_delimited(&contents, delimiter)?);
            let format = match delimiter {
                b'\t' => "tsv",
                b',' => "csv",
                b';' => "csv-semicolon",
                b'|' => "psv",
                _ => "delimited",
            };
            (sheets, format.to_string())
        } else {
            return Err(SheetlensError::UnsupportedFormat(format!(
                "'{}' (expected one of: {}, {})",
                extension,
                SPREADSHEET_EXTENSIONS.join(", "),
                DELIMITED_EXTENSIONS.join(", ")
            )));
        };

        info!(
            path = %path.display(),
            format = %format,
            sheets = sheets.len(),
            "Loaded workbook"
        );

        let source = SourceMetadata::new(
            path.to_path_buf(),
            hash,
            contents.len() as u64,
            format,
            sheets.len(),
        );

        Ok(Self {
            sheets,
            source: Some(source),
        })
    }

    /// Sheet names in workbook order.
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.keys().map(String::as_str).collect()
    }

    /// Get a sheet by name.
    pub fn sheet(&self, name: &str) -> Result<&RawSheet> {
        self.sheets
            .get(name)
            .ok_or_else(|| SheetlensError::SheetNotFound(name.to_string()))
    }

    /// The first sheet, if any.
    pub fn first_sheet_name(&self) -> Option<&str> {
        self.sheets.keys().next().map(String::as_str)
    }

    /// Iterate over `(name, sheet)` pairs.
    pub fn sheets(&self) -> impl Iterator<Item = (&str, &RawSheet)> {
        self.sheets.iter().map(|(n, s)| (n.as_str(), s))
    }

    /// Metadata about the file this workbook was loaded from.
    pub fn source(&self) -> Option<&SourceMetadata> {
        self.source.as_ref()
    }
}

fn read_spreadsheet(path: &Path) -> Result<IndexMap<String, RawSheet>> {
    let mut workbook = open_workbook_auto(path)?;
    let mut sheets = IndexMap::new();

    for name in workbook.sheet_names() {
        let range = workbook.worksheet_range(&name)?;

        // Ranges start at the first used cell; keep column positions aligned
        let leading_columns = range.start().map_or(0, |(_, col)| col as usize);

        let rows: Vec<Vec<CellValue>> = range
            .rows()
            .map(|cells| {
                std::iter::repeat_n(CellValue::Empty, leading_columns)
                    .chain(cells.iter().map(convert_cell))
                    .collect()
            })
            .collect();

        debug!(sheet = %name, rows = rows.len(), "Read worksheet");
        sheets.insert(name, RawSheet::Positional(rows));
    }

    Ok(sheets)
}

fn convert_cell(cell: &DataType) -> CellValue {
    match cell {
        DataType::Int(i) => CellValue::Number(*i as f64),
        DataType::Float(f) => CellValue::Number(*f),
        DataType::DateTime(serial) => CellValue::Number(*serial),
        DataType::String(s) => CellValue::text(s.as_str()),
        DataType::Bool(b) => CellValue::Text(b.to_string()),
        DataType::Empty => CellValue::Empty,
        other => CellValue::text(other.to_string()),
    }
}

/// Parse delimited text into positional rows.
pub(crate) fn parse_delimited(bytes: &[u8], delimiter: u8) -> Result<RawSheet> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().map(|field| CellValue::text(field)).collect());
    }

    Ok(RawSheet::Positional(rows))
}

/// Detect the delimiter by analyzing the first few lines.
fn detect_delimiter(bytes: &[u8]) -> Result<u8> {
    let reader = BufReader::new(bytes);
    let lines: Vec<String> = reader
        .lines()
        .take(10)
        .map_while(|l| l.ok())
        .filter(|l| !l.trim().is_empty())
        .collect();

    if lines.is_empty() {
        return Err(SheetlensError::MalformedSheet("No lines to analyze".to_string()));
    }

    let mut best_delimiter = b',';
    let mut best_score = 0;

    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_delimiter_in_line(line, delim))
            .collect();

        let first_count = counts[0];
        if first_count == 0 {
            continue;
        }

        let consistent = counts.iter().all(|&c| c == first_count);
        let variance: f64 = if counts.len() > 1 {
            let mean = counts.iter().sum::<usize>() as f64 / counts.len() as f64;
            counts.iter().map(|&c| (c as f64 - mean).powi(2)).sum::<f64>() / counts.len() as f64
        } else {
            0.0
        };

        // Tab gets a slight bonus as it's rare inside actual values
        let score = if consistent {
            first_count * 1000 + if delim == b'\t' { 100 } else { 0 }
        } else if variance < 1.0 {
            first_count * 100
        } else {
            first_count
        };

        if score > best_score {
            best_score = score;
            best_delimiter = delim;
        }
    }

    Ok(best_delimiter)
}

/// Count delimiter occurrences in a line, respecting quotes.
fn count_delimiter_in_line(line: &str, delimiter: u8) -> usize {
    let delim_char = delimiter as char;
    let mut count = 0;
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == delim_char && !in_quotes => count += 1,
            _ => {}
        }
    }

    count
}
