//! Header detection and row normalization for raw sheets.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SheetlensError};

use super::value::{CellValue, Row};

/// Raw rows of one sheet, as handed over by a spreadsheet reader.
#[derive(Debug, Clone, PartialEq)]
pub enum RawSheet {
    /// Array-of-arrays; the header row still has to be found.
    Positional(Vec<Vec<CellValue>>),
    /// Rows already keyed by field name.
    Keyed(Vec<Row>),
}

impl RawSheet {
    /// Number of raw rows.
    pub fn len(&self) -> usize {
        match self {
            RawSheet::Positional(rows) => rows.len(),
            RawSheet::Keyed(rows) => rows.len(),
        }
    }

    /// Whether the sheet has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Widest row, in columns.
    pub fn width(&self) -> usize {
        match self {
            RawSheet::Positional(rows) => rows.iter().map(|r| column_count(r)).max().unwrap_or(0),
            RawSheet::Keyed(rows) => rows.iter().map(Row::len).max().unwrap_or(0),
        }
    }

    /// Rows keyed by the first non-blank row, with missing cells defaulting
    /// to [`CellValue::Empty`].
    ///
    /// Blank header cells are named `__EMPTY`, `__EMPTY_1`, ... so that every
    /// column stays addressable. Blank rows are skipped.
    pub fn keyed_rows(&self) -> Vec<Row> {
        let rows = match self {
            RawSheet::Keyed(rows) => return rows.clone(),
            RawSheet::Positional(rows) => rows,
        };

        let mut iter = rows.iter().skip_while(|r| column_count(r) == 0);
        let Some(header) = iter.next() else {
            return Vec::new();
        };

        let mut blank_count = 0usize;
        let names: Vec<String> = header[..column_count(header)]
            .iter()
            .map(|cell| {
                let name = cell.to_string().trim().to_string();
                if !name.is_empty() {
                    return name;
                }
                let generated = if blank_count == 0 {
                    "__EMPTY".to_string()
                } else {
                    format!("__EMPTY_{}", blank_count)
                };
                blank_count += 1;
                generated
            })
            .collect();

        iter.filter(|r| column_count(r) > 0)
            .map(|raw| {
                names
                    .iter()
                    .enumerate()
                    .map(|(idx, name)| {
                        let value = raw.get(idx).cloned().unwrap_or(CellValue::Empty);
                        (name.clone(), value)
                    })
                    .collect()
            })
            .collect()
    }
}

/// Header detection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// How many leading rows are scanned for a header.
    pub header_scan_limit: usize,
    /// A header row must have strictly more columns than this.
    pub min_header_columns: usize,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            header_scan_limit: 10,
            min_header_columns: 3,
        }
    }
}

/// A sheet turned into uniform keyed rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedTable {
    /// Field names in column order.
    pub headers: Vec<String>,
    /// Data rows.
    pub rows: Vec<Row>,
    /// Index of the detected header row in the raw sheet.
    #[serde(default)]
    pub header_row: usize,
}

impl NormalizedTable {
    /// Number of data rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of fields.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Whether a field exists.
    pub fn has_field(&self, field: &str) -> bool {
        self.headers.iter().any(|h| h == field)
    }

    /// One page of data rows. Pages are 1-based; page 0 reads as page 1 and
    /// a page past the end is empty.
    pub fn page(&self, page: usize, per_page: usize) -> RowPage {
        let page = page.max(1);
        let per_page = per_page.max(1);
        let start = (page - 1).saturating_mul(per_page).min(self.rows.len());
        let end = start.saturating_add(per_page).min(self.rows.len());

        RowPage {
            page,
            per_page,
            total_rows: self.rows.len(),
            total_pages: self.rows.len().div_ceil(per_page),
            headers: self.headers.clone(),
            rows: self.rows[start..end].to_vec(),
        }
    }
}

/// Rows shown per page when browsing a table.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// A slice of a [`NormalizedTable`] for browsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowPage {
    pub page: usize,
    pub per_page: usize,
    pub total_rows: usize,
    pub total_pages: usize,
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

/// Turns raw sheet rows into a [`NormalizedTable`].
#[derive(Debug, Clone, Default)]
pub struct TableNormalizer {
    config: NormalizerConfig,
}

impl TableNormalizer {
    /// Create a normalizer with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a normalizer with custom configuration.
    pub fn with_config(config: NormalizerConfig) -> Self {
        Self { config }
    }

    /// Normalize a raw sheet.
    pub fn normalize(&self, sheet: &RawSheet) -> Result<NormalizedTable> {
        match sheet {
            RawSheet::Positional(rows) => self.normalize_positional(rows),
            RawSheet::Keyed(rows) => normalize_keyed(rows),
        }
    }

    /// Find the header row: the first of the scanned rows that is wide enough,
    /// otherwise row 0.
    pub fn detect_header_row(&self, rows: &[Vec<CellValue>]) -> usize {
        rows.iter()
            .take(self.config.header_scan_limit)
            .position(|r| column_count(r) > self.config.min_header_columns)
            .unwrap_or(0)
    }

    fn normalize_positional(&self, rows: &[Vec<CellValue>]) -> Result<NormalizedTable> {
        if rows.is_empty() {
            return Err(SheetlensError::MalformedSheet("sheet has no rows".to_string()));
        }

        let header_row = self.detect_header_row(rows);
        let header_cells = &rows[header_row];

        // (column index, field name); columns with a blank header are dropped
        let columns: Vec<(usize, String)> = header_cells
            .iter()
            .enumerate()
            .filter_map(|(idx, cell)| {
                let name = cell.to_string().trim().to_string();
                (!name.is_empty()).then_some((idx, name))
            })
            .collect();

        if columns.is_empty() {
            return Err(SheetlensError::MalformedSheet(format!(
                "header row {} has no column names",
                header_row
            )));
        }

        let headers: IndexSet<String> = columns.iter().map(|(_, name)| name.clone()).collect();

        let data: Vec<Row> = rows[header_row + 1..]
            .iter()
            .filter(|raw| column_count(raw) > 0)
            .map(|raw| {
                let mut row = Row::new();
                for (idx, name) in &columns {
                    if let Some(cell) = raw.get(*idx) {
                        row.insert(name.clone(), cell.clone());
                    }
                }
                row
            })
            .collect();

        debug!(
            header_row,
            columns = headers.len(),
            rows = data.len(),
            "Normalized positional sheet"
        );

        Ok(NormalizedTable {
            headers: headers.into_iter().collect(),
            rows: data,
            header_row,
        })
    }
}

fn normalize_keyed(rows: &[Row]) -> Result<NormalizedTable> {
    let data: Vec<Row> = rows
        .iter()
        .filter(|r| !r.is_empty() && !r.is_blank())
        .cloned()
        .collect();

    if data.is_empty() {
        return Err(SheetlensError::MalformedSheet("sheet has no rows".to_string()));
    }

    let mut headers: IndexSet<String> = IndexSet::new();
    for row in &data {
        for field in row.fields() {
            if !headers.contains(field) {
                headers.insert(field.to_string());
            }
        }
    }

    Ok(NormalizedTable {
        headers: headers.into_iter().collect(),
        rows: data,
        header_row: 0,
    })
}

/// Number of columns once trailing blank cells are trimmed.
fn column_count(row: &[CellValue]) -> usize {
    row.iter().rposition(|c| !c.is_empty()).map_or(0, |idx| idx + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(values: &[&str]) -> Vec<CellValue> {
        values.iter().map(|v| CellValue::text(*v)).collect()
    }

    fn numbered_table(n: usize) -> NormalizedTable {
        NormalizedTable {
            headers: vec!["id".to_string()],
            rows: (0..n).map(|i| [("id", i as f64)].into_iter().collect()).collect(),
            header_row: 0,
        }
    }

    #[test]
    fn test_page_bounds() {
        let table = numbered_table(23);

        let first = table.page(1, DEFAULT_PAGE_SIZE);
        assert_eq!(first.rows.len(), 10);
        assert_eq!(first.total_pages, 3);
        assert_eq!(first.total_rows, 23);

        let last = table.page(3, DEFAULT_PAGE_SIZE);
        assert_eq!(last.rows.len(), 3);
        assert_eq!(last.rows[0].get("id"), Some(&CellValue::Number(20.0)));

        assert!(table.page(4, DEFAULT_PAGE_SIZE).rows.is_empty());
        assert!(table.page(usize::MAX, usize::MAX).rows.is_empty());
        assert_eq!(table.page(0, 0).page, 1);
        assert_eq!(table.page(0, 0).rows.len(), 1);
    }

    #[test]
    fn test_page_of_empty_table() {
        let page = numbered_table(0).page(1, DEFAULT_PAGE_SIZE);
        assert_eq!(page.total_pages, 0);
        assert!(page.rows.is_empty());
    }

    #[test]
    fn test_header_detected_after_title_rows() {
        let rows = vec![
            cells(&["Survey 2024"]),
            cells(&["", "exported", "by"]),
            cells(&["a", "b", "c"]),
            cells(&["id", "country", "year", "score", "medal", "sex"]),
            cells(&["1", "US", "2020", "9.5", "gold", "F"]),
        ];
        let normalizer = TableNormalizer::new();
        assert_eq!(normalizer.detect_header_row(&rows), 3);

        let table = normalizer.normalize(&RawSheet::Positional(rows)).unwrap();
        assert_eq!(table.header_row, 3);
        assert_eq!(table.headers, vec!["id", "country", "year", "score", "medal", "sex"]);
        assert_eq!(table.row_count(), 1);
        assert_eq!(
            table.rows[0].get("medal"),
            Some(&CellValue::Text("gold".to_string()))
        );
    }

    #[test]
    fn test_header_falls_back_to_first_row() {
        let rows = vec![cells(&["a", "b"]), cells(&["1", "2"])];
        let table = TableNormalizer::new()
            .normalize(&RawSheet::Positional(rows))
            .unwrap();
        assert_eq!(table.header_row, 0);
        assert_eq!(table.headers, vec!["a", "b"]);
    }

    #[test]
    fn test_header_beyond_scan_limit_is_ignored() {
        let mut rows: Vec<Vec<CellValue>> = (0..10).map(|_| cells(&["x"])).collect();
        rows.push(cells(&["a", "b", "c", "d"]));
        assert_eq!(TableNormalizer::new().detect_header_row(&rows), 0);
    }

    #[test]
    fn test_short_rows_omit_trailing_fields() {
        let rows = vec![
            cells(&["a", "b", "c", "d"]),
            cells(&["1", "2"]),
        ];
        let table = TableNormalizer::new()
            .normalize(&RawSheet::Positional(rows))
            .unwrap();
        let row = &table.rows[0];
        assert_eq!(row.len(), 2);
        assert!(row.get("c").is_none());
    }

    #[test]
    fn test_blank_header_column_skipped() {
        let rows = vec![
            cells(&["a", "", "c", "d"]),
            cells(&["1", "2", "3", "4"]),
        ];
        let table = TableNormalizer::new()
            .normalize(&RawSheet::Positional(rows))
            .unwrap();
        assert_eq!(table.headers, vec!["a", "c", "d"]);
        assert_eq!(table.rows[0].len(), 3);
    }

    #[test]
    fn test_empty_rows_skipped() {
        let rows = vec![
            cells(&["a", "b", "c", "d"]),
            vec![],
            cells(&["", "", ""]),
            cells(&["1", "2", "3", "4"]),
        ];
        let table = TableNormalizer::new()
            .normalize(&RawSheet::Positional(rows))
            .unwrap();
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn test_empty_sheet_is_malformed() {
        let result = TableNormalizer::new().normalize(&RawSheet::Positional(vec![]));
        assert!(matches!(result, Err(SheetlensError::MalformedSheet(_))));
    }

    #[test]
    fn test_blank_header_row_is_malformed() {
        let rows = vec![cells(&["", ""]), cells(&["1", "2"])];
        let result = TableNormalizer::new().normalize(&RawSheet::Positional(rows));
        assert!(matches!(result, Err(SheetlensError::MalformedSheet(_))));
    }

    #[test]
    fn test_keyed_sheet_headers_union() {
        let rows = vec![
            [("a", "1"), ("b", "2")].into_iter().collect::<Row>(),
            [("a", "3"), ("c", "4")].into_iter().collect::<Row>(),
            Row::new(),
        ];
        let table = TableNormalizer::new()
            .normalize(&RawSheet::Keyed(rows))
            .unwrap();
        assert_eq!(table.headers, vec!["a", "b", "c"]);
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_keyed_rows_from_positional() {
        let sheet = RawSheet::Positional(vec![
            vec![],
            cells(&["Name", "", "Description"]),
            cells(&["AGE", "x", "Age"]),
            cells(&["M"]),
        ]);
        let rows = sheet.keyed_rows();
        assert_eq!(rows.len(), 2);
        let fields: Vec<&str> = rows[0].fields().collect();
        assert_eq!(fields, vec!["Name", "__EMPTY", "Description"]);
        assert_eq!(rows[1].get("Description"), Some(&CellValue::Empty));
    }
}
