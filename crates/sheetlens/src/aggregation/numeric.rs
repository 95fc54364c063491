//! Lenient and strict numeric readings of cell values.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::input::CellValue;

/// Longest numeric prefix, the way spreadsheet scripts parse floats.
static LEADING_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:Infinity|(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)")
        .expect("leading number pattern is valid")
});

/// Read a number from the start of a value: `"12 kg"` reads as 12,
/// `"kg 12"` does not read at all. Blank cells never read.
pub fn parse_leading_number(value: &CellValue) -> Option<f64> {
    match value {
        CellValue::Number(n) if n.is_nan() => None,
        CellValue::Number(n) => Some(*n),
        CellValue::Text(s) => {
            let m = LEADING_NUMBER.find(s.trim_start())?;
            m.as_str().parse::<f64>().ok()
        }
        CellValue::Empty => None,
    }
}

/// Whether the whole value is a finite number.
pub fn is_strict_number(value: &CellValue) -> bool {
    match value {
        CellValue::Number(n) => n.is_finite(),
        CellValue::Text(s) => s.trim().parse::<f64>().is_ok_and(f64::is_finite),
        CellValue::Empty => false,
    }
}
