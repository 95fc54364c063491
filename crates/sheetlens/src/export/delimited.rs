//! Comma-separated export of aggregation results.

use std::io::Write;

use crate::aggregation::{AggregationRequest, AggregationResult, Group};
use crate::error::Result;
use crate::input::format_number;

/// Prefix of reference-value columns.
pub const REFERENCE_PREFIX: &str = "ref_";

/// Header columns for a request.
pub fn header(request: &AggregationRequest) -> Vec<String> {
    let mut columns = vec![
        "name".to_string(),
        "key".to_string(),
        "entry_count".to_string(),
    ];
    columns.extend(
        request
            .reference_fields
            .iter()
            .map(|f| format!("{}{}", REFERENCE_PREFIX, f)),
    );
    for field in &request.observed_fields {
        columns.push(field.clone());
        columns.push(format!("{}_most_frequent", field));
        columns.push(format!("{}_frequency", field));
    }
    columns
}

/// Write one header line and one line per group.
///
/// Text values are double-quoted with embedded quotes doubled, numbers are
/// written bare and absent values leave the column empty.
pub fn write_delimited<W: Write>(
    result: &AggregationResult,
    request: &AggregationRequest,
    mut writer: W,
) -> Result<()> {
    let io_err = |source| crate::error::SheetlensError::Io {
        path: "<export>".into(),
        source,
    };

    writeln!(writer, "{}", header(request).join(",")).map_err(io_err)?;
    for group in &result.groups {
        writeln!(writer, "{}", record(group, request).join(",")).map_err(io_err)?;
    }
    writer.flush().map_err(io_err)?;
    Ok(())
}

/// Render the export into a string.
pub fn to_delimited_string(result: &AggregationResult, request: &AggregationRequest) -> String {
    let mut out = header(request).join(",");
    out.push('\n');
    for group in &result.groups {
        out.push_str(&record(group, request).join(","));
        out.push('\n');
    }
    out
}

fn record(group: &Group, request: &AggregationRequest) -> Vec<String> {
    let mut fields = vec![
        quote(&group.name),
        quote(&group.key),
        group.entry_count.to_string(),
    ];
    fields.extend(
        request
            .reference_fields
            .iter()
            .map(|f| group.reference(f).map(quote).unwrap_or_default()),
    );
    for field in &request.observed_fields {
        match group.stat(field) {
            Some(stat) => {
                fields.push(format_number(stat.value));
                match &stat.most_frequent {
                    Some(most) => {
                        fields.push(quote(&most.value));
                        fields.push(most.count.to_string());
                    }
                    None => fields.extend([String::new(), String::new()]),
                }
            }
            None => fields.extend([String::new(), String::new(), String::new()]),
        }
    }
    fields
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}
