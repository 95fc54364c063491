//! Integration tests for Sheetlens.

use std::io::Write;
use tempfile::NamedTempFile;

use sheetlens::export::{self, ExportFormat};
use sheetlens::{
    CalculationMode, ChartKind, MockSummarizer, Selection, Session, SheetlensConfig,
    SheetlensError, SkipReason, ValueBasis, Workbook,
};

/// Helper to create a temporary file with given content and suffix.
fn create_test_file(content: &str, suffix: &str) -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(suffix).expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write to temp file");
    file
}

const ATHLETES: &str = "Athlete results,,,,\n\
                        ,,,,\n\
                        country,year,sport,score,medal\n\
                        US,2020,swim,9.5,gold\n\
                        US,2020,swim,8.0,gold\n\
                        US,2020,run,7.5,silver\n\
                        FR,2020,run,,bronze\n\
                        FR,2024,swim,-1,\n\
                        ,2024,run,6.0,gold\n";

fn open_session(content: &str) -> (NamedTempFile, Session) {
    let file = create_test_file(content, ".csv");
    let workbook = Workbook::open(file.path()).expect("Failed to open workbook");
    let session = Session::from_workbook(&workbook, None, None, SheetlensConfig::default())
        .expect("Failed to open session");
    (file, session)
}

// =============================================================================
// Loading
// =============================================================================

#[test]
fn test_header_row_found_below_title() {
    let (_file, session) = open_session(ATHLETES);

    assert_eq!(session.table().header_row, 2);
    assert_eq!(
        session.table().headers,
        vec!["country", "year", "sport", "score", "medal"]
    );
    assert_eq!(session.table().row_count(), 6);
}

#[test]
fn test_workbook_metadata() {
    let file = create_test_file(ATHLETES, ".csv");
    let workbook = Workbook::open(file.path()).unwrap();

    let source = workbook.source().expect("CSV workbooks carry metadata");
    assert_eq!(source.format, "csv");
    assert_eq!(source.sheet_count, 1);
    assert!(source.hash.starts_with("sha256:"));
    assert_eq!(workbook.sheet_names().len(), 1);
}

#[test]
fn test_semicolon_file() {
    let content = "a;b;c;d\n1;x;2;3\n4;y;5;6\n";
    let (_file, session) = open_session(content);
    assert_eq!(session.table().headers, vec!["a", "b", "c", "d"]);
    assert_eq!(session.table().row_count(), 2);
}

#[test]
fn test_missing_file() {
    let err = Workbook::open("/nonexistent/athletes.csv").unwrap_err();
    assert!(matches!(err, SheetlensError::Io { .. }));
}

// =============================================================================
// Aggregation
// =============================================================================

#[test]
fn test_group_by_country_and_year() {
    let (_file, mut session) = open_session(ATHLETES);
    session.add_reference_field("country");
    session.add_reference_field("year");
    session.add_observed_field("score");
    session.set_mode(CalculationMode::Sum);

    let analysis = session.analyze();
    let keys: Vec<&str> = analysis.result.groups.iter().map(|g| g.key.as_str()).collect();
    assert_eq!(keys, vec!["US/2020", "FR/2020", "FR/2024", "N/A/2024"]);

    let us = &analysis.result.groups[0];
    assert_eq!(us.entry_count, 3);
    assert_eq!(us.value("score"), Some(25.0));

    // Blank and negative scores count as entries only
    let fr_2020 = &analysis.result.groups[1];
    assert_eq!(fr_2020.entry_count, 1);
    assert_eq!(fr_2020.stat("score").unwrap().basis, ValueBasis::Empty);
    let fr_2024 = &analysis.result.groups[2];
    assert_eq!(fr_2024.stat("score").unwrap().numeric_count, 0);

    let total: usize = analysis.result.groups.iter().map(|g| g.entry_count).sum();
    assert_eq!(total, session.table().row_count());
}

#[test]
fn test_categorical_field_restricts_charts() {
    let (_file, mut session) = open_session(ATHLETES);
    session.add_reference_field("sport");
    session.add_observed_field("medal");
    session.set_mode(CalculationMode::Median);

    let analysis = session.analyze();
    assert!(analysis.result.has_non_numeric);
    assert_eq!(analysis.chart_kinds, vec![ChartKind::Bar, ChartKind::Pie]);

    let swim = &analysis.result.groups[0];
    let stat = swim.stat("medal").unwrap();
    assert_eq!(stat.basis, ValueBasis::NonNumeric);
    assert_eq!(stat.value, 2.0);
    assert_eq!(stat.most_frequent.as_ref().unwrap().value, "gold");
}

#[test]
fn test_recompute_is_idempotent() {
    let (_file, mut session) = open_session(ATHLETES);
    session
        .set_selection(Selection {
            reference_fields: vec!["sport".into()],
            observed_fields: vec!["score".into(), "medal".into()],
            mode: CalculationMode::Average,
        })
        .unwrap();

    let first = session.analyze();
    let second = session.analyze();
    assert_eq!(first.result, second.result);
    assert_eq!(first.revision, second.revision);
}

#[test]
fn test_no_observed_fields_skips() {
    let (_file, mut session) = open_session(ATHLETES);
    session.add_reference_field("country");
    let analysis = session.analyze();
    assert!(analysis.result.groups.is_empty());
    assert_eq!(analysis.result.skipped, Some(SkipReason::NoObservedFields));
}

// =============================================================================
// Export and summary
// =============================================================================

#[test]
fn test_export_csv_round_trip_through_reader() {
    let (_file, mut session) = open_session(ATHLETES);
    session.add_reference_field("country");
    session.add_observed_field("score");
    let analysis = session.analyze();

    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("scores.csv");
    export::save(&analysis.result, &analysis.request, ExportFormat::Csv, &path).unwrap();

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(&headers[3], "ref_country");
    assert_eq!(reader.records().count(), analysis.result.groups.len());
}

#[test]
fn test_summary_with_mock() {
    let file = create_test_file(ATHLETES, ".csv");
    let workbook = Workbook::open(file.path()).unwrap();
    let mut session = Session::from_workbook(&workbook, None, None, SheetlensConfig::default())
        .unwrap()
        .with_summarizer(MockSummarizer::new());
    session.add_reference_field("country");
    session.add_observed_field("score");
    session.set_mode(CalculationMode::Max);

    let analysis = session.analyze();
    let summary = session.summarize(&analysis, Some(ChartKind::Line)).unwrap();
    assert!(summary.contains("line chart"));
    assert!(summary.contains("score peaks at 9.5 for US."));
}
