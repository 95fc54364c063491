//! Sheetlens: data dictionary inference and dynamic group aggregation for
//! spreadsheet datasets.
//!
//! A workbook usually carries a data sheet and, often, a dictionary sheet
//! documenting the variables. Sheetlens finds the header row of the data
//! sheet, reads the dictionary into a catalogue of variables and their coded
//! values, and groups rows by any combination of reference fields while
//! aggregating observed fields with a chosen statistic.
//!
//! # Example
//!
//! ```no_run
//! use sheetlens::{CalculationMode, Session, SheetlensConfig, Workbook};
//!
//! let workbook = Workbook::open("athletes.xlsx").unwrap();
//! let mut session = Session::from_workbook(
//!     &workbook,
//!     Some("Data"),
//!     Some("Dictionary"),
//!     SheetlensConfig::default(),
//! )
//! .unwrap();
//!
//! session.add_reference_field("country");
//! session.add_observed_field("score");
//! session.set_mode(CalculationMode::Median);
//!
//! let analysis = session.analyze();
//! for group in &analysis.result.groups {
//!     println!("{}: {:?}", group.name, group.value("score"));
//! }
//! ```

pub mod aggregation;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod export;
pub mod input;
pub mod presentation;
pub mod summary;

mod session;

pub use aggregation::{
    AggregationConfig, AggregationEngine, AggregationRequest, AggregationResult, CalculationMode,
    Group, ObservedStat, SkipReason, ValueBasis,
};
pub use config::SheetlensConfig;
pub use dictionary::{Catalogue, DictionaryParser, ValueDefinition, VariableDefinition};
pub use error::{Result, SheetlensError};
pub use export::ExportFormat;
pub use input::{CellValue, NormalizedTable, RawSheet, Row, RowPage, TableNormalizer, Workbook};
pub use presentation::{ChartKind, GroupLabels};
pub use session::{Analysis, Selection, Session, SummaryJob};
pub use summary::{AnthropicSummarizer, MockSummarizer, Summarizer, SummarizerConfig};
