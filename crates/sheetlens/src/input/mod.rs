//! Workbook reading and sheet normalization.

mod normalizer;
mod source;
mod value;
mod workbook;

pub use normalizer::{
    DEFAULT_PAGE_SIZE, NormalizedTable, NormalizerConfig, RawSheet, RowPage, TableNormalizer,
};
pub use source::SourceMetadata;
pub use value::{CellValue, Row, format_number};
pub use workbook::Workbook;
