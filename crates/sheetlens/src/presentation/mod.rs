//! Chart selection rules and tooltip annotations.

mod chart;
mod labels;

pub use chart::ChartKind;
pub use labels::{FieldLabel, GroupLabels, ReferenceLabel};
