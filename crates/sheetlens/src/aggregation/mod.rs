//! Grouping rows by reference fields and aggregating observed fields.

mod accumulator;
pub mod engine;
pub mod group;
pub mod mode;
pub mod numeric;

pub use engine::{
    AggregationConfig, AggregationEngine, AggregationRequest, AggregationResult,
    DEFAULT_MAX_GROUPS, MISSING_REFERENCE, SkipReason, has_non_numeric,
};
pub use group::{Group, MostFrequent, ObservedStat, ValueBasis};
pub use mode::CalculationMode;
pub use numeric::{is_strict_number, parse_leading_number};
