//! Finalized aggregation groups.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// How an observed field's emitted value was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueBasis {
    /// Computed from non-negative numeric values under the calculation mode.
    Numeric,
    /// Only non-numeric values were seen; the value is their total tally.
    NonNumeric,
    /// No usable value was seen; the value is zero.
    Empty,
}

/// The most frequent non-numeric value of a field within a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MostFrequent {
    pub value: String,
    pub count: usize,
}

/// Aggregate of one observed field within one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservedStat {
    /// The emitted scalar.
    pub value: f64,
    /// Where `value` came from.
    pub basis: ValueBasis,
    /// Number of numeric values folded into the aggregate.
    pub numeric_count: usize,
    /// Tally of non-numeric values, in first-seen order.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub non_numeric: IndexMap<String, usize>,
    /// Set when only non-numeric values were seen.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_frequent: Option<MostFrequent>,
}

/// One aggregated row, keyed by a unique combination of reference values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    /// Reference values joined with `", "`.
    pub name: String,
    /// Reference values joined with `"/"`.
    pub key: String,
    /// Number of source rows folded into this group.
    pub entry_count: usize,
    /// Raw reference value per reference field.
    pub references: IndexMap<String, String>,
    /// Aggregate per observed field.
    pub observed: IndexMap<String, ObservedStat>,
}

impl Group {
    /// The emitted scalar of an observed field.
    pub fn value(&self, field: &str) -> Option<f64> {
        self.observed.get(field).map(|s| s.value)
    }

    /// The full aggregate of an observed field.
    pub fn stat(&self, field: &str) -> Option<&ObservedStat> {
        self.observed.get(field)
    }

    /// The raw value of a reference field for this group.
    pub fn reference(&self, field: &str) -> Option<&str> {
        self.references.get(field).map(String::as_str)
    }
}
