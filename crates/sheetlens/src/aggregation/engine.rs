//! Dynamic grouping and aggregation.
//!
//! Every call runs three passes over the rows: group discovery, value
//! accumulation and finalization. Nothing is cached between calls; callers
//! re-run the whole aggregation whenever the rows, the field selection or the
//! calculation mode change.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::input::Row;

use super::accumulator::GroupAccumulator;
use super::group::Group;
use super::mode::CalculationMode;
use super::numeric::is_strict_number;

/// Placeholder for a reference field that is absent or blank in a row.
pub const MISSING_REFERENCE: &str = "N/A";

/// Default cap on the number of groups returned.
pub const DEFAULT_MAX_GROUPS: usize = 100;

/// Aggregation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    /// Maximum number of groups returned (None = unlimited). When exceeded the
    /// most populated groups are kept.
    pub max_groups: Option<usize>,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            max_groups: Some(DEFAULT_MAX_GROUPS),
        }
    }
}

/// Which fields to group by, which to aggregate, and how.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationRequest {
    /// Fields defining the groups, in order.
    pub reference_fields: Vec<String>,
    /// Fields aggregated within each group, in order.
    pub observed_fields: Vec<String>,
    /// Statistic applied to numeric values.
    #[serde(default)]
    pub mode: CalculationMode,
}

impl AggregationRequest {
    /// Build a request; duplicate field names are dropped, keeping the first.
    pub fn new<R, O, S1, S2>(reference_fields: R, observed_fields: O, mode: CalculationMode) -> Self
    where
        R: IntoIterator<Item = S1>,
        O: IntoIterator<Item = S2>,
        S1: Into<String>,
        S2: Into<String>,
    {
        Self {
            reference_fields: dedup(reference_fields.into_iter().map(Into::into)),
            observed_fields: dedup(observed_fields.into_iter().map(Into::into)),
            mode,
        }
    }

    /// Reference and observed fields, in that order.
    pub fn all_fields(&self) -> impl Iterator<Item = &str> {
        self.reference_fields
            .iter()
            .chain(self.observed_fields.iter())
            .map(String::as_str)
    }
}

/// Why an aggregation produced nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    NoRows,
    NoReferenceFields,
    NoObservedFields,
}

impl SkipReason {
    /// Prompt shown instead of a result.
    pub fn message(&self) -> &'static str {
        match self {
            SkipReason::NoRows => "The selected sheet has no data rows.",
            SkipReason::NoReferenceFields => "Select at least one reference field.",
            SkipReason::NoObservedFields => "Select at least one observed field.",
        }
    }
}

/// Output of one aggregation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationResult {
    /// Finalized groups: discovery order, or most populated first when truncated.
    pub groups: Vec<Group>,
    /// Number of distinct groups before truncation.
    pub total_groups: usize,
    /// Whether groups were dropped by the group cap.
    pub truncated: bool,
    /// Whether any present observed value failed a strict numeric parse.
    pub has_non_numeric: bool,
    /// Set when prerequisites were unmet and nothing was computed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<SkipReason>,
}

impl AggregationResult {
    fn skipped(reason: SkipReason) -> Self {
        Self {
            groups: Vec::new(),
            total_groups: 0,
            truncated: false,
            has_non_numeric: false,
            skipped: Some(reason),
        }
    }

    /// Whether no groups were produced.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total rows across the returned groups.
    pub fn entry_total(&self) -> usize {
        self.groups.iter().map(|g| g.entry_count).sum()
    }
}

/// Groups rows by reference fields and aggregates observed fields.
#[derive(Debug, Clone, Default)]
pub struct AggregationEngine {
    config: AggregationConfig,
}

impl AggregationEngine {
    /// Create an engine with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with custom configuration.
    pub fn with_config(config: AggregationConfig) -> Self {
        Self { config }
    }

    /// Run the aggregation.
    pub fn aggregate(&self, rows: &[Row], request: &AggregationRequest) -> AggregationResult {
        if request.observed_fields.is_empty() {
            return AggregationResult::skipped(SkipReason::NoObservedFields);
        }
        if request.reference_fields.is_empty() {
            return AggregationResult::skipped(SkipReason::NoReferenceFields);
        }
        if rows.is_empty() {
            return AggregationResult::skipped(SkipReason::NoRows);
        }

        // Pass 1: discover groups in first-seen order. Rows whose joined key
        // matches share a group; the first row supplies its reference values.
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut accumulators: Vec<GroupAccumulator> = Vec::new();
        let row_groups: Vec<usize> = rows
            .iter()
            .map(|row| {
                let parts = reference_parts(row, &request.reference_fields);
                *index.entry(parts.join("/")).or_insert_with(|| {
                    accumulators.push(GroupAccumulator::new(
                        parts,
                        &request.reference_fields,
                        &request.observed_fields,
                    ));
                    accumulators.len() - 1
                })
            })
            .collect();

        // Pass 2: fold every row into its group
        for (row, &group) in rows.iter().zip(&row_groups) {
            accumulators[group].fold(row);
        }

        // Pass 3: finalize, dropping scratch state
        let mut groups: Vec<Group> = accumulators
            .into_iter()
            .map(|acc| acc.finish(request.mode))
            .collect();

        let total_groups = groups.len();
        let truncated = match self.config.max_groups {
            Some(cap) if total_groups > cap => {
                groups.sort_by(|a, b| b.entry_count.cmp(&a.entry_count));
                groups.truncate(cap);
                warn!(
                    total_groups,
                    shown = cap,
                    "Too many combinations, keeping the most populated groups"
                );
                true
            }
            _ => false,
        };

        let has_non_numeric = has_non_numeric(rows, &request.observed_fields);

        debug!(
            rows = rows.len(),
            groups = total_groups,
            mode = %request.mode,
            has_non_numeric,
            "Aggregated rows"
        );

        AggregationResult {
            groups,
            total_groups,
            truncated,
            has_non_numeric,
            skipped: None,
        }
    }
}

/// Stringified reference values of a row, in reference-field order.
fn reference_parts(row: &Row, fields: &[String]) -> Vec<String> {
    fields
        .iter()
        .map(|field| match row.get(field) {
            Some(value) if !value.is_empty() => value.to_string(),
            _ => MISSING_REFERENCE.to_string(),
        })
        .collect()
}

/// Whether any present observed value is not strictly numeric.
pub fn has_non_numeric(rows: &[Row], observed_fields: &[String]) -> bool {
    rows.iter().any(|row| {
        observed_fields.iter().any(|field| {
            row.get(field)
                .is_some_and(|v| !v.is_empty() && !is_strict_number(v))
        })
    })
}

fn dedup(fields: impl Iterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for field in fields {
        if !out.contains(&field) {
            out.push(field);
        }
    }
    out
}
