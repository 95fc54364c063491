//! What a summarizer gets to see.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::aggregation::{AggregationRequest, AggregationResult, CalculationMode};
use crate::dictionary::Catalogue;
use crate::presentation::ChartKind;

/// Placeholder for documented variables with a blank description.
pub const NO_DEFINITION: &str = "No definition available";

/// One group as shown to a summarizer: its name and observed scalars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleGroup {
    pub name: String,
    pub values: IndexMap<String, f64>,
}

/// Input of one summarization call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart_kind: Option<ChartKind>,
    pub mode: CalculationMode,
    pub reference_fields: Vec<String>,
    pub observed_fields: Vec<String>,
    /// `"<name>: <description>"` for each documented active field.
    pub definitions: Vec<String>,
    /// Leading groups of the result.
    pub sample: Vec<SampleGroup>,
    /// Number of groups found, before any group cap was applied.
    pub total_groups: usize,
}

impl SummaryRequest {
    /// Assemble a request from a result and the selection that produced it.
    pub fn build(
        result: &AggregationResult,
        request: &AggregationRequest,
        catalogue: &Catalogue,
        sample_size: usize,
    ) -> Self {
        let definitions = catalogue
            .variables()
            .iter()
            .filter(|v| request.all_fields().any(|f| f == v.name))
            .map(|v| {
                let description = if v.description.trim().is_empty() {
                    NO_DEFINITION
                } else {
                    v.description.as_str()
                };
                format!("{}: {}", v.name, description)
            })
            .collect();

        let sample = result
            .groups
            .iter()
            .take(sample_size)
            .map(|group| SampleGroup {
                name: group.name.clone(),
                values: group
                    .observed
                    .iter()
                    .map(|(field, stat)| (field.clone(), stat.value))
                    .collect(),
            })
            .collect();

        Self {
            chart_kind: None,
            mode: request.mode,
            reference_fields: request.reference_fields.clone(),
            observed_fields: request.observed_fields.clone(),
            definitions,
            sample,
            total_groups: result.total_groups,
        }
    }

    /// Attach the chart the result is displayed as.
    pub fn with_chart(mut self, kind: ChartKind) -> Self {
        self.chart_kind = Some(kind);
        self
    }
}
