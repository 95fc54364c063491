//! Interactive analysis state.
//!
//! A [`Session`] holds the loaded data, its catalogue and the current field
//! selection. Each change to any of them bumps a revision number so callers
//! that compute asynchronously can drop results that were superseded while
//! they were running.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::aggregation::{AggregationEngine, AggregationRequest, AggregationResult, CalculationMode};
use crate::config::SheetlensConfig;
use crate::dictionary::{Catalogue, DictionaryParser};
use crate::error::{Result, SheetlensError};
use crate::input::{NormalizedTable, TableNormalizer, Workbook};
use crate::presentation::{ChartKind, GroupLabels};
use crate::summary::{Summarizer, SummaryRequest};

/// Fields chosen for grouping and aggregation, and the statistic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    #[serde(default)]
    pub reference_fields: Vec<String>,
    #[serde(default)]
    pub observed_fields: Vec<String>,
    #[serde(default)]
    pub mode: CalculationMode,
}

impl Selection {
    /// The aggregation request for this selection.
    pub fn to_request(&self) -> AggregationRequest {
        AggregationRequest::new(
            self.reference_fields.iter().cloned(),
            self.observed_fields.iter().cloned(),
            self.mode,
        )
    }
}

/// One computed aggregation, tagged with the revision it was computed for.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub revision: u64,
    pub request: AggregationRequest,
    pub result: AggregationResult,
    /// Chart kinds admissible for the result.
    pub chart_kinds: Vec<ChartKind>,
}

/// A pending summarization of one [`Analysis`].
pub struct SummaryJob {
    /// Revision of the analysis being summarized.
    pub revision: u64,
    summarizer: Arc<dyn Summarizer>,
    request: SummaryRequest,
}

impl SummaryJob {
    /// The request the summarizer will see.
    pub fn request(&self) -> &SummaryRequest {
        &self.request
    }

    /// Call the summarizer. Failures are logged and yield `None`.
    pub fn run(self) -> Option<String> {
        match self.summarizer.summarize(&self.request) {
            Ok(text) => Some(text),
            Err(e) => {
                warn!(summarizer = self.summarizer.name(), error = %e, "Summary failed");
                None
            }
        }
    }
}

/// Loaded data plus the user's current selection.
pub struct Session {
    config: SheetlensConfig,
    engine: AggregationEngine,
    table: NormalizedTable,
    catalogue: Catalogue,
    selection: Selection,
    revision: u64,
    summarizer: Option<Arc<dyn Summarizer>>,
}

impl Session {
    /// Create an empty session.
    pub fn new(config: SheetlensConfig) -> Self {
        let engine = AggregationEngine::with_config(config.aggregation.clone());
        Self {
            config,
            engine,
            table: NormalizedTable::default(),
            catalogue: Catalogue::new(),
            selection: Selection::default(),
            revision: 0,
            summarizer: None,
        }
    }

    /// Open a session on one sheet of a workbook, with an optional dictionary
    /// sheet. The first sheet is used when `data_sheet` is `None`.
    pub fn from_workbook(
        workbook: &Workbook,
        data_sheet: Option<&str>,
        dictionary_sheet: Option<&str>,
        config: SheetlensConfig,
    ) -> Result<Self> {
        let data_sheet = match data_sheet {
            Some(name) => name,
            None => workbook
                .first_sheet_name()
                .ok_or_else(|| SheetlensError::MalformedSheet("workbook has no sheets".into()))?,
        };

        let normalizer = TableNormalizer::with_config(config.normalizer.clone());
        let table = normalizer.normalize(workbook.sheet(data_sheet)?)?;

        let catalogue = match dictionary_sheet {
            Some(name) => {
                let rows = workbook.sheet(name)?.keyed_rows();
                let catalogue = DictionaryParser::new().parse(&rows);
                if catalogue.is_empty() {
                    info!(sheet = name, "Dictionary sheet has no variable definitions");
                }
                catalogue
            }
            None => Catalogue::new(),
        };

        info!(
            sheet = data_sheet,
            rows = table.row_count(),
            columns = table.column_count(),
            variables = catalogue.len(),
            "Opened session"
        );

        let mut session = Self::new(config);
        session.table = table;
        session.catalogue = catalogue;
        Ok(session)
    }

    /// Attach a summarizer.
    pub fn with_summarizer(mut self, summarizer: impl Summarizer + 'static) -> Self {
        self.summarizer = Some(Arc::new(summarizer));
        self
    }

    /// Attach a shared summarizer.
    pub fn with_shared_summarizer(mut self, summarizer: Arc<dyn Summarizer>) -> Self {
        self.summarizer = Some(summarizer);
        self
    }

    pub fn config(&self) -> &SheetlensConfig {
        &self.config
    }

    pub fn table(&self) -> &NormalizedTable {
        &self.table
    }

    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Current revision; increases with every accepted change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Replace the data table. Selected fields missing from the new table
    /// are dropped from the selection.
    pub fn set_data(&mut self, table: NormalizedTable) {
        self.selection
            .reference_fields
            .retain(|f| table.has_field(f));
        self.selection
            .observed_fields
            .retain(|f| table.has_field(f));
        self.table = table;
        self.bump();
    }

    /// Replace the catalogue.
    pub fn set_catalogue(&mut self, catalogue: Catalogue) {
        self.catalogue = catalogue;
        self.bump();
    }

    /// Add a grouping field. Returns `false` for unknown or already
    /// selected fields.
    pub fn add_reference_field(&mut self, field: &str) -> bool {
        if !self.table.has_field(field) || self.selection.reference_fields.iter().any(|f| f == field)
        {
            return false;
        }
        self.selection.reference_fields.push(field.to_string());
        self.bump();
        true
    }

    /// Remove a grouping field. Returns `false` if it was not selected.
    pub fn remove_reference_field(&mut self, field: &str) -> bool {
        let before = self.selection.reference_fields.len();
        self.selection.reference_fields.retain(|f| f != field);
        let removed = self.selection.reference_fields.len() != before;
        if removed {
            self.bump();
        }
        removed
    }

    /// Add an aggregated field. Returns `false` for unknown or already
    /// selected fields.
    pub fn add_observed_field(&mut self, field: &str) -> bool {
        if !self.table.has_field(field) || self.selection.observed_fields.iter().any(|f| f == field)
        {
            return false;
        }
        self.selection.observed_fields.push(field.to_string());
        self.bump();
        true
    }

    /// Remove an aggregated field. Returns `false` if it was not selected.
    pub fn remove_observed_field(&mut self, field: &str) -> bool {
        let before = self.selection.observed_fields.len();
        self.selection.observed_fields.retain(|f| f != field);
        let removed = self.selection.observed_fields.len() != before;
        if removed {
            self.bump();
        }
        removed
    }

    /// Change the calculation mode.
    pub fn set_mode(&mut self, mode: CalculationMode) {
        if self.selection.mode != mode {
            self.selection.mode = mode;
            self.bump();
        }
    }

    /// Replace the whole selection at once.
    ///
    /// Fails without changing anything if a field is not a header of the
    /// data table. Duplicates are dropped.
    pub fn set_selection(&mut self, selection: Selection) -> Result<()> {
        if let Some(unknown) = selection
            .reference_fields
            .iter()
            .chain(&selection.observed_fields)
            .find(|f| !self.table.has_field(f))
        {
            return Err(SheetlensError::UnknownField(unknown.clone()));
        }

        let request = selection.to_request();
        self.selection = Selection {
            reference_fields: request.reference_fields,
            observed_fields: request.observed_fields,
            mode: request.mode,
        };
        self.bump();
        Ok(())
    }

    /// Recompute the aggregation for the current state.
    pub fn analyze(&self) -> Analysis {
        let request = self.selection.to_request();
        let result = self.engine.aggregate(&self.table.rows, &request);
        if let Some(reason) = result.skipped {
            debug!(?reason, "Aggregation skipped");
        }
        let chart_kinds = ChartKind::available(result.has_non_numeric);

        Analysis {
            revision: self.revision,
            request,
            result,
            chart_kinds,
        }
    }

    /// Whether an analysis still reflects the current state.
    pub fn is_current(&self, analysis: &Analysis) -> bool {
        analysis.revision == self.revision
    }

    /// Tooltip annotations for every group of an analysis.
    pub fn labels(&self, analysis: &Analysis) -> Vec<GroupLabels> {
        analysis
            .result
            .groups
            .iter()
            .map(|g| GroupLabels::for_group(g, &self.catalogue))
            .collect()
    }

    /// Ask the attached summarizer for a prose analysis.
    ///
    /// Returns `None` without a summarizer, for an empty result, or when the
    /// summarizer fails; failures are logged.
    pub fn summarize(&self, analysis: &Analysis, chart: Option<ChartKind>) -> Option<String> {
        self.summary_job(analysis, chart)?.run()
    }

    /// Everything a summary call needs, detached from the session.
    ///
    /// Callers that share the session behind a lock build the job under the
    /// lock and run it after releasing it.
    pub fn summary_job(&self, analysis: &Analysis, chart: Option<ChartKind>) -> Option<SummaryJob> {
        let summarizer = self.summarizer.clone()?;
        if analysis.result.is_empty() {
            return None;
        }

        let mut request = SummaryRequest::build(
            &analysis.result,
            &analysis.request,
            &self.catalogue,
            self.config.summary.sample_size,
        );
        if let Some(kind) = chart {
            request = request.with_chart(ChartKind::resolve(kind, analysis.result.has_non_numeric));
        }

        Some(SummaryJob {
            revision: analysis.revision,
            summarizer,
            request,
        })
    }

    fn bump(&mut self) {
        self.revision += 1;
    }
}
