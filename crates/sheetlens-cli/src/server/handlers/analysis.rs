//! Aggregation result handlers.

use axum::{
    Json,
    extract::{Query, State},
    http::header,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use sheetlens::export;
use sheetlens::{AggregationResult, ChartKind, GroupLabels};
use tracing::debug;

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Query parameters for the analysis endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct AnalysisQuery {
    /// Chart the client intends to draw.
    #[serde(default)]
    pub chart: Option<ChartKind>,
    /// Whether to ask the summarizer for a prose summary.
    #[serde(default)]
    pub summarize: bool,
}

/// Response for the analysis endpoint.
#[derive(Serialize)]
pub struct AnalysisResponse {
    pub revision: u64,
    /// False when the selection changed while the summary was running; the
    /// summary is then dropped.
    pub current: bool,
    pub result: AggregationResult,
    /// Chart kinds admissible for the result.
    pub chart_kinds: Vec<ChartKind>,
    /// Requested chart, or its fallback when the data is non-numeric.
    pub chart: ChartKind,
    /// Tooltip annotations, one per group.
    pub labels: Vec<GroupLabels>,
    /// Message explaining an empty result.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// Recompute the aggregation for the current selection.
pub async fn get_analysis(
    State(state): State<AppState>,
    Query(query): Query<AnalysisQuery>,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let session = state.session.clone();

    // Aggregation and summarization block; keep them off the async workers
    let response = tokio::task::spawn_blocking(move || {
        let (mut response, job) = {
            let guard = session.blocking_read();
            let analysis = guard.analyze();
            let chart = ChartKind::resolve(query.chart.unwrap_or_default(), analysis.result.has_non_numeric);
            let job = if query.summarize {
                guard.summary_job(&analysis, Some(chart))
            } else {
                None
            };

            let response = AnalysisResponse {
                revision: analysis.revision,
                current: true,
                labels: guard.labels(&analysis),
                message: analysis.result.skipped.map(|reason| reason.message()),
                chart_kinds: analysis.chart_kinds,
                chart,
                result: analysis.result,
                summary: None,
            };
            (response, job)
        };

        // The summarizer may wait on the network; it runs without the lock
        if let Some(job) = job {
            let summary = job.run();
            response.current = session.blocking_read().revision() == response.revision;
            if response.current {
                response.summary = summary;
            } else {
                debug!(revision = response.revision, "Dropped superseded summary");
            }
        }
        response
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Analysis task failed: {}", e)))?;

    debug!(
        revision = response.revision,
        groups = response.result.groups.len(),
        "Served analysis"
    );

    Ok(Json(response))
}

/// Export the current result as CSV.
pub async fn export_csv(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let session = state.session.clone();

    let body = tokio::task::spawn_blocking(move || {
        let session = session.blocking_read();
        let analysis = session.analyze();
        export::to_delimited_string(&analysis.result, &analysis.request)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Export task failed: {}", e)))?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"analysis.csv\""),
        ],
        body,
    ))
}
