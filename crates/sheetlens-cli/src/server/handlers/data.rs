//! Loaded data and selection handlers.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use sheetlens::input::DEFAULT_PAGE_SIZE;
use sheetlens::{Catalogue, RowPage, Selection};

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Response for the columns endpoint.
#[derive(Serialize)]
pub struct ColumnsResponse {
    /// Workbook file name.
    pub file: String,
    /// Field names in column order.
    pub headers: Vec<String>,
    /// Number of data rows.
    pub row_count: usize,
    /// Zero-based index of the detected header row.
    pub header_row: usize,
}

/// Response for the selection endpoints.
#[derive(Serialize)]
pub struct SelectionResponse {
    pub selection: Selection,
    pub revision: u64,
}

/// Get the fields of the data sheet.
pub async fn get_columns(State(state): State<AppState>) -> Json<ColumnsResponse> {
    let session = state.session.read().await;
    let table = session.table();

    Json(ColumnsResponse {
        file: state
            .data_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        headers: table.headers.clone(),
        row_count: table.row_count(),
        header_row: table.header_row,
    })
}

/// Query parameters for the rows endpoint.
#[derive(Debug, Deserialize)]
pub struct RowsQuery {
    #[serde(default = "first_page")]
    pub page: usize,
    #[serde(default = "default_per_page")]
    pub per_page: usize,
}

fn first_page() -> usize {
    1
}

fn default_per_page() -> usize {
    DEFAULT_PAGE_SIZE
}

/// Browse the normalized data rows a page at a time.
pub async fn get_rows(
    State(state): State<AppState>,
    Query(query): Query<RowsQuery>,
) -> Json<RowPage> {
    let session = state.session.read().await;
    Json(session.table().page(query.page, query.per_page))
}

/// Get the variable catalogue.
pub async fn get_dictionary(State(state): State<AppState>) -> Json<Catalogue> {
    let session = state.session.read().await;
    Json(session.catalogue().clone())
}

/// Get the current selection.
pub async fn get_selection(State(state): State<AppState>) -> Json<SelectionResponse> {
    let session = state.session.read().await;
    Json(SelectionResponse {
        selection: session.selection().clone(),
        revision: session.revision(),
    })
}

/// Replace the current selection.
pub async fn set_selection(
    State(state): State<AppState>,
    Json(selection): Json<Selection>,
) -> Result<Json<SelectionResponse>, ApiError> {
    let mut session = state.session.write().await;
    session.set_selection(selection)?;

    Ok(Json(SelectionResponse {
        selection: session.selection().clone(),
        revision: session.revision(),
    }))
}
