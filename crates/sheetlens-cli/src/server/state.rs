//! Application state for the web server.

use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

use sheetlens::Session;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// The analysis session; writers bump its revision.
    pub session: Arc<RwLock<Session>>,
    /// Path to the workbook being analyzed.
    pub data_path: PathBuf,
    /// Name of the configured summarizer (for display).
    pub summarizer_name: Option<String>,
}

impl AppState {
    /// Create new application state.
    pub fn new(session: Session, data_path: PathBuf, summarizer_name: Option<String>) -> Self {
        Self {
            session: Arc::new(RwLock::new(session)),
            data_path,
            summarizer_name,
        }
    }
}
