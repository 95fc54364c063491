//! Axum application setup.

use axum::{
    Router,
    routing::get,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use super::handlers;
use super::state::AppState;

/// Create the Axum router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration for local development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Loaded data
        .route("/columns", get(handlers::get_columns))
        .route("/rows", get(handlers::get_rows))
        .route("/dictionary", get(handlers::get_dictionary))
        // Selection
        .route(
            "/selection",
            get(handlers::get_selection).post(handlers::set_selection),
        )
        // Results
        .route("/analysis", get(handlers::get_analysis))
        .route("/export.csv", get(handlers::export_csv));

    Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(state)
}

/// Start the web server and run until Ctrl+C.
pub async fn run_server(state: AppState, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(state);
    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], port));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            println!();
            println!("Shutting down...");
        })
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use serde_json::{Value, json};
    use sheetlens::summary::SummaryRequest;
    use sheetlens::{
        CellValue, MockSummarizer, RawSheet, Session, SheetlensConfig, Summarizer,
        SummarizerConfig, Workbook,
    };
    use std::sync::{Mutex, mpsc};
    use std::time::Duration;
    use tower::ServiceExt;

    fn session_with_rows(extra: usize) -> Session {
        let text = |s: &str| CellValue::from(s);
        let mut rows = vec![
            vec![text("team"), text("season"), text("points"), text("result")],
            vec![text("A"), text("2023"), CellValue::from(3.0), text("win")],
            vec![text("A"), text("2024"), CellValue::from(1.0), text("draw")],
            vec![text("B"), text("2024"), CellValue::from(0.0), text("loss")],
        ];
        for i in 0..extra {
            rows.push(vec![text("C"), text("2025"), CellValue::from(i as f64), text("win")]);
        }
        let workbook = Workbook::from_sheets([("games", RawSheet::Positional(rows))]);
        Session::from_workbook(&workbook, None, None, SheetlensConfig::default()).unwrap()
    }

    fn state() -> AppState {
        let session = session_with_rows(0).with_summarizer(MockSummarizer::new());
        AppState::new(session, "games.xlsx".into(), Some("mock".to_string()))
    }

    /// Signals when a summary starts and holds it until released.
    struct GatedSummarizer {
        config: SummarizerConfig,
        started: Mutex<mpsc::Sender<()>>,
        release: Mutex<mpsc::Receiver<()>>,
    }

    impl Summarizer for GatedSummarizer {
        fn summarize(&self, _request: &SummaryRequest) -> sheetlens::Result<String> {
            self.started.lock().unwrap().send(()).unwrap();
            self.release.lock().unwrap().recv().unwrap();
            Ok("Summary of an old selection".to_string())
        }

        fn config(&self) -> &SummarizerConfig {
            &self.config
        }

        fn name(&self) -> &str {
            "gated"
        }
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_selection(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/selection")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_columns() {
        let (status, body) = send(create_router(state()), get("/api/columns")).await;
        assert_eq!(status, StatusCode::OK);
        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["headers"], json!(["team", "season", "points", "result"]));
        assert_eq!(value["row_count"], 3);
        assert_eq!(value["file"], "games.xlsx");
    }

    #[tokio::test]
    async fn test_analysis_follows_selection() {
        let state = state();

        let (status, body) = send(create_router(state.clone()), get("/api/analysis")).await;
        assert_eq!(status, StatusCode::OK);
        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["result"]["skipped"], "no_observed_fields");

        let (status, _) = send(
            create_router(state.clone()),
            post_selection(json!({
                "reference_fields": ["team"],
                "observed_fields": ["points"],
                "mode": "sum"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = send(
            create_router(state.clone()),
            get("/api/analysis?chart=violin&summarize=true"),
        )
        .await;
        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["revision"], 1);
        assert_eq!(value["current"], true);
        assert_eq!(value["chart"], "violin");
        assert_eq!(value["result"]["groups"][0]["observed"]["points"]["value"], 4.0);
        assert!(value["summary"].as_str().unwrap().contains("violin chart"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_selection_change_not_held_up_by_summary() {
        let (started_tx, started_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let session = session_with_rows(0).with_summarizer(GatedSummarizer {
            config: SummarizerConfig::default(),
            started: Mutex::new(started_tx),
            release: Mutex::new(release_rx),
        });
        let state = AppState::new(session, "games.xlsx".into(), Some("gated".to_string()));

        send(
            create_router(state.clone()),
            post_selection(json!({"reference_fields": ["team"], "observed_fields": ["points"]})),
        )
        .await;

        let analysis = tokio::spawn(send(
            create_router(state.clone()),
            get("/api/analysis?summarize=true"),
        ));
        tokio::task::spawn_blocking(move || started_rx.recv())
            .await
            .unwrap()
            .unwrap();

        // The summary is still running; the new selection must go through
        let (status, body) = tokio::time::timeout(
            Duration::from_secs(5),
            send(
                create_router(state.clone()),
                post_selection(json!({
                    "reference_fields": ["team"],
                    "observed_fields": ["points"],
                    "mode": "max"
                })),
            ),
        )
        .await
        .expect("selection change waited for the summary");
        assert_eq!(status, StatusCode::OK);
        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["revision"], 2);

        release_tx.send(()).unwrap();
        let (status, body) = analysis.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["revision"], 1);
        assert_eq!(value["current"], false);
        assert!(value.get("summary").is_none());
    }

    #[tokio::test]
    async fn test_rows_pages() {
        let state = AppState::new(session_with_rows(20), "games.xlsx".into(), None);

        let (status, body) = send(create_router(state.clone()), get("/api/rows")).await;
        assert_eq!(status, StatusCode::OK);
        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["page"], 1);
        assert_eq!(value["per_page"], 10);
        assert_eq!(value["total_rows"], 23);
        assert_eq!(value["total_pages"], 3);
        assert_eq!(value["headers"], json!(["team", "season", "points", "result"]));
        assert_eq!(value["rows"].as_array().unwrap().len(), 10);
        assert_eq!(value["rows"][0]["team"], "A");

        let (_, body) = send(create_router(state.clone()), get("/api/rows?page=3")).await;
        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["rows"].as_array().unwrap().len(), 3);

        let (status, body) = send(create_router(state.clone()), get("/api/rows?page=9&per_page=5")).await;
        assert_eq!(status, StatusCode::OK);
        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["total_pages"], 5);
        assert!(value["rows"].as_array().unwrap().is_empty());

        let (_, body) = send(create_router(state), get("/api/rows?page=0")).await;
        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["page"], 1);
    }

    #[tokio::test]
    async fn test_unknown_field_rejected() {
        let (status, body) = send(
            create_router(state()),
            post_selection(json!({"reference_fields": ["coach"], "observed_fields": []})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("unknown_field"));
    }

    #[tokio::test]
    async fn test_export_csv() {
        let state = state();
        send(
            create_router(state.clone()),
            post_selection(json!({
                "reference_fields": ["season"],
                "observed_fields": ["result"],
                "mode": "count"
            })),
        )
        .await;

        let (status, body) = send(create_router(state), get("/api/export.csv")).await;
        assert_eq!(status, StatusCode::OK);
        let lines: Vec<&str> = body.lines().collect();
        assert_eq!(lines[0], "name,key,entry_count,ref_season,result,result_most_frequent,result_frequency");
        assert_eq!(lines[1], r#""2023","2023",1,"2023",1,"win",1"#);
        assert_eq!(lines.len(), 3);
    }
}
