//! HTTP server for the spreadsheet processor.
//!
//! # API Endpoints
//!
//! | Method | Path          | Description                              |
//! |--------|---------------|------------------------------------------|
//! | GET    | `/`           | Upload page                              |
//! | GET    | `/health`     | Health check                             |
//! | POST   | `/api/upload` | Convert a workbook, returns xlsx bytes   |
//! | GET    | `/api/logs`   | SSE stream for real-time logs            |

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::{header, Method, StatusCode},
    response::{sse::Event, Html, IntoResponse, Json, Response, Sse},
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use std::{convert::Infallible, net::SocketAddr, sync::Arc, time::Duration};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::CorsLayer;

use super::logs::{log_error, log_info, LOG_BROADCASTER};
use super::page::INDEX_HTML;
use super::types::{ErrorResponse, HealthResponse};
use crate::error::{ServerError, ServerResult};
use crate::transform::pipeline::{process_bytes, ProcessResult, TransformOptions};
use crate::writer::XLSX_MIME;

/// Largest accepted upload.
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Shared, read-only server state.
#[derive(Clone)]
pub struct AppState {
    pub options: Arc<TransformOptions>,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Pipeline(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(ErrorResponse::from_error(&self))).into_response()
    }
}

/// Build the router.
pub fn router(options: TransformOptions) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE, header::CONTENT_DISPOSITION]);

    let state = AppState {
        options: Arc::new(options),
    };

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/upload", post(upload_workbook))
        .route("/api/logs", get(sse_logs))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server
pub async fn start_server(port: u16, options: TransformOptions) -> Result<(), Box<dyn std::error::Error>> {
    let sheet = options.sheet_name.clone();
    let app = router(options);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    println!("🚀 TTD Excel Processor running on http://localhost:{}", port);
    println!("   GET  /           - Upload page");
    println!("   POST /api/upload - Convert workbook (sheet '{}')", sheet);
    println!("   GET  /api/logs   - SSE log stream");
    println!("   GET  /health     - Health check");
    println!();

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Health check endpoint
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: "ttd-excel".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        default_sheet: state.options.sheet_name.clone(),
    })
}

/// SSE endpoint for real-time log streaming
async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BROADCASTER.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| {
        let entry = result.ok()?;
        let json = serde_json::to_string(&entry).ok()?;
        Some(Ok(Event::default().data(json)))
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// Upload endpoint: multipart field `file`, optional field `sheet`.
async fn upload_workbook(State(state): State<AppState>, mut multipart: Multipart) -> ServerResult<Response> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut file_name: Option<String> = None;
    let mut sheet: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(format!("Multipart error: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                file_name = field.file_name().map(|s| s.to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ServerError::BadRequest(format!("Read error: {}", e)))?;
                file_data = Some(bytes.to_vec());
            }
            "sheet" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ServerError::BadRequest(format!("Read error: {}", e)))?;
                if !text.trim().is_empty() {
                    sheet = Some(text.trim().to_string());
                }
            }
            _ => {}
        }
    }

    let bytes = file_data.ok_or_else(|| ServerError::BadRequest("No file provided".to_string()))?;

    log_info(format!(
        "📄 New upload: {} ({} bytes)",
        file_name.as_deref().unwrap_or("unknown"),
        bytes.len()
    ));

    let mut options = (*state.options).clone();
    if let Some(sheet) = sheet {
        options.sheet_name = sheet;
    }

    let result = tokio::task::spawn_blocking(move || process_bytes(&bytes, &options))
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))?
        .map_err(|e| {
            log_error(format!("Conversion failed: {}", e));
            ServerError::from(e)
        })?;

    Ok(download_response(result))
}

/// Attachment response for a finished conversion.
fn download_response(result: ProcessResult) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", result.file_name);
    (
        [
            (header::CONTENT_TYPE, XLSX_MIME.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        result.bytes,
    )
        .into_response()
}
