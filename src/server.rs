use crate::pipeline::EnrichmentPipeline;
use crate::spreadsheet::Artifacts;
use crate::types::CellValue;
use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    http::{Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Extension, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use hyper::Server;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Spreadsheet rows as produced by a sheet-to-array conversion on the client.
#[derive(Debug, Deserialize)]
pub struct UploadRequest {
    pub data: Vec<Vec<CellValue>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub message: String,
    /// Base64 xlsx, delivered as `Clients.xlsx`.
    pub matching_file_data: String,
    /// Base64 xlsx, delivered as `Ecosystem.xlsx`.
    pub non_matching_file_data: String,
}

#[derive(Clone)]
pub struct AppState {
    pipeline: Arc<EnrichmentPipeline>,
    /// The pipeline has no concurrency guard of its own; uploads queue here.
    run_lock: Arc<Mutex<()>>,
    metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(pipeline: EnrichmentPipeline, metrics: Option<PrometheusHandle>) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            run_lock: Arc::new(Mutex::new(())),
            metrics,
        }
    }
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "emtak-enricher",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn metrics_handler(Extension(state): Extension<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => (StatusCode::NOT_FOUND, "metrics recorder not installed").into_response(),
    }
}

async fn upload(
    Extension(state): Extension<AppState>,
    Json(request): Json<UploadRequest>,
) -> Response {
    let _run = state.run_lock.lock().await;
    match process_upload(&state.pipeline, request).await {
        Ok(response) => Json(response).into_response(),
        Err(e) => {
            error!("Server error: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "message": "Server error",
                    "error": e.to_string()
                })),
            )
                .into_response()
        }
    }
}

pub async fn process_upload(
    pipeline: &EnrichmentPipeline,
    request: UploadRequest,
) -> anyhow::Result<UploadResponse> {
    let tables = pipeline.process_data(request.data).await?;
    let artifacts = Artifacts::from_tables(&tables).context("building result workbooks")?;
    Ok(UploadResponse {
        message: "Data processed successfully".to_string(),
        matching_file_data: STANDARD.encode(&artifacts.matching),
        non_matching_file_data: STANDARD.encode(&artifacts.non_matching),
    })
}

/// Create the HTTP server: upload endpoint, health, metrics and the static upload page.
pub fn create_server(state: AppState, static_dir: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics_handler))
        .route("/upload", post(upload))
        .fallback_service(ServeDir::new(static_dir))
        .layer(Extension(state))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
}

/// Start the HTTP server on `bind`
pub async fn start_server(state: AppState, bind: &str, static_dir: &str) -> anyhow::Result<()> {
    let app = create_server(state, static_dir);
    let addr: SocketAddr = bind
        .parse()
        .with_context(|| format!("invalid bind address '{}'", bind))?;

    info!("HTTP server running on http://{}", addr);
    info!("Upload endpoint: POST http://{}/upload", addr);

    Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .context("HTTP server failed")?;
    Ok(())
}
