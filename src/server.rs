//! The server module exposes the pipeline over HTTP.
//!
//! * `POST /analyze` with `{"url": "..."}` runs an analysis and returns the stored report
//! * `GET /reports` lists every stored report
//! * `GET /reports/{id}` returns a single report

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use log::{error, info};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use crate::pipeline::Pipeline;
use crate::storage::Report;

/// Body of `POST /analyze`.
#[derive(Debug, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub url: String,
}

/// Body of every non-2xx response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Builds the application router around a shared pipeline.
pub fn router(pipeline: Arc<Pipeline>) -> Router {
    Router::new()
        .route("/analyze", post(analyze))
        .route("/reports", get(list_reports))
        .route("/reports/{id}", get(get_report))
        .layer(CorsLayer::permissive())
        .with_state(pipeline)
}

/// Serves the API on `bind_addr` until the process is stopped.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve(bind_addr: &str, pipeline: Arc<Pipeline>) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("Unable to bind {bind_addr}"))?;

    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(pipeline))
        .await
        .context("Server stopped unexpectedly")
}

async fn analyze(
    State(pipeline): State<Arc<Pipeline>>,
    Json(request): Json<AnalysisRequest>,
) -> Result<Json<Report>, ApiError> {
    info!("Received analysis request for URL: {}", request.url);

    pipeline
        .analyze_and_suggest(&request.url)
        .await
        .map(Json)
        .map_err(|e| {
            let status = if e.is_client_error() {
                StatusCode::BAD_REQUEST
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            api_error(status, e.cause)
        })
}

async fn list_reports(
    State(pipeline): State<Arc<Pipeline>>,
) -> Result<Json<Vec<Report>>, ApiError> {
    info!("Fetching all reports from the database.");

    pipeline.storage().list_reports().map(Json).map_err(|e| {
        error!("Unable to list reports: {e:#}");
        api_error(StatusCode::INTERNAL_SERVER_ERROR, format!("{e:#}"))
    })
}

async fn get_report(
    State(pipeline): State<Arc<Pipeline>>,
    Path(id): Path<i64>,
) -> Result<Json<Report>, ApiError> {
    match pipeline.storage().get_report(id) {
        Ok(Some(report)) => Ok(Json(report)),
        Ok(None) => Err(api_error(
            StatusCode::NOT_FOUND,
            format!("Report {id} not found"),
        )),
        Err(e) => {
            error!("Unable to fetch report {id}: {e:#}");
            Err(api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("{e:#}"),
            ))
        }
    }
}

fn api_error(status: StatusCode, detail: String) -> ApiError {
    (status, Json(ErrorResponse { detail }))
}
