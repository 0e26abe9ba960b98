//! Ingestion trigger endpoints.
//!
//! Each handler kicks off one pipeline run and reports its summary.
//! Partial runs (some records written, some errors) still return 200;
//! the error list tells the caller what was lost.

use axum::{extract::Extension, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use ingest::types::sanitize_section;
use ingest::{sync_catalog, RunResult};

use crate::app::AppState;

#[derive(Deserialize)]
pub struct CaseIngestRequest {
    pub section: String,
}

#[derive(Serialize)]
pub struct IngestResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    pub fetched: usize,
    pub deduplicated: usize,
    pub written: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    pub timed_out: bool,
}

impl IngestResponse {
    fn from_run(result: RunResult, section: Option<String>) -> Self {
        Self {
            success: result.errors.is_empty(),
            section,
            fetched: result.records_fetched,
            deduplicated: result.records_deduplicated,
            written: result.records_written,
            errors: result.errors,
            timed_out: result.timed_out,
        }
    }
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

/// Ingest case-law search results for one statute section.
pub async fn ingest_cases_handler(
    Extension(state): Extension<AppState>,
    Json(request): Json<CaseIngestRequest>,
) -> Result<Json<IngestResponse>, (StatusCode, Json<ErrorResponse>)> {
    let section = sanitize_section(&request.section);
    if section.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                success: false,
                error: "section must contain at least one alphanumeric character".to_string(),
            }),
        ));
    }

    info!(section = %section, "case ingestion requested");
    let result = state.pipeline.run_case_search(&section).await;
    Ok(Json(IngestResponse::from_run(result, Some(section))))
}

/// Run the multi-language news refresh.
pub async fn ingest_news_handler(
    Extension(state): Extension<AppState>,
) -> Json<IngestResponse> {
    info!("news refresh requested");
    let result = state.pipeline.run_news_refresh().await;
    Json(IngestResponse::from_run(result, None))
}

#[derive(Serialize)]
pub struct CatalogResponse {
    pub success: bool,
    pub written: usize,
    pub skipped: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

/// Sync the static reference catalog into the store.
pub async fn ingest_catalog_handler(
    Extension(state): Extension<AppState>,
) -> Json<CatalogResponse> {
    info!("catalog sync requested");
    let outcome = sync_catalog(state.pipeline.sink(), state.catalog.as_ref()).await;
    Json(CatalogResponse {
        success: outcome.errors.is_empty(),
        written: outcome.written,
        skipped: outcome.skipped,
        errors: outcome.errors,
    })
}
