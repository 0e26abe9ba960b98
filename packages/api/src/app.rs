//! Application setup and router construction.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use ingest::{HttpSourceClient, Pipeline, ReferenceCatalog, SupabaseSink};

use crate::routes::{health_handler, ingest_cases_handler, ingest_catalog_handler, ingest_news_handler};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline<HttpSourceClient, SupabaseSink>>,
    pub catalog: Arc<ReferenceCatalog>,
}

/// Build the Axum application router
pub fn build_app(state: AppState) -> Router {
    // Callers are browser extensions and cron triggers; no credentials flow
    // through, so any-origin CORS is fine.
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health_handler))
        .route("/ingest/cases", post(ingest_cases_handler))
        .route("/ingest/news", post(ingest_news_handler))
        .route("/ingest/catalog", post(ingest_catalog_handler))
        .layer(Extension(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
