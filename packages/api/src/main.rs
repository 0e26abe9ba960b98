// Main entry point for the ingestion API server

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_core::{build_app, AppState, Config};
use ingest::{HttpSourceClient, IngestConfig, Pipeline, ReferenceCatalog, SupabaseSink};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,api_core=debug,ingest=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting legal content ingestion API");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    // Build the pipeline around its two edges
    let client = HttpSourceClient::new().context("Failed to build source client")?;
    let sink = SupabaseSink::new(&config.supabase_url, &config.supabase_service_role_key);
    let pipeline = Arc::new(Pipeline::new(
        Arc::new(client),
        Arc::new(sink),
        IngestConfig::default(),
    ));
    let catalog = Arc::new(ReferenceCatalog::builtin());

    // Start scheduled tasks; the handle keeps jobs alive for the process
    let _scheduler = api_core::scheduler::start_scheduler(Arc::clone(&pipeline))
        .await
        .context("Failed to start scheduler")?;

    // Build application
    let app = build_app(AppState { pipeline, catalog });

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
