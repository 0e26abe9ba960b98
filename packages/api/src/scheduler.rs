//! Scheduled background tasks using tokio-cron-scheduler.
//!
//! The news refresh runs hourly so the feed tables stay current without
//! an external cron trigger. Case ingestion stays on-demand; sections
//! only change when a user asks for one.

use std::sync::Arc;

use anyhow::Result;
use tokio_cron_scheduler::{Job, JobScheduler};
use uuid::Uuid;

use ingest::{HttpSourceClient, Pipeline, SupabaseSink};

/// Start all scheduled tasks
pub async fn start_scheduler(
    pipeline: Arc<Pipeline<HttpSourceClient, SupabaseSink>>,
) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    // Hourly news refresh
    let refresh_job = Job::new_async("0 0 * * * *", move |_uuid, _lock| {
        let pipeline = Arc::clone(&pipeline);
        Box::pin(async move {
            let run_id = Uuid::new_v4();
            tracing::info!(%run_id, "scheduled news refresh starting");
            let result = pipeline.run_news_refresh().await;
            tracing::info!(
                %run_id,
                fetched = result.records_fetched,
                written = result.records_written,
                errors = result.errors.len(),
                "scheduled news refresh finished"
            );
        })
    })?;

    scheduler.add(refresh_job).await?;
    scheduler.start().await?;

    tracing::info!("Scheduled tasks started (news refresh every hour)");
    Ok(scheduler)
}
