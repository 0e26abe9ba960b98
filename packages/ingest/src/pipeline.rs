//! Pipeline orchestration: fan sources out under a concurrency bound,
//! merge their harvests in source order, deduplicate, and write.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::client::SourceClient;
use crate::config::IngestConfig;
use crate::dedupe::{dedupe_against_store, dedupe_within_batch};
use crate::error::SinkError;
use crate::paginate::{paginate, PageHarvest, PagePolicy};
use crate::sink::{ConflictPolicy, RecordSink, SinkTarget};
use crate::types::{CandidateRecord, ExternalSource, SinkRecord};
use crate::writer::reconcile_and_write;

/// What one pipeline run accomplished, across all its sources.
#[derive(Debug, Default, Clone)]
pub struct RunResult {
    /// Records extracted across all pages of all sources.
    pub records_fetched: usize,

    /// Records removed as duplicates, within the batch or against the store.
    pub records_deduplicated: usize,

    /// Rows handed to the sink.
    pub records_written: usize,

    /// Source, page, and chunk failures. Non-empty errors with nonzero
    /// written means a partial run, which is still progress.
    pub errors: Vec<String>,

    /// True when the run deadline cut at least one source short.
    pub timed_out: bool,
}

/// The fetch, extract, dedupe, write pipeline.
///
/// Holds the source client and record sink behind `Arc` so per-source
/// tasks can share them; the pipeline itself is cheap to clone.
pub struct Pipeline<C, S>
where
    C: SourceClient + 'static,
    S: RecordSink + 'static,
{
    client: Arc<C>,
    sink: Arc<S>,
    config: IngestConfig,
}

impl<C, S> Clone for Pipeline<C, S>
where
    C: SourceClient + 'static,
    S: RecordSink + 'static,
{
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            sink: Arc::clone(&self.sink),
            config: self.config.clone(),
        }
    }
}

impl<C, S> Pipeline<C, S>
where
    C: SourceClient + 'static,
    S: RecordSink + 'static,
{
    pub fn new(client: Arc<C>, sink: Arc<S>, config: IngestConfig) -> Self {
        Self {
            client,
            sink,
            config,
        }
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// The record sink this pipeline writes through, for callers that
    /// sync other record classes (reference catalogs) to the same store.
    pub fn sink(&self) -> &S {
        self.sink.as_ref()
    }

    /// Run the full pipeline over `sources`.
    ///
    /// Sources fetch concurrently under the configured bound; one failing
    /// source contributes its error entries and zero records without
    /// affecting the others. Merged records keep source order, with pages
    /// in order within each source.
    pub async fn run(&self, sources: Vec<ExternalSource>) -> RunResult {
        let deadline = self
            .config
            .run_deadline
            .map(|budget| Instant::now() + budget);
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_sources.max(1)));

        let mut handles = Vec::with_capacity(sources.len());
        for source in sources {
            let client = Arc::clone(&self.client);
            let semaphore = Arc::clone(&semaphore);
            let policy = if source.paginated {
                self.config.page_policy.clone()
            } else {
                PagePolicy::single_page()
            };

            handles.push(tokio::spawn(async move {
                // Closed only on shutdown; yield an empty harvest then.
                let _permit = match semaphore.acquire().await {
                    Ok(permit) => permit,
                    Err(_) => return PageHarvest::default(),
                };
                paginate(&source, client.as_ref(), &policy, deadline).await
            }));
        }

        // Await in spawn order so the merged batch preserves source order.
        let mut result = RunResult::default();
        let mut merged: Vec<CandidateRecord> = Vec::new();
        for handle in handles {
            match handle.await {
                Ok(harvest) => {
                    result.records_fetched += harvest.records.len();
                    result.timed_out |= harvest.timed_out;
                    result.errors.extend(harvest.errors);
                    merged.extend(harvest.records);
                }
                Err(e) => {
                    warn!(error = %e, "source task panicked");
                    result.errors.push(format!("source task failed: {e}"));
                }
            }
        }

        let unique = dedupe_within_batch(merged);
        result.records_deduplicated = result.records_fetched - unique.len();

        // A merged batch can span tables (cases alongside news), so
        // reconcile each target's records separately, in batch order.
        for (target, records) in partition_by_target(unique) {
            // Store dedup over the whole target batch up front; the writer
            // re-checks per chunk, which covers us if this query fails.
            let novel = match self.existing_keys(&target, &records).await {
                Ok(existing) => {
                    let before = records.len();
                    let novel = dedupe_against_store(records, &existing);
                    result.records_deduplicated += before - novel.len();
                    novel
                }
                Err(e) => {
                    warn!(table = target.table, error = %e, "batch existence check failed");
                    result.errors.push(e.to_string());
                    records
                }
            };

            let outcome =
                reconcile_and_write(self.sink.as_ref(), &target, &novel, self.config.chunk_size)
                    .await;
            result.records_deduplicated += outcome.skipped;
            result.records_written += outcome.written;
            result.errors.extend(outcome.errors);
        }

        info!(
            fetched = result.records_fetched,
            deduplicated = result.records_deduplicated,
            written = result.records_written,
            errors = result.errors.len(),
            timed_out = result.timed_out,
            "pipeline run finished"
        );
        result
    }

    async fn existing_keys(
        &self,
        target: &SinkTarget,
        records: &[CandidateRecord],
    ) -> Result<HashSet<String>, SinkError> {
        if records.is_empty() || !matches!(target.policy, ConflictPolicy::Insert) {
            return Ok(Default::default());
        }
        let keys: Vec<String> = records
            .iter()
            .map(|record| record.natural_key().to_string())
            .collect();
        self.sink
            .query_existing(target.table, target.key_field, &keys)
            .await
    }

    /// Case-law ingestion for one statute section.
    pub async fn run_case_search(&self, section: &str) -> RunResult {
        self.run(vec![ExternalSource::case_search(section)]).await
    }

    /// The multi-language news refresh over all configured editions.
    pub async fn run_news_refresh(&self) -> RunResult {
        self.run(self.config.news_sources()).await
    }
}

/// Group records by their sink target, keeping batch order both across
/// targets (order of first appearance) and within each target.
fn partition_by_target(
    records: Vec<CandidateRecord>,
) -> Vec<(SinkTarget, Vec<CandidateRecord>)> {
    let mut order: Vec<SinkTarget> = Vec::new();
    let mut by_table: HashMap<&'static str, Vec<CandidateRecord>> = HashMap::new();

    for record in records {
        let target = record.sink_target();
        by_table
            .entry(target.table)
            .or_insert_with(|| {
                order.push(target);
                Vec::new()
            })
            .push(record);
    }

    order
        .into_iter()
        .map(|target| {
            let records = by_table.remove(target.table).unwrap_or_default();
            (target, records)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CaseRecord, FeedRecord};
    use chrono::Utc;

    fn case(doc_id: &str) -> CandidateRecord {
        CandidateRecord::Case(CaseRecord {
            title: format!("State vs {doc_id}"),
            doc_id: doc_id.to_string(),
            court: "Unknown Court".to_string(),
            date: String::new(),
            url: format!("https://indiankanoon.org/doc/{doc_id}/"),
            cited_by: None,
            fetched_at: Utc::now(),
        })
    }

    fn feed(link: &str) -> CandidateRecord {
        CandidateRecord::Feed(FeedRecord {
            title: format!("Article at {link}"),
            link: link.to_string(),
            subtitle: None,
            category: "general".to_string(),
            language: "en".to_string(),
            fetched_at: Utc::now(),
        })
    }

    #[test]
    fn partition_keeps_first_appearance_order() {
        let batch = vec![case("1"), feed("https://n/1"), case("2"), feed("https://n/2")];

        let partitions = partition_by_target(batch);

        assert_eq!(partitions.len(), 2);
        assert_eq!(partitions[0].0.table, "ipc_cases");
        assert_eq!(partitions[0].1.len(), 2);
        assert_eq!(partitions[1].0.table, "legal_news");
        assert_eq!(partitions[1].1.len(), 2);
    }

    #[test]
    fn partition_of_single_kind_is_one_group() {
        let partitions = partition_by_target(vec![feed("https://n/1"), feed("https://n/2")]);
        assert_eq!(partitions.len(), 1);
        assert_eq!(partitions[0].0.table, "legal_news");
    }
}
