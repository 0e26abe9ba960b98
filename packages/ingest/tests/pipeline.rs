//! End-to-end pipeline runs against in-memory fakes.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use ingest::testing::{MemorySink, MockSourceClient};
use ingest::types::ExternalSource;
use ingest::{sync_catalog, IngestConfig, Language, PagePolicy, Pipeline, ReferenceCatalog};

fn rss_item(title: &str, link: &str) -> String {
    format!(
        "<item><title>{title} - Some Publisher</title><link>{link}</link>\
         <pubDate>Mon, 05 May 2025 10:00:00 GMT</pubDate></item>"
    )
}

fn case_anchor(doc_id: usize) -> String {
    format!(r#"<a href="/doc/{doc_id}/">Accused No {doc_id} vs State on 1 May, 2020</a>"#)
}

fn en() -> Language {
    Language::new("en", "en-IN", "IN:en")
}

fn pipeline(
    client: MockSourceClient,
    sink: Arc<MemorySink>,
    config: IngestConfig,
) -> Pipeline<MockSourceClient, MemorySink> {
    Pipeline::new(Arc::new(client), sink, config)
}

#[tokio::test]
async fn overlapping_sources_dedupe_before_a_single_write_pass() {
    // Two feeds of three items each, sharing one link, with one more
    // link already in the store.
    let source_a = ExternalSource::news_feed("Supreme Court of India", en());
    let source_b = ExternalSource::news_feed("High Court Judgment", en());

    let body_a = format!(
        "{}{}{}",
        rss_item("SC hears plea", "https://n/1"),
        rss_item("Verdict reserved", "https://n/2"),
        rss_item("Shared story", "https://n/shared"),
    );
    let body_b = format!(
        "{}{}{}",
        rss_item("Shared story again", "https://n/shared"),
        rss_item("HC quashes order", "https://n/3"),
        rss_item("Bail granted", "https://n/4"),
    );

    let client = MockSourceClient::new()
        .with_response(source_a.page_url(0).unwrap(), body_a)
        .with_response(source_b.page_url(0).unwrap(), body_b);
    let sink = Arc::new(MemorySink::new());
    sink.seed("legal_news", vec![json!({"link": "https://n/2"})]);

    let pipeline = pipeline(client, Arc::clone(&sink), IngestConfig::default());
    let result = pipeline.run(vec![source_a, source_b]).await;

    assert_eq!(result.records_fetched, 6);
    // One within-batch duplicate plus one already stored.
    assert_eq!(result.records_deduplicated, 2);
    assert_eq!(result.records_written, 4);
    assert!(result.errors.is_empty());
    assert!(!result.timed_out);
    assert_eq!(sink.row_count("legal_news"), 5);
}

#[tokio::test]
async fn rerunning_the_same_sources_writes_nothing_new() {
    let source = ExternalSource::news_feed("New Laws India", en());
    let body = format!(
        "{}{}",
        rss_item("Amendment tabled", "https://n/10"),
        rss_item("Bill passed", "https://n/11"),
    );
    let client = MockSourceClient::new().with_response(source.page_url(0).unwrap(), body);
    let sink = Arc::new(MemorySink::new());
    let pipeline = pipeline(client, Arc::clone(&sink), IngestConfig::default());

    let first = pipeline.run(vec![source.clone()]).await;
    let second = pipeline.run(vec![source]).await;

    assert_eq!(first.records_written, 2);
    assert_eq!(second.records_written, 0);
    assert_eq!(second.records_deduplicated, 2);
    assert_eq!(sink.row_count("legal_news"), 2);
}

#[tokio::test]
async fn failing_source_does_not_sink_the_others() {
    let good = ExternalSource::news_feed("Legal Rights India", en());
    let bad = ExternalSource::news_feed("Supreme Court of India", en());

    // Only the good source has a canned body; the other 404s.
    let client = MockSourceClient::new().with_response(
        good.page_url(0).unwrap(),
        rss_item("Rights explainer", "https://n/20"),
    );
    let sink = Arc::new(MemorySink::new());
    let pipeline = pipeline(client, Arc::clone(&sink), IngestConfig::default());

    let result = pipeline.run(vec![bad, good]).await;

    assert_eq!(result.records_written, 1);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].contains("news:en:Supreme Court of India"));
}

#[tokio::test]
async fn failed_chunk_leaves_other_chunks_durable() {
    let source = ExternalSource::news_feed("High Court Judgment", en());
    let body: String = (0..9)
        .map(|i| rss_item(&format!("Story {i}"), &format!("https://n/c{i}")))
        .collect();
    let client = MockSourceClient::new().with_response(source.page_url(0).unwrap(), body);

    let sink = Arc::new(MemorySink::new());
    sink.fail_writes_containing("https://n/c4");

    let config = IngestConfig::default().with_chunk_size(3);
    let pipeline = pipeline(client, Arc::clone(&sink), config);
    let result = pipeline.run(vec![source]).await;

    assert_eq!(result.records_written, 6);
    assert_eq!(result.errors.len(), 1);
    // The chunk after the failing one still landed.
    assert!(sink
        .rows("legal_news")
        .iter()
        .any(|row| row["link"] == "https://n/c8"));
}

#[tokio::test]
async fn paginated_case_search_stops_at_target() {
    let source = ExternalSource::case_search("302");
    let mut client = MockSourceClient::new();
    for page in 0..5 {
        let body: String = (0..20).map(|i| case_anchor(page * 100 + i)).collect();
        client = client.with_response(source.page_url(page).unwrap(), body);
    }

    let sink = Arc::new(MemorySink::new());
    let config = IngestConfig::default()
        .with_page_policy(PagePolicy::default().with_inter_page_delay(Duration::ZERO));
    let pipeline = pipeline(client, Arc::clone(&sink), config);

    let result = pipeline.run_case_search("302").await;

    // 20 records per page, target 50: three pages, all novel.
    assert_eq!(result.records_fetched, 60);
    assert_eq!(result.records_written, 60);
    assert_eq!(sink.row_count("ipc_cases"), 60);
}

#[tokio::test]
async fn mixed_sources_land_in_their_own_tables() {
    let cases = ExternalSource::case_search("420");
    let news = ExternalSource::news_feed("Legal News", en());

    let client = MockSourceClient::new()
        .with_response(cases.page_url(0).unwrap(), case_anchor(7))
        .with_response(
            news.page_url(0).unwrap(),
            rss_item("Fraud ruling", "https://n/30"),
        );
    let sink = Arc::new(MemorySink::new());
    let config = IngestConfig::default()
        .with_page_policy(PagePolicy::default().with_max_pages(1));
    let pipeline = pipeline(client, Arc::clone(&sink), config);

    let result = pipeline.run(vec![cases, news]).await;

    assert_eq!(result.records_written, 2);
    assert_eq!(sink.row_count("ipc_cases"), 1);
    assert_eq!(sink.row_count("legal_news"), 1);
}

#[tokio::test]
async fn expired_deadline_still_reports_a_result() {
    let source = ExternalSource::news_feed("Legal News", en());
    let client = MockSourceClient::new().with_response(
        source.page_url(0).unwrap(),
        rss_item("Never fetched", "https://n/40"),
    );
    let sink = Arc::new(MemorySink::new());
    let config = IngestConfig::default().with_run_deadline(Duration::ZERO);
    let pipeline = pipeline(client, Arc::clone(&sink), config);

    let result = pipeline.run(vec![source]).await;

    assert!(result.timed_out);
    assert_eq!(result.records_written, 0);
}

#[tokio::test]
async fn catalog_sync_is_idempotent_for_insert_tables() {
    let sink = MemorySink::new();
    let catalog = ReferenceCatalog::builtin();

    let first = sync_catalog(&sink, &catalog).await;
    let second = sync_catalog(&sink, &catalog).await;

    assert_eq!(first.written, catalog.len());
    assert_eq!(second.skipped, catalog.rights.len());
    assert_eq!(sink.row_count("legal_rights"), catalog.rights.len());
    assert_eq!(sink.row_count("bare_acts"), catalog.acts.len());
    assert_eq!(sink.row_count("gov_updates"), catalog.updates.len());
}
