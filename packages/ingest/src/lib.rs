//! Legal-content ingestion pipeline.
//!
//! Pulls case-law search results and legal-news feeds from external
//! sources, extracts candidate records with tolerant pattern scanning,
//! deduplicates them on natural keys, and writes them to a record sink
//! in isolated chunks. Static reference catalogs sync through the same
//! write path.
//!
//! The pipeline is generic over its two edges: [`client::SourceClient`]
//! for outbound fetches and [`sink::RecordSink`] for the store, so the
//! whole flow runs against in-memory fakes in tests.

pub mod catalog;
pub mod client;
pub mod config;
pub mod dedupe;
pub mod error;
pub mod extract;
pub mod paginate;
pub mod pipeline;
pub mod sink;
pub mod testing;
pub mod types;
pub mod writer;

pub use catalog::{sync_catalog, ReferenceCatalog};
pub use client::{HttpSourceClient, SourceClient};
pub use config::IngestConfig;
pub use error::{FetchError, IngestError, SinkError};
pub use paginate::PagePolicy;
pub use pipeline::{Pipeline, RunResult};
pub use sink::{ConflictPolicy, RecordSink, SinkTarget, SupabaseSink};
pub use types::{CandidateRecord, CaseRecord, ExternalSource, FeedRecord, Language, SinkRecord};
