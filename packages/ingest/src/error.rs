//! Typed errors for the ingestion pipeline.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so callers can match
//! on failure classes. Per-page and per-chunk failures are recoverable and
//! get recorded in run summaries rather than propagated.

use thiserror::Error;

/// Errors from the outbound fetch layer.
///
/// A fetch failure means zero records for that page or source, never an
/// aborted run. Retry policy, if any, belongs to the caller.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Server answered with a non-2xx status.
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// Request failed in transit (DNS, connect, timeout, body read).
    #[error("transport error for {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Source URL could not be built or parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Errors from the record sink (store queries and writes).
///
/// Recoverable per chunk: the failing chunk is skipped and recorded,
/// remaining chunks are still attempted.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Existence query against the store failed.
    #[error("store query failed for {table}: {reason}")]
    Query { table: String, reason: String },

    /// Batched insert/upsert failed.
    #[error("store write failed for {table}: {reason}")]
    Write { table: String, reason: String },
}

/// Top-level pipeline errors.
///
/// Only configuration problems are fatal for a whole run; everything else
/// surfaces through [`RunResult::errors`](crate::pipeline::RunResult).
#[derive(Debug, Error)]
pub enum IngestError {
    /// Outbound fetch failed.
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// Store interaction failed.
    #[error("store error: {0}")]
    Sink(#[from] SinkError),

    /// Missing or invalid pipeline configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, IngestError>;
