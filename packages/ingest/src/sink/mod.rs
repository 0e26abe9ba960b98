//! Record sink capability: the pipeline's view of the persisted store.
//!
//! The store itself is an external collaborator; all the pipeline needs
//! is a key-indexed existence query plus a batched insert/upsert.

mod supabase;

pub use supabase::SupabaseSink;

use async_trait::async_trait;
use std::collections::HashSet;

use crate::error::SinkError;

/// Write mode when a natural key already exists in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictPolicy {
    /// Plain insert after existence check. Existing rows are left alone,
    /// so curator-set fields survive re-fetches.
    Insert,
    /// Key-conflict overwrite, for reference catalogs whose rows may
    /// legitimately arrive re-fetched with updated fields.
    Upsert { on_conflict: &'static str },
}

/// Where one record class lands in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkTarget {
    pub table: &'static str,
    /// Column holding the natural key.
    pub key_field: &'static str,
    pub policy: ConflictPolicy,
}

/// Key-value-indexed record sink.
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Of `keys`, return the subset already present in `table`.
    async fn query_existing(
        &self,
        table: &str,
        key_field: &str,
        keys: &[String],
    ) -> Result<HashSet<String>, SinkError>;

    /// Write `rows` in one batched operation; returns rows written.
    async fn write_rows(
        &self,
        table: &str,
        rows: Vec<serde_json::Value>,
        policy: ConflictPolicy,
    ) -> Result<usize, SinkError>;
}
