//! Mock implementations for testing pipelines without network or store.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::client::SourceClient;
use crate::error::{FetchError, SinkError};
use crate::sink::{ConflictPolicy, RecordSink};
use crate::types::HeaderProfile;

/// Source client serving canned bodies keyed by exact URL.
///
/// URLs without a canned response answer HTTP 404, which the paginator
/// treats as a failed page.
#[derive(Default)]
pub struct MockSourceClient {
    responses: HashMap<String, String>,
    fetch_log: Mutex<Vec<String>>,
}

impl MockSourceClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a canned body for a URL.
    pub fn with_response(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.responses.insert(url.into(), body.into());
        self
    }

    /// Number of fetches issued so far.
    pub fn fetch_count(&self) -> usize {
        self.fetch_log.lock().unwrap().len()
    }

    /// URLs fetched, in order.
    pub fn fetched_urls(&self) -> Vec<String> {
        self.fetch_log.lock().unwrap().clone()
    }
}

#[async_trait]
impl SourceClient for MockSourceClient {
    async fn fetch(&self, url: &str, _headers: HeaderProfile) -> Result<String, FetchError> {
        self.fetch_log.lock().unwrap().push(url.to_string());
        match self.responses.get(url) {
            Some(body) => Ok(body.clone()),
            None => Err(FetchError::Status {
                status: 404,
                url: url.to_string(),
            }),
        }
    }
}

/// In-memory record sink.
///
/// Rows are plain JSON values per table. Write failures can be injected
/// to exercise chunk isolation.
#[derive(Default)]
pub struct MemorySink {
    tables: Mutex<HashMap<String, Vec<serde_json::Value>>>,
    poison: Mutex<Option<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a table, bypassing conflict handling.
    pub fn seed(&self, table: &str, rows: Vec<serde_json::Value>) {
        self.tables
            .lock()
            .unwrap()
            .entry(table.to_string())
            .or_default()
            .extend(rows);
    }

    /// Make every write whose serialized rows contain `needle` fail.
    pub fn fail_writes_containing(&self, needle: &str) {
        *self.poison.lock().unwrap() = Some(needle.to_string());
    }

    pub fn row_count(&self, table: &str) -> usize {
        self.tables
            .lock()
            .unwrap()
            .get(table)
            .map(|rows| rows.len())
            .unwrap_or(0)
    }

    pub fn rows(&self, table: &str) -> Vec<serde_json::Value> {
        self.tables
            .lock()
            .unwrap()
            .get(table)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl RecordSink for MemorySink {
    async fn query_existing(
        &self,
        table: &str,
        key_field: &str,
        keys: &[String],
    ) -> Result<HashSet<String>, SinkError> {
        let tables = self.tables.lock().unwrap();
        let rows = match tables.get(table) {
            Some(rows) => rows,
            None => return Ok(HashSet::new()),
        };

        Ok(rows
            .iter()
            .filter_map(|row| row.get(key_field).and_then(|v| v.as_str()))
            .filter(|key| keys.iter().any(|k| k == key))
            .map(|key| key.to_string())
            .collect())
    }

    async fn write_rows(
        &self,
        table: &str,
        rows: Vec<serde_json::Value>,
        policy: ConflictPolicy,
    ) -> Result<usize, SinkError> {
        if let Some(needle) = self.poison.lock().unwrap().as_deref() {
            if rows.iter().any(|row| row.to_string().contains(needle)) {
                return Err(SinkError::Write {
                    table: table.to_string(),
                    reason: format!("injected failure on {needle}"),
                });
            }
        }

        let mut tables = self.tables.lock().unwrap();
        let stored = tables.entry(table.to_string()).or_default();
        let count = rows.len();

        match policy {
            ConflictPolicy::Insert => stored.extend(rows),
            ConflictPolicy::Upsert { on_conflict } => {
                for row in rows {
                    let key = row.get(on_conflict).cloned();
                    match stored
                        .iter_mut()
                        .find(|existing| key.is_some() && existing.get(on_conflict) == key.as_ref())
                    {
                        Some(existing) => *existing = row,
                        None => stored.push(row),
                    }
                }
            }
        }

        Ok(count)
    }
}
