//! Supabase-backed record sink, speaking the PostgREST API with a
//! service-role key.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use std::collections::HashSet;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::error::SinkError;
use crate::sink::{ConflictPolicy, RecordSink};

const STORE_TIMEOUT: Duration = Duration::from_secs(30);

/// Record sink backed by a Supabase project's REST endpoint.
pub struct SupabaseSink {
    base_url: String,
    service_key: String,
    client: reqwest::Client,
}

impl SupabaseSink {
    /// `base_url` is the project URL (no `/rest/v1` suffix); `service_key`
    /// is the service-role key, which bypasses row-level security.
    pub fn new(base_url: impl Into<String>, service_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            service_key: service_key.into(),
            client: reqwest::Client::new(),
        }
    }

    fn table_url(&self, table: &str) -> Result<Url, url::ParseError> {
        Url::parse(&format!("{}/rest/v1/{table}", self.base_url))
    }

    fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Ok(key) = HeaderValue::from_str(&self.service_key) {
            headers.insert("apikey", key);
        }
        if let Ok(bearer) = HeaderValue::from_str(&format!("Bearer {}", self.service_key)) {
            headers.insert(AUTHORIZATION, bearer);
        }
        headers
    }

    /// PostgREST `in.(...)` filter value. Keys are quoted because titles
    /// and URLs routinely contain commas.
    fn in_filter(keys: &[String]) -> String {
        let quoted: Vec<String> = keys
            .iter()
            .map(|k| format!("\"{}\"", k.replace('"', "\\\"")))
            .collect();
        format!("in.({})", quoted.join(","))
    }
}

#[async_trait]
impl RecordSink for SupabaseSink {
    async fn query_existing(
        &self,
        table: &str,
        key_field: &str,
        keys: &[String],
    ) -> Result<HashSet<String>, SinkError> {
        if keys.is_empty() {
            return Ok(HashSet::new());
        }

        let query_err = |reason: String| SinkError::Query {
            table: table.to_string(),
            reason,
        };

        let mut url = self.table_url(table).map_err(|e| query_err(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("select", key_field)
            .append_pair(key_field, &Self::in_filter(keys));

        let response = self
            .client
            .get(url)
            .headers(self.auth_headers())
            .timeout(STORE_TIMEOUT)
            .send()
            .await
            .map_err(|e| query_err(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(query_err(format!("HTTP {status}: {body}")));
        }

        let rows: Vec<serde_json::Value> = response
            .json()
            .await
            .map_err(|e| query_err(e.to_string()))?;

        let existing: HashSet<String> = rows
            .iter()
            .filter_map(|row| row.get(key_field).and_then(|v| v.as_str()))
            .map(|v| v.to_string())
            .collect();

        debug!(table, queried = keys.len(), existing = existing.len(), "existence check");
        Ok(existing)
    }

    async fn write_rows(
        &self,
        table: &str,
        rows: Vec<serde_json::Value>,
        policy: ConflictPolicy,
    ) -> Result<usize, SinkError> {
        if rows.is_empty() {
            return Ok(0);
        }

        let write_err = |reason: String| SinkError::Write {
            table: table.to_string(),
            reason,
        };

        let mut url = self.table_url(table).map_err(|e| write_err(e.to_string()))?;
        let prefer = match policy {
            ConflictPolicy::Insert => "return=minimal",
            ConflictPolicy::Upsert { on_conflict } => {
                url.query_pairs_mut().append_pair("on_conflict", on_conflict);
                "resolution=merge-duplicates,return=minimal"
            }
        };

        let count = rows.len();
        let response = self
            .client
            .post(url)
            .headers(self.auth_headers())
            .header("Prefer", prefer)
            .timeout(STORE_TIMEOUT)
            .json(&rows)
            .send()
            .await
            .map_err(|e| write_err(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(write_err(format!("HTTP {status}: {body}")));
        }

        debug!(table, written = count, policy = ?policy, "batch written");
        Ok(count)
    }
}
