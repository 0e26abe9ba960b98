//! Candidate record types produced by the extractor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::sink::{ConflictPolicy, SinkTarget};

/// A record that can be deduplicated and written through a sink.
///
/// The natural key identifies the record's real-world referent (a court
/// document id, an article link) independent of any store-generated id.
pub trait SinkRecord: Clone + Send + Sync {
    /// Key used for within-batch and against-store deduplication.
    fn natural_key(&self) -> &str;

    /// Row shape handed to the record sink.
    fn to_row(&self) -> serde_json::Value;
}

/// A court case scraped from a search-results page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseRecord {
    pub title: String,
    /// Document id from the source URL, e.g. "555" in `/doc/555/`.
    pub doc_id: String,
    pub court: String,
    /// Decision date as printed in the title, e.g. "5 March, 2019".
    /// Empty when the title carries no recognizable date.
    pub date: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cited_by: Option<u32>,
    pub fetched_at: DateTime<Utc>,
}

impl SinkRecord for CaseRecord {
    fn natural_key(&self) -> &str {
        &self.doc_id
    }

    fn to_row(&self) -> serde_json::Value {
        json!({
            "title": self.title,
            "doc_id": self.doc_id,
            "court": self.court,
            "date": self.date,
            "url": self.url,
            "cited_by": self.cited_by,
        })
    }
}

/// A news article pulled from an RSS feed item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedRecord {
    pub title: String,
    pub link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Query or category tag of the feed that produced this item.
    pub category: String,
    pub language: String,
    pub fetched_at: DateTime<Utc>,
}

impl SinkRecord for FeedRecord {
    /// Link is the primary key; title is the fallback for items whose
    /// link element was missing or empty.
    fn natural_key(&self) -> &str {
        if self.link.is_empty() {
            &self.title
        } else {
            &self.link
        }
    }

    fn to_row(&self) -> serde_json::Value {
        json!({
            "title": self.title,
            "subtitle": self.subtitle,
            "link": self.link,
            "category": self.category,
            // New articles never arrive featured; curators set this later
            // and insert mode guarantees we never clobber it.
            "is_featured": false,
            "language": self.language,
        })
    }
}

/// Extractor output: one unit per scraped case or feed item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CandidateRecord {
    Case(CaseRecord),
    Feed(FeedRecord),
}

impl CandidateRecord {
    /// Table, key field, and conflict policy this record is written under.
    ///
    /// Cases and news are append-only logs: insert-after-existence-check,
    /// never upsert, so curator-set fields on existing rows survive.
    pub fn sink_target(&self) -> SinkTarget {
        match self {
            CandidateRecord::Case(_) => SinkTarget {
                table: "ipc_cases",
                key_field: "doc_id",
                policy: ConflictPolicy::Insert,
            },
            CandidateRecord::Feed(_) => SinkTarget {
                table: "legal_news",
                key_field: "link",
                policy: ConflictPolicy::Insert,
            },
        }
    }
}

impl SinkRecord for CandidateRecord {
    fn natural_key(&self) -> &str {
        match self {
            CandidateRecord::Case(c) => c.natural_key(),
            CandidateRecord::Feed(f) => f.natural_key(),
        }
    }

    fn to_row(&self) -> serde_json::Value {
        match self {
            CandidateRecord::Case(c) => c.to_row(),
            CandidateRecord::Feed(f) => f.to_row(),
        }
    }
}
