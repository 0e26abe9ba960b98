//! Pipeline configuration.
//!
//! Everything here is built once at process start and passed into the
//! pipeline explicitly; nothing is read from ambient globals at run time.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::paginate::PagePolicy;
use crate::types::{ExternalSource, Language};

/// Configuration for one pipeline instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Pagination policy for paginated sources.
    pub page_policy: PagePolicy,

    /// Records per reconcile-and-write round trip.
    pub chunk_size: usize,

    /// Bound on concurrent source fetch loops.
    pub max_concurrent_sources: usize,

    /// Overall run deadline. In-flight fetches past the deadline are
    /// abandoned; accumulated records still flow through dedup and write.
    pub run_deadline: Option<Duration>,

    /// Language editions the news refresh covers.
    pub languages: Vec<Language>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            page_policy: PagePolicy::default(),
            chunk_size: 50,
            max_concurrent_sources: 4,
            run_deadline: None,
            languages: Language::supported(),
        }
    }
}

impl IngestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page_policy(mut self, policy: PagePolicy) -> Self {
        self.page_policy = policy;
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_max_concurrent_sources(mut self, max: usize) -> Self {
        self.max_concurrent_sources = max;
        self
    }

    pub fn with_run_deadline(mut self, deadline: Duration) -> Self {
        self.run_deadline = Some(deadline);
        self
    }

    pub fn with_languages(mut self, languages: Vec<Language>) -> Self {
        self.languages = languages;
        self
    }

    /// The full multi-source news refresh set: every configured language
    /// edition crossed with its query list.
    pub fn news_sources(&self) -> Vec<ExternalSource> {
        self.languages
            .iter()
            .flat_map(|lang| {
                news_queries(&lang.code)
                    .into_iter()
                    .map(|query| ExternalSource::news_feed(query, lang.clone()))
            })
            .collect()
    }
}

/// Search queries used for the news refresh, per language.
///
/// Languages without curated native-script queries fall back to broad
/// English terms; the locale parameters still request localized results.
fn news_queries(code: &str) -> Vec<&'static str> {
    match code {
        "en" => vec![
            "Supreme Court of India",
            "High Court Judgment",
            "New Laws India",
            "Legal Rights India",
        ],
        "hi" => vec![
            "सुप्रीम कोर्ट भारत",
            "हाई कोर्ट फैसला",
            "नए कानून भारत",
            "कानूनी अधिकार",
        ],
        "mr" => vec!["सर्वोच्च न्यायालय", "उच्च न्यायालय निर्णय", "नवीन कायदे"],
        _ => vec!["Supreme Court India", "Legal News"],
    }
}
