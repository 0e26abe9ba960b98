//! External source descriptors and URL construction.

use serde::{Deserialize, Serialize};
use url::Url;

/// Search endpoint for case law. Free-text query goes in `formInput`,
/// pages after the first in `pagenum`.
const CASE_SEARCH_ENDPOINT: &str = "https://indiankanoon.org/search/";

/// RSS search endpoint for legal news. `hl`/`gl`/`ceid` select the
/// language and region edition.
const NEWS_FEED_ENDPOINT: &str = "https://news.google.com/rss/search";

/// Which extraction mode a source's raw text goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Link-anchor scanning of search-result HTML.
    CaseSearch,
    /// Item-block scanning of feed XML.
    NewsFeed,
}

/// Header profile sent with outbound fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderProfile {
    /// Realistic browser identity, for sources that reject non-browser agents.
    Browser,
    /// Plain client identity, fine for RSS endpoints.
    Plain,
}

/// Locale settings for one feed language edition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    /// ISO code stored on records, e.g. "en", "hi".
    pub code: String,
    /// `hl` parameter value.
    pub hl: String,
    /// `ceid` edition parameter value.
    pub ceid: String,
}

impl Language {
    pub fn new(code: &str, hl: &str, ceid: &str) -> Self {
        Self {
            code: code.to_string(),
            hl: hl.to_string(),
            ceid: ceid.to_string(),
        }
    }

    /// Languages the news refresh covers by default.
    pub fn supported() -> Vec<Language> {
        vec![
            Language::new("en", "en-IN", "IN:en"),
            Language::new("hi", "hi", "IN:hi"),
            Language::new("bn", "bn", "IN:bn"),
            Language::new("te", "te", "IN:te"),
            Language::new("mr", "mr", "IN:mr"),
            Language::new("ta", "ta", "IN:ta"),
        ]
    }
}

/// Immutable descriptor of one upstream source.
///
/// Created at configuration time and never mutated; the paginator and
/// extractor only read from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalSource {
    /// Diagnostic name used in logs and error entries.
    pub name: String,
    pub kind: SourceKind,
    /// Free-text search terms (case search) or feed query (news).
    pub query: String,
    /// Category tag stamped onto feed records.
    pub category: String,
    /// Language edition for feed sources.
    pub language: Option<Language>,
    /// Whether successive result pages exist beyond page zero.
    pub paginated: bool,
    pub headers: HeaderProfile,
}

impl ExternalSource {
    /// Case-law search source for one statute section.
    pub fn case_search(section: &str) -> Self {
        let section = sanitize_section(section);
        Self {
            name: format!("indiankanoon:{section}"),
            kind: SourceKind::CaseSearch,
            query: format!("section {section} IPC"),
            category: "case_law".to_string(),
            language: None,
            paginated: true,
            headers: HeaderProfile::Browser,
        }
    }

    /// News feed source for one query in one language edition.
    pub fn news_feed(query: &str, language: Language) -> Self {
        Self {
            name: format!("news:{}:{query}", language.code),
            kind: SourceKind::NewsFeed,
            query: query.to_string(),
            category: "general".to_string(),
            language: Some(language),
            paginated: false,
            headers: HeaderProfile::Plain,
        }
    }

    /// Language code stamped onto this source's records.
    pub fn language_code(&self) -> &str {
        self.language.as_ref().map(|l| l.code.as_str()).unwrap_or("en")
    }

    /// Fully formed URL for the given zero-based page.
    pub fn page_url(&self, page: usize) -> Result<String, url::ParseError> {
        match self.kind {
            SourceKind::CaseSearch => {
                let mut url = Url::parse(CASE_SEARCH_ENDPOINT)?;
                {
                    let mut pairs = url.query_pairs_mut();
                    pairs.append_pair("formInput", &self.query);
                    if page > 0 {
                        pairs.append_pair("pagenum", &page.to_string());
                    }
                }
                Ok(url.into())
            }
            SourceKind::NewsFeed => {
                let mut url = Url::parse(NEWS_FEED_ENDPOINT)?;
                {
                    let mut pairs = url.query_pairs_mut();
                    pairs.append_pair("q", &self.query);
                    if let Some(lang) = &self.language {
                        pairs.append_pair("hl", &lang.hl);
                        pairs.append_pair("gl", "IN");
                        pairs.append_pair("ceid", &lang.ceid);
                    }
                }
                Ok(url.into())
            }
        }
    }
}

/// Strip a user-supplied section identifier down to alphanumerics,
/// e.g. " 302-A " becomes "302A".
pub fn sanitize_section(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}
