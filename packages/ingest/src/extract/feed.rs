//! Item-block extraction for RSS/XML news feeds.
//!
//! Scans `<item>` blocks for a title/link/pubDate triple, tolerant of
//! attributes, whitespace, and CDATA wrappers. Items missing any of the
//! three are skipped rather than failing the pass.

use chrono::Utc;
use lazy_static::lazy_static;
use regex::Regex;

use crate::types::FeedRecord;

lazy_static! {
    static ref ITEM_BLOCK: Regex = Regex::new(r"(?is)<item[^>]*>(.*?)</item>").unwrap();
    static ref ITEM_TITLE: Regex = Regex::new(r"(?is)<title[^>]*>(.*?)</title>").unwrap();
    static ref ITEM_LINK: Regex = Regex::new(r"(?is)<link[^>]*>(.*?)</link>").unwrap();
    static ref ITEM_PUB_DATE: Regex = Regex::new(r"(?is)<pubDate[^>]*>(.*?)</pubDate>").unwrap();
}

const FALLBACK_TITLE: &str = "Legal Update";

const SUBTITLE_EN: &str = "Latest Legal Update";
const SUBTITLE_LOCALIZED: &str = "नवीनतम कानूनी अपडेट";

/// Scan feed XML top to bottom and collect records in document order,
/// tagged with the category and language that produced them.
pub fn extract_feed_items(xml: &str, category: &str, language: &str) -> Vec<FeedRecord> {
    let subtitle = if language == "en" {
        SUBTITLE_EN
    } else {
        SUBTITLE_LOCALIZED
    };

    ITEM_BLOCK
        .captures_iter(xml)
        .filter_map(|item| {
            let block = item.get(1)?.as_str();
            let title = field(&ITEM_TITLE, block)?;
            let link = field(&ITEM_LINK, block)?;
            // Publish date is part of the structural shape but not persisted.
            field(&ITEM_PUB_DATE, block)?;

            Some(FeedRecord {
                title: clean_title(&title),
                link,
                subtitle: Some(subtitle.to_string()),
                category: category.to_string(),
                language: language.to_string(),
                fetched_at: Utc::now(),
            })
        })
        .collect()
}

/// First match of `pattern` in `block`, unwrapped from CDATA and trimmed.
fn field(pattern: &Regex, block: &str) -> Option<String> {
    let raw = pattern.captures(block)?.get(1)?.as_str().trim();
    let inner = raw
        .strip_prefix("<![CDATA[")
        .and_then(|s| s.strip_suffix("]]>"))
        .unwrap_or(raw)
        .trim();
    Some(inner.to_string())
}

/// Feed titles arrive as "Headline - Publisher"; keep the headline.
fn clean_title(raw: &str) -> String {
    let title = if raw.is_empty() { FALLBACK_TITLE } else { raw };
    match title.split_once(" - ") {
        Some((headline, _publisher)) => headline.to_string(),
        None => title.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version="1.0"?>
<rss version="2.0"><channel>
  <title>search results</title>
  <item>
    <title>Court Rules on Bail - Live Law</title>
    <link>https://news.example/articles/1</link>
    <pubDate>Mon, 24 Aug 2026 05:00:00 GMT</pubDate>
  </item>
  <item>
    <title><![CDATA[New Act Notified - Bar and Bench]]></title>
    <link>
      https://news.example/articles/2
    </link>
    <pubDate>Mon, 24 Aug 2026 06:00:00 GMT</pubDate>
  </item>
  <item>
    <title>No link or date on this one</title>
  </item>
</channel></rss>"#;

    #[test]
    fn extracts_items_and_cleans_titles() {
        let items = extract_feed_items(FEED, "general", "en");

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "Court Rules on Bail");
        assert_eq!(items[0].link, "https://news.example/articles/1");
        assert_eq!(items[0].subtitle.as_deref(), Some("Latest Legal Update"));
        assert_eq!(items[1].title, "New Act Notified");
        assert_eq!(items[1].link, "https://news.example/articles/2");
    }

    #[test]
    fn incomplete_items_are_skipped_not_fatal() {
        let items = extract_feed_items(FEED, "general", "en");
        assert!(items.iter().all(|i| !i.link.is_empty()));
    }

    #[test]
    fn items_carry_category_and_language() {
        let items = extract_feed_items(FEED, "general", "hi");
        assert!(items.iter().all(|i| i.language == "hi"));
        assert!(items.iter().all(|i| i.category == "general"));
        assert_eq!(items[0].subtitle.as_deref(), Some("नवीनतम कानूनी अपडेट"));
    }

    #[test]
    fn attribute_variation_is_tolerated() {
        let xml = r#"<item rdf:about="x">
            <title type="text">Verdict Due Tomorrow</title>
            <link rel="alternate">https://news.example/3</link>
            <pubDate zone="UTC">Tue, 25 Aug 2026 01:00:00 GMT</pubDate>
        </item>"#;
        let items = extract_feed_items(xml, "general", "en");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Verdict Due Tomorrow");
    }

    #[test]
    fn garbage_input_yields_nothing() {
        assert!(extract_feed_items("{not xml}", "general", "en").is_empty());
        assert!(extract_feed_items("", "general", "en").is_empty());
    }

    #[test]
    fn title_split_keeps_left_of_first_separator() {
        assert_eq!(clean_title("A - B - C"), "A");
        assert_eq!(clean_title("No separator"), "No separator");
        assert_eq!(clean_title(""), "Legal Update");
    }
}
