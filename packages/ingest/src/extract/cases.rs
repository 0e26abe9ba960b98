//! Link-anchor extraction for case-law search results.
//!
//! The upstream markup is uncontrolled, so this scans for anchor-shaped
//! substrings instead of parsing a DOM; malformed input yields fewer
//! records, never an error.

use chrono::Utc;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

use crate::types::CaseRecord;

lazy_static! {
    /// `href="/doc/123/..." ...>visible label<` including docfragment links.
    static ref CASE_LINK: Regex =
        Regex::new(r#"href="/doc(?:fragment)?/(\d+)/[^"]*"[^>]*>([^<]+)<"#).unwrap();
    static ref HIGH_COURT: Regex = Regex::new(r"(?i)(\w+)\s+High\s+Court").unwrap();
    /// "on 12 January, 2020" as printed in result titles.
    static ref DECISION_DATE: Regex = Regex::new(r"(?i)\bon\s+(\d{1,2}\s+\w+,?\s+\d{4})").unwrap();
}

/// Labels that are site chrome, not case titles.
const BOILERPLATE_LABELS: [&str; 2] = ["Full Document", "Entire Act"];
const BOILERPLATE_PREFIXES: [&str; 2] = ["Cites", "Cited by"];

/// Labels shorter than this are navigation noise, not titles.
const MIN_LABEL_CHARS: usize = 10;

const DOCUMENT_URL_BASE: &str = "https://indiankanoon.org/doc";

/// Scan search-result HTML top to bottom and collect case records in
/// first-seen order. A document id appearing more than once keeps only
/// its first label.
pub fn extract_cases(html: &str) -> Vec<CaseRecord> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut cases = Vec::new();

    for capture in CASE_LINK.captures_iter(html) {
        let doc_id = capture.get(1).map(|m| m.as_str()).unwrap_or_default();
        let title = capture.get(2).map(|m| m.as_str().trim()).unwrap_or_default();

        if seen.contains(doc_id) || title.chars().count() < MIN_LABEL_CHARS {
            continue;
        }
        if BOILERPLATE_LABELS.contains(&title)
            || BOILERPLATE_PREFIXES.iter().any(|p| title.starts_with(p))
        {
            continue;
        }

        seen.insert(doc_id);
        cases.push(CaseRecord {
            title: title.to_string(),
            doc_id: doc_id.to_string(),
            court: derive_court(title),
            date: derive_date(title),
            url: format!("{DOCUMENT_URL_BASE}/{doc_id}/"),
            cited_by: None,
            fetched_at: Utc::now(),
        });
    }

    cases
}

/// Best-effort court name from the title line. Advisory metadata only;
/// never part of the natural key.
fn derive_court(title: &str) -> String {
    let lower = title.to_lowercase();
    if lower.contains("supreme court") {
        return "Supreme Court of India".to_string();
    }
    if lower.contains("high court") {
        return match HIGH_COURT.captures(title) {
            Some(capture) => format!("{} High Court", &capture[1]),
            None => "High Court".to_string(),
        };
    }
    "Unknown Court".to_string()
}

/// Best-effort decision date from the title line; empty when absent.
fn derive_date(title: &str) -> String {
    DECISION_DATE
        .captures(title)
        .map(|capture| capture[1].to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_single_case_with_court_and_date() {
        let html = r#"<a href="/doc/555/">State of Punjab vs Ram Singh on 5 March, 2019</a>"#;
        let cases = extract_cases(html);

        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].doc_id, "555");
        assert_eq!(cases[0].court, "Unknown Court");
        assert_eq!(cases[0].date, "5 March, 2019");
        assert_eq!(cases[0].url, "https://indiankanoon.org/doc/555/");
    }

    #[test]
    fn rejects_boilerplate_labels() {
        let html = concat!(
            r#"<a href="/doc/999/" >Cited by 4</a>"#,
            r#"<a href="/doc/998/">Full Document</a>"#,
            r#"<a href="/doc/997/">Cites 12 judgments here</a>"#,
            r#"<a href="/doc/996/">Entire Act</a>"#,
        );
        assert!(extract_cases(html).is_empty());
    }

    #[test]
    fn rejects_short_labels() {
        let html = r#"<a href="/doc/100/">Next</a>"#;
        assert!(extract_cases(html).is_empty());
    }

    #[test]
    fn first_label_per_doc_id_wins() {
        let html = concat!(
            r#"<a href="/doc/42/">Mohan Lal vs State of Haryana on 1 June, 2021</a>"#,
            r#"<a href="/doc/42/">A different label for the same doc</a>"#,
        );
        let cases = extract_cases(html);
        assert_eq!(cases.len(), 1);
        assert!(cases[0].title.starts_with("Mohan Lal"));
    }

    #[test]
    fn docfragment_links_count() {
        let html = r#"<a href="/docfragment/77/?big=1">Union of India vs Kumar on 2 May, 2018</a>"#;
        let cases = extract_cases(html);
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].doc_id, "77");
    }

    #[test]
    fn derives_supreme_and_high_courts() {
        assert_eq!(
            derive_court("Appeal before the Supreme Court of India"),
            "Supreme Court of India"
        );
        assert_eq!(
            derive_court("Ramesh vs State, Bombay High Court bench"),
            "Bombay High Court"
        );
        assert_eq!(derive_court("High Court order in writ matter"), "High Court");
        assert_eq!(derive_court("Sessions Court matter"), "Unknown Court");
    }

    #[test]
    fn malformed_markup_yields_nothing() {
        assert!(extract_cases("<<<not html at all").is_empty());
        assert!(extract_cases("").is_empty());
    }
}
