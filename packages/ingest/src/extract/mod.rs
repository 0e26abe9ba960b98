//! Tolerant pattern extraction over raw source text.
//!
//! One extraction mode per [`SourceKind`], selected by the source
//! descriptor rather than a type hierarchy. All modes run a single
//! top-to-bottom pass and preserve first-seen order, which is what makes
//! "first occurrence wins" hold later in within-batch dedup.

mod cases;
mod feed;

pub use cases::extract_cases;
pub use feed::extract_feed_items;

use crate::types::{CandidateRecord, ExternalSource, SourceKind};

/// Extract candidate records from one page of raw text.
///
/// Never fails: hostile or malformed markup degrades to fewer records.
pub fn extract(raw: &str, source: &ExternalSource) -> Vec<CandidateRecord> {
    match source.kind {
        SourceKind::CaseSearch => extract_cases(raw)
            .into_iter()
            .map(CandidateRecord::Case)
            .collect(),
        SourceKind::NewsFeed => {
            extract_feed_items(raw, &source.category, source.language_code())
                .into_iter()
                .map(CandidateRecord::Feed)
                .collect()
        }
    }
}
