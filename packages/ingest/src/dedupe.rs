//! Natural-key deduplication. Pure functions over in-memory sequences;
//! no I/O here.

use std::collections::HashSet;

use crate::types::SinkRecord;

/// Keep the first occurrence per natural key, in original order.
pub fn dedupe_within_batch<R: SinkRecord>(records: Vec<R>) -> Vec<R> {
    let mut seen: HashSet<String> = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|record| seen.insert(record.natural_key().to_string()))
        .collect()
}

/// Drop records whose natural key the store already holds, preserving order.
pub fn dedupe_against_store<R: SinkRecord>(records: Vec<R>, existing: &HashSet<String>) -> Vec<R> {
    records
        .into_iter()
        .filter(|record| !existing.contains(record.natural_key()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CandidateRecord, FeedRecord};
    use chrono::Utc;

    fn feed(link: &str, title: &str) -> CandidateRecord {
        CandidateRecord::Feed(FeedRecord {
            title: title.to_string(),
            link: link.to_string(),
            subtitle: None,
            category: "general".to_string(),
            language: "en".to_string(),
            fetched_at: Utc::now(),
        })
    }

    fn titles(records: &[CandidateRecord]) -> Vec<&str> {
        records
            .iter()
            .map(|r| match r {
                CandidateRecord::Feed(f) => f.title.as_str(),
                CandidateRecord::Case(c) => c.title.as_str(),
            })
            .collect()
    }

    #[test]
    fn first_occurrence_wins_and_order_is_preserved() {
        let batch = vec![
            feed("https://n/1", "first"),
            feed("https://n/2", "second"),
            feed("https://n/1", "duplicate of first"),
            feed("https://n/3", "third"),
        ];

        let unique = dedupe_within_batch(batch);

        assert_eq!(titles(&unique), vec!["first", "second", "third"]);
    }

    #[test]
    fn within_batch_output_has_unique_keys() {
        let batch = vec![feed("https://n/1", "a"), feed("https://n/1", "b")];
        let unique = dedupe_within_batch(batch);

        let keys: HashSet<_> = unique.iter().map(|r| r.natural_key()).collect();
        assert_eq!(keys.len(), unique.len());
    }

    #[test]
    fn store_dedup_removes_only_known_keys() {
        let batch = vec![
            feed("https://n/1", "kept"),
            feed("https://n/2", "already stored"),
            feed("https://n/3", "also kept"),
        ];
        let existing: HashSet<String> = ["https://n/2".to_string()].into_iter().collect();

        let novel = dedupe_against_store(batch, &existing);

        assert_eq!(titles(&novel), vec!["kept", "also kept"]);
    }

    #[test]
    fn store_dedup_with_empty_set_is_identity() {
        let batch = vec![feed("https://n/1", "a"), feed("https://n/2", "b")];
        let novel = dedupe_against_store(batch.clone(), &HashSet::new());
        assert_eq!(titles(&novel), titles(&batch));
    }

    #[test]
    fn link_fallback_dedupes_linkless_items_by_title() {
        let batch = vec![feed("", "Same Headline"), feed("", "Same Headline")];
        assert_eq!(dedupe_within_batch(batch).len(), 1);
    }
}
