//! Batched reconcile-and-write against the record sink.

use tracing::{debug, warn};

use crate::sink::{ConflictPolicy, RecordSink, SinkTarget};
use crate::types::SinkRecord;

/// What a reconcile-and-write pass accomplished.
#[derive(Debug, Default, Clone)]
pub struct WriteOutcome {
    /// Rows handed to the sink.
    pub written: usize,

    /// Records dropped because their key already existed.
    pub skipped: usize,

    /// Chunk-level failures, recorded rather than raised.
    pub errors: Vec<String>,
}

impl WriteOutcome {
    /// Fold another outcome into this one.
    pub fn absorb(&mut self, other: WriteOutcome) {
        self.written += other.written;
        self.skipped += other.skipped;
        self.errors.extend(other.errors);
    }
}

/// Partition `records` into chunks and, per chunk: check which keys the
/// store already holds, subtract them, and batch-write the remainder.
/// Upsert targets skip the existence check entirely; key conflicts are
/// resolved by the store, so re-fetched rows can update in place.
///
/// A failing chunk is recorded in the outcome and skipped; chunks after
/// it are still attempted, so partial progress is durable.
pub async fn reconcile_and_write<R, S>(
    sink: &S,
    target: &SinkTarget,
    records: &[R],
    chunk_size: usize,
) -> WriteOutcome
where
    R: SinkRecord,
    S: RecordSink + ?Sized,
{
    let mut outcome = WriteOutcome::default();
    let check_existing = matches!(target.policy, ConflictPolicy::Insert);

    for chunk in records.chunks(chunk_size.max(1)) {
        let existing = if check_existing {
            let keys: Vec<String> = chunk
                .iter()
                .map(|record| record.natural_key().to_string())
                .collect();

            match sink.query_existing(target.table, target.key_field, &keys).await {
                Ok(existing) => existing,
                Err(e) => {
                    warn!(table = target.table, error = %e, "chunk existence check failed, skipping chunk");
                    outcome.errors.push(e.to_string());
                    continue;
                }
            }
        } else {
            Default::default()
        };

        let fresh: Vec<&R> = chunk
            .iter()
            .filter(|record| !existing.contains(record.natural_key()))
            .collect();
        outcome.skipped += chunk.len() - fresh.len();

        if fresh.is_empty() {
            continue;
        }

        let rows = fresh.iter().map(|record| record.to_row()).collect();
        match sink.write_rows(target.table, rows, target.policy).await {
            Ok(written) => {
                debug!(table = target.table, written, "chunk written");
                outcome.written += written;
            }
            Err(e) => {
                warn!(table = target.table, error = %e, "chunk write failed, continuing");
                outcome.errors.push(e.to_string());
            }
        }
    }

    outcome
}
