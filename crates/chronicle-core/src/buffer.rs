//! In-memory accumulation of extracted rows between flushes.
//!
//! The buffer holds one key-ordered map per record kind. Adding a row whose
//! key is already buffered follows the kind's [`DedupPolicy`]: profile and
//! equipment rows take the newest values, append-only rows keep the first.
//!
//! A flush is triggered by the number of successfully processed apply
//! events, never by wall-clock time. [`BatchBuffer::flush_all`] writes the
//! parent kinds first and in order (agents, then avatars), then every other
//! kind concurrently. Each kind's write is atomic on its own. Kinds that
//! fail stay buffered for the next flush; the others are cleared.

use std::collections::BTreeMap;

use chronicle_db::{DbError, RecordStore};
use chronicle_types::{DedupPolicy, Record, RecordKind};
use futures::stream::{self, StreamExt as _};
use tracing::{debug, error};

/// Outcome of a failed kind within a flush.
#[derive(Debug)]
pub struct KindFailure {
    /// Kind whose write failed.
    pub kind: RecordKind,
    /// Rows kept for the next flush.
    pub retained: usize,
    /// The store error.
    pub error: DbError,
}

/// What a flush wrote and what it kept.
#[derive(Debug, Default)]
pub struct FlushReport {
    /// Rows handed to the store per successfully written kind.
    pub written: BTreeMap<RecordKind, usize>,
    /// Kinds whose write failed.
    pub failures: Vec<KindFailure>,
}

impl FlushReport {
    /// Total rows handed to the store by successful writes.
    pub fn rows_written(&self) -> usize {
        self.written.values().copied().fold(0, usize::saturating_add)
    }

    /// Whether every kind was written.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Rows waiting for the next flush.
#[derive(Debug)]
pub struct BatchBuffer {
    tables: BTreeMap<RecordKind, BTreeMap<String, Record>>,
    threshold: usize,
    processed: usize,
}

impl BatchBuffer {
    /// Create an empty buffer that asks for a flush after `threshold`
    /// processed events (at least one).
    pub fn new(threshold: usize) -> Self {
        Self {
            tables: BTreeMap::new(),
            threshold: threshold.max(1),
            processed: 0,
        }
    }

    /// Buffer one row, collapsing it with a buffered row of the same key.
    pub fn add(&mut self, record: Record) {
        let kind = record.kind();
        let table = self.tables.entry(kind).or_default();
        let key = record.key();
        match kind.dedup_policy() {
            DedupPolicy::LastWins => {
                table.insert(key, record);
            }
            DedupPolicy::FirstWins => {
                table.entry(key).or_insert(record);
            }
        }
    }

    /// Buffer every row of one event.
    pub fn add_all(&mut self, records: impl IntoIterator<Item = Record>) {
        for record in records {
            self.add(record);
        }
    }

    /// Count one successfully processed apply event.
    pub const fn mark_processed(&mut self) {
        self.processed = self.processed.saturating_add(1);
    }

    /// Whether the processed-event count has reached the threshold.
    pub const fn should_flush(&self) -> bool {
        self.processed >= self.threshold
    }

    /// Apply events counted since the last flush.
    pub const fn processed(&self) -> usize {
        self.processed
    }

    /// Drop a buffered row. Returns it if it was present.
    pub fn remove(&mut self, kind: RecordKind, key: &str) -> Option<Record> {
        self.tables.get_mut(&kind).and_then(|table| table.remove(key))
    }

    /// Whether a row of `kind` with `key` is buffered.
    pub fn contains(&self, kind: RecordKind, key: &str) -> bool {
        self.tables
            .get(&kind)
            .is_some_and(|table| table.contains_key(key))
    }

    /// The buffered row of `kind` with `key`.
    pub fn get(&self, kind: RecordKind, key: &str) -> Option<&Record> {
        self.tables.get(&kind).and_then(|table| table.get(key))
    }

    /// Buffered rows of one kind.
    pub fn len_of(&self, kind: RecordKind) -> usize {
        self.tables.get(&kind).map_or(0, BTreeMap::len)
    }

    /// Buffered rows across all kinds.
    pub fn len(&self) -> usize {
        self.tables
            .values()
            .map(BTreeMap::len)
            .fold(0, usize::saturating_add)
    }

    /// Whether nothing is buffered.
    pub fn is_empty(&self) -> bool {
        self.tables.values().all(BTreeMap::is_empty)
    }

    /// Write every buffered kind and clear what was written.
    ///
    /// The processed-event count restarts at zero even when a kind fails,
    /// so failed kinds are retried at the next threshold, not immediately.
    pub async fn flush_all<S: RecordStore>(&mut self, store: &S) -> FlushReport {
        let mut report = FlushReport::default();
        self.processed = 0;

        let mut batches: Vec<(RecordKind, Vec<Record>)> = std::mem::take(&mut self.tables)
            .into_iter()
            .filter(|(_, table)| !table.is_empty())
            .map(|(kind, table)| (kind, table.into_values().collect()))
            .collect();
        let children = batches.split_off(batches.partition_point(|(kind, _)| kind.is_parent()));

        for (kind, records) in batches {
            let result = store.write_batch(kind, &records).await;
            self.settle(&mut report, kind, records, result);
        }

        let parallel_limit = children.len().max(1);
        let results: Vec<_> = stream::iter(children)
            .map(|(kind, records)| async move {
                let result = store.write_batch(kind, &records).await;
                (kind, records, result)
            })
            .buffered(parallel_limit)
            .collect()
            .await;
        for (kind, records, result) in results {
            self.settle(&mut report, kind, records, result);
        }

        debug!(
            rows = report.rows_written(),
            failed_kinds = report.failures.len(),
            "Flush complete"
        );
        report
    }

    fn settle(
        &mut self,
        report: &mut FlushReport,
        kind: RecordKind,
        records: Vec<Record>,
        result: Result<u64, DbError>,
    ) {
        match result {
            Ok(_) => {
                report.written.insert(kind, records.len());
            }
            Err(error) => {
                error!(table = kind.table(), rows = records.len(), %error, "Flush failed, keeping rows");
                let retained = records.len();
                self.retain(kind, records);
                report.failures.push(KindFailure {
                    kind,
                    retained,
                    error,
                });
            }
        }
    }

    /// Put rows of a failed write back, behind anything buffered since.
    fn retain(&mut self, kind: RecordKind, records: Vec<Record>) {
        let table = self.tables.entry(kind).or_default();
        for record in records {
            table.entry(record.key()).or_insert(record);
        }
    }
}
