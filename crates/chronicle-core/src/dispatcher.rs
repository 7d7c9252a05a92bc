//! The ordered dispatch loop.
//!
//! The dispatcher owns the buffer and handles one event at a time, to
//! completion, including any flush the event triggers. Nothing else touches
//! the buffer.
//!
//! # Per-event flow
//!
//! ```text
//! apply:  failed? -> drop
//!         untracked? -> ignore
//!         threshold reached? -> flush first
//!         extract -> buffer, count as processed   (error -> log, skip)
//!
//! revert: failed? -> drop
//!         untracked? -> ignore
//!         reconcile: retract record, re-derive equipment
//! ```

use std::collections::BTreeMap;
use std::future::Future;

use chronicle_db::RecordStore;
use chronicle_extract::{ApplyContext, ErrorClass, extract_apply};
use chronicle_state::{ApplyEvent, ChainEvent, RevertEvent};
use tracing::{debug, info, warn};

use crate::buffer::{BatchBuffer, FlushReport};
use crate::config::ChronicleConfig;
use crate::reconciler::{Reconciler, Retraction};
use crate::source::EventSource;

/// Counters kept by the dispatcher and logged at shutdown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestStats {
    /// Apply events whose rows were buffered.
    pub applied: u64,
    /// Revert events reconciled.
    pub reverted: u64,
    /// Events dropped because the action failed on chain.
    pub dropped_failed: u64,
    /// Events for untracked action kinds.
    pub ignored: u64,
    /// Apply events skipped because extraction failed, per error class.
    pub skipped: BTreeMap<ErrorClass, u64>,
    /// Revert events whose reconciliation failed.
    pub revert_failures: u64,
    /// Flushes run.
    pub flushes: u64,
    /// Rows handed to the store by successful writes.
    pub flushed_rows: u64,
    /// Kind writes that failed across all flushes.
    pub store_failures: u64,
}

impl IngestStats {
    /// Apply events skipped for any reason.
    pub fn skipped_total(&self) -> u64 {
        self.skipped.values().copied().fold(0, u64::saturating_add)
    }

    fn record_skip(&mut self, class: ErrorClass) {
        let count = self.skipped.entry(class).or_insert(0);
        *count = count.saturating_add(1);
    }
}

const fn bump(counter: &mut u64) {
    *counter = counter.saturating_add(1);
}

fn widen(value: usize) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}

/// Routes chain events to extractors, the buffer and the reconciler.
pub struct Dispatcher<S> {
    store: S,
    buffer: BatchBuffer,
    reconciler: Reconciler,
    stats: IngestStats,
}

impl<S: RecordStore> Dispatcher<S> {
    /// Create a dispatcher that flushes every `flush_threshold` processed
    /// apply events.
    pub fn new(store: S, flush_threshold: usize, reconciler: Reconciler) -> Self {
        Self {
            store,
            buffer: BatchBuffer::new(flush_threshold),
            reconciler,
            stats: IngestStats::default(),
        }
    }

    /// Create a dispatcher from the pipeline and revert sections of `config`.
    pub fn from_config(store: S, config: &ChronicleConfig) -> Self {
        Self::new(
            store,
            config.pipeline.flush_threshold,
            Reconciler::new(config.revert.retract_stake_records),
        )
    }

    /// Handle one event to completion.
    pub async fn handle(&mut self, event: &ChainEvent) {
        match event {
            ChainEvent::Apply(apply) => self.handle_apply(apply).await,
            ChainEvent::Revert(revert) => self.handle_revert(revert).await,
        }
    }

    /// Handle one apply event.
    pub async fn handle_apply(&mut self, event: &ApplyEvent) {
        if event.failed {
            debug!(action_id = %event.action_id, "Dropping failed action");
            bump(&mut self.stats.dropped_failed);
            return;
        }
        let Some(kind) = event.action.kind() else {
            bump(&mut self.stats.ignored);
            return;
        };

        if self.buffer.should_flush() {
            self.flush().await;
        }

        let ctx = ApplyContext::from_event(event);
        match extract_apply(&ctx, &event.action) {
            Ok(records) => {
                debug!(
                    action_id = %event.action_id,
                    kind = kind.as_str(),
                    block_index = event.block_index,
                    rows = records.len(),
                    "Extracted action"
                );
                self.buffer.add_all(records);
                self.buffer.mark_processed();
                bump(&mut self.stats.applied);
            }
            Err(error) => {
                warn!(
                    action_id = %event.action_id,
                    kind = kind.as_str(),
                    block_index = event.block_index,
                    class = error.class().as_str(),
                    %error,
                    "Skipping action"
                );
                self.stats.record_skip(error.class());
            }
        }
    }

    /// Handle one revert event.
    pub async fn handle_revert(&mut self, event: &RevertEvent) {
        if event.failed {
            debug!(action_id = %event.action_id, "Dropping revert of failed action");
            bump(&mut self.stats.dropped_failed);
            return;
        }
        let Some(kind) = event.action.kind() else {
            bump(&mut self.stats.ignored);
            return;
        };

        match self
            .reconciler
            .revert(event, kind, &mut self.buffer, &self.store)
            .await
        {
            Ok(outcome) => {
                if outcome.retraction == Retraction::Deleted(0) {
                    warn!(
                        action_id = %event.action_id,
                        kind = kind.as_str(),
                        "Reverted action had no stored row"
                    );
                }
                debug!(
                    action_id = %event.action_id,
                    kind = kind.as_str(),
                    retraction = ?outcome.retraction,
                    rederived = outcome.rederived,
                    "Reverted action"
                );
                bump(&mut self.stats.reverted);
            }
            Err(error) => {
                warn!(
                    action_id = %event.action_id,
                    kind = kind.as_str(),
                    %error,
                    "Revert reconciliation failed"
                );
                bump(&mut self.stats.revert_failures);
            }
        }
    }

    /// Flush the buffer now.
    pub async fn flush(&mut self) -> FlushReport {
        let report = self.buffer.flush_all(&self.store).await;
        bump(&mut self.stats.flushes);
        self.stats.flushed_rows = self
            .stats
            .flushed_rows
            .saturating_add(widen(report.rows_written()));
        self.stats.store_failures = self
            .stats
            .store_failures
            .saturating_add(widen(report.failures.len()));
        report
    }

    /// Pull and handle events until the source ends, then flush.
    pub async fn run<E: EventSource>(&mut self, source: &mut E) -> &IngestStats {
        self.run_until(source, std::future::pending::<()>()).await
    }

    /// Pull and handle events until the source ends or `shutdown`
    /// resolves, then flush.
    ///
    /// Shutdown is only observed between events; an event that has been
    /// pulled is always handled to completion first.
    pub async fn run_until<E, F>(&mut self, source: &mut E, shutdown: F) -> &IngestStats
    where
        E: EventSource,
        F: Future<Output = ()>,
    {
        let mut shutdown = std::pin::pin!(shutdown);
        loop {
            let next = tokio::select! {
                biased;
                () = &mut shutdown => {
                    info!("Shutdown requested");
                    break;
                }
                next = source.next_event() => next,
            };
            let Some(event) = next else {
                info!("Event source closed");
                break;
            };
            self.handle(&event).await;
        }

        let report = self.flush().await;
        info!(
            rows = report.rows_written(),
            failed_kinds = report.failures.len(),
            buffered = self.buffer.len(),
            "Final flush complete"
        );
        &self.stats
    }

    /// Counters so far.
    pub const fn stats(&self) -> &IngestStats {
        &self.stats
    }

    /// The buffer, for inspection.
    pub const fn buffer(&self) -> &BatchBuffer {
        &self.buffer
    }

    /// The store rows are flushed to.
    pub const fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skip_counts_by_class() {
        let mut stats = IngestStats::default();
        stats.record_skip(ErrorClass::MissingRuleData);
        stats.record_skip(ErrorClass::MissingRuleData);
        stats.record_skip(ErrorClass::Internal);
        assert_eq!(stats.skipped.get(&ErrorClass::MissingRuleData), Some(&2));
        assert_eq!(stats.skipped_total(), 3);
    }
}
