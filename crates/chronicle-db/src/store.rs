//! The write interface the ingester flushes through.

use std::future::Future;

use chronicle_types::{Record, RecordKind};

use crate::error::DbError;

/// Batched writes and single-row deletes against the mirror.
///
/// `write_batch` receives records of one kind only and must apply them
/// all-or-nothing. Implementations must tolerate rewriting a row that is
/// already present: parents and equipment are upserted, everything else is
/// kept as first written.
pub trait RecordStore: Send + Sync {
    /// Write every record of one kind. Returns the number of rows touched.
    fn write_batch(
        &self,
        kind: RecordKind,
        records: &[Record],
    ) -> impl Future<Output = Result<u64, DbError>> + Send;

    /// Delete the row of `kind` identified by `key`. Returns the number of
    /// rows removed (zero when the row was never written).
    fn delete(
        &self,
        kind: RecordKind,
        key: &str,
    ) -> impl Future<Output = Result<u64, DbError>> + Send;
}
