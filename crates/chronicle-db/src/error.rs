//! Error types for the mirror store.
//!
//! All errors are propagated via [`DbError`], which wraps the underlying
//! [`sqlx`] errors and adds the store-level failures the ingester reacts to.

use chronicle_types::RecordKind;

/// Errors that can occur in the mirror store.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A `PostgreSQL` operation failed.
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),

    /// A `PostgreSQL` migration failed.
    #[error("PostgreSQL migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Deletion was requested for a kind that is never retracted.
    #[error("delete not supported for {0}")]
    UnsupportedDelete(RecordKind),

    /// A record key could not be turned into the table's key type.
    #[error("invalid key {key:?} for {kind}")]
    InvalidKey {
        /// Kind the key was given for.
        kind: RecordKind,
        /// The offending key.
        key: String,
    },

    /// A batch handed to the store mixed record kinds.
    #[error("batch for {expected} holds a {found} record")]
    KindMismatch {
        /// Kind the batch was written as.
        expected: RecordKind,
        /// Kind of the stray record.
        found: RecordKind,
    },

    /// A write failed inside the in-memory store.
    #[error("memory store error: {0}")]
    Memory(String),

    /// A configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}
