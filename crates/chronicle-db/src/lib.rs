//! Mirror store for the Chronicle chain-history ingester.
//!
//! Rows produced by the extractors land in one `PostgreSQL` table per
//! record kind. The ingester only ever talks to the [`RecordStore`] trait:
//!
//! ```text
//! BatchBuffer flush
//!     |
//!     +-- write_batch(kind, records) --> PgRecordStore  (UNNEST per chunk)
//!     |                              \-> MemoryStore    (tests, dry runs)
//!     +-- delete(kind, key) ----------> single-row DELETE on revert
//! ```
//!
//! # Modules
//!
//! - [`postgres`] -- Connection pool, configuration and migrations
//! - [`store`] -- The [`RecordStore`] trait
//! - [`record_store`] -- [`PgRecordStore`], the `PostgreSQL` implementation
//! - [`memory`] -- [`MemoryStore`], an in-process implementation
//! - [`error`] -- Shared error types

pub mod error;
pub mod memory;
pub mod postgres;
pub mod record_store;
pub mod store;

pub use error::DbError;
pub use memory::{MemoryStore, StoreCall};
pub use postgres::{PostgresConfig, PostgresPool};
pub use record_store::PgRecordStore;
pub use store::RecordStore;
