//! Chain-state access for the Chronicle ingestion pipeline.
//!
//! Extractors never talk to a node. They read typed records through the
//! [`StateReader`] trait from snapshots that arrive with each event:
//!
//! - [`reader`] -- The [`StateReader`] trait
//! - [`snapshot`] -- [`WorldSnapshot`], the in-memory reader shipped with events
//! - [`rules`] -- Rule tables and their fallible lookups
//! - [`events`] -- [`ApplyEvent`], [`RevertEvent`] and the [`ChainEvent`] stream item
//! - [`error`] -- [`StateError`]

pub mod error;
pub mod events;
pub mod reader;
pub mod rules;
pub mod snapshot;

pub use error::StateError;
pub use events::{ApplyEvent, ChainEvent, RevertEvent};
pub use reader::StateReader;
pub use rules::RuleTables;
pub use snapshot::WorldSnapshot;
