//! Ordered ingestion core for the Chronicle chain-history mirror.
//!
//! A single [`Dispatcher`] pulls [`ChainEvent`](chronicle_state::ChainEvent)s
//! from an [`EventSource`] in chain order, turns apply events into records
//! via the extractors, holds them in a [`BatchBuffer`] and flushes the buffer
//! to a [`RecordStore`](chronicle_db::RecordStore) every `flush_threshold`
//! processed actions. Revert events go through the [`Reconciler`].
//!
//! # Modules
//!
//! - [`config`] -- YAML configuration with environment overrides
//! - [`buffer`] -- Per-kind deduplicating buffer and the flush protocol
//! - [`reconciler`] -- Revert handling
//! - [`dispatcher`] -- The ordered event loop and its counters
//! - [`source`] -- Event sources

pub mod buffer;
pub mod config;
pub mod dispatcher;
pub mod reconciler;
pub mod source;

pub use buffer::{BatchBuffer, FlushReport, KindFailure};
pub use config::{
    ChronicleConfig, ConfigError, InfrastructureConfig, LoggingConfig, PipelineConfig,
    RevertConfig,
};
pub use dispatcher::{Dispatcher, IngestStats};
pub use reconciler::{ReconcileError, Reconciler, RevertOutcome, Retraction};
pub use source::{ChannelSource, EventSource};
