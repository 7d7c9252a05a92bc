//! Ingester binary for the Chronicle chain-history mirror.
//!
//! Wires the NATS event feed, the ordered dispatcher and the `PostgreSQL`
//! record store together, then runs until the feed closes or the process
//! receives Ctrl-C. The buffer is always flushed before exit.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `chronicle-config.yaml` (or `CHRONICLE_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Connect to `PostgreSQL` and run migrations
//! 4. Create the record store and dispatcher
//! 5. Connect to NATS and start the event feed
//! 6. Run the dispatch loop until shutdown
//! 7. Log the counters and close the pool

mod error;
mod nats_source;

use std::path::PathBuf;
use std::time::Duration;

use chronicle_core::{ChannelSource, ChronicleConfig, Dispatcher, LoggingConfig};
use chronicle_db::{PgRecordStore, PostgresConfig, PostgresPool};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::IngestError;
use crate::nats_source::NatsEventFeed;

/// Default configuration file, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "chronicle-config.yaml";

/// Application entry point for the ingester.
///
/// # Errors
///
/// Returns an error if configuration, the database or NATS cannot be set
/// up. Failures while ingesting are logged and counted instead.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config = load_config()?;

    // 2. Initialize structured logging.
    init_tracing(&config.logging);
    info!(
        flush_threshold = config.pipeline.flush_threshold,
        channel_capacity = config.pipeline.channel_capacity,
        retract_stake_records = config.revert.retract_stake_records,
        subject = config.infrastructure.subject,
        "chronicle-ingest starting"
    );

    // 3. Connect to PostgreSQL and run migrations.
    let pg_config = PostgresConfig::new(&config.infrastructure.postgres_url)
        .with_max_connections(config.infrastructure.max_connections)
        .with_connect_timeout(Duration::from_secs(10));
    let pool = PostgresPool::connect(&pg_config)
        .await
        .map_err(IngestError::from)?;
    pool.run_migrations().await.map_err(IngestError::from)?;
    info!("PostgreSQL connected and migrated");

    // 4. Create the record store and dispatcher.
    let store = PgRecordStore::new(pool.pool().clone())
        .with_batch_size(config.infrastructure.write_batch_size);
    let mut dispatcher = Dispatcher::from_config(store, &config);

    // 5. Connect to NATS and start the event feed.
    let nats_url = &config.infrastructure.nats_url;
    info!(nats_url = nats_url, "Connecting to NATS");
    let feed = NatsEventFeed::connect(nats_url, &config.infrastructure.subject).await?;
    let (tx, mut source) = ChannelSource::channel(config.pipeline.channel_capacity);
    let feed_handle = feed.spawn(tx);
    info!("NATS event feed started");

    // 6. Run the dispatch loop until shutdown.
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };
    let stats = dispatcher.run_until(&mut source, shutdown).await.clone();
    drop(source);
    feed_handle.abort();

    // 7. Log the counters and close the pool.
    info!(
        applied = stats.applied,
        reverted = stats.reverted,
        dropped_failed = stats.dropped_failed,
        ignored = stats.ignored,
        skipped = stats.skipped_total(),
        revert_failures = stats.revert_failures,
        flushes = stats.flushes,
        flushed_rows = stats.flushed_rows,
        store_failures = stats.store_failures,
        buffered = dispatcher.buffer().len(),
        "chronicle-ingest shutdown complete"
    );
    if !dispatcher.buffer().is_empty() {
        warn!(
            buffered = dispatcher.buffer().len(),
            "Rows still buffered after final flush were not persisted"
        );
    }
    pool.close().await;

    Ok(())
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Load configuration from `CHRONICLE_CONFIG` or `chronicle-config.yaml`.
///
/// A missing file yields defaults, still subject to environment overrides.
fn load_config() -> Result<ChronicleConfig, IngestError> {
    let config_path = std::env::var("CHRONICLE_CONFIG")
        .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    if config_path.exists() {
        Ok(ChronicleConfig::from_file(&config_path)?)
    } else {
        let mut config = ChronicleConfig::default();
        config.infrastructure.apply_env_overrides();
        Ok(config)
    }
}
