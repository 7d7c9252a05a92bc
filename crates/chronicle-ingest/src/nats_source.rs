//! NATS feed of chain events.
//!
//! The chain follower publishes one JSON-encoded
//! [`ChainEvent`](chronicle_state::ChainEvent) per message on a single
//! subject, in chain order. [`NatsEventFeed`] subscribes to that subject and
//! forwards decoded events into the bounded channel the dispatcher reads
//! from. A full channel stops the forwarder from pulling more messages.

use chronicle_state::ChainEvent;
use futures::StreamExt as _;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::IngestError;

/// A live subscription to the chain event subject.
pub struct NatsEventFeed {
    /// Keeps the connection alive for the subscription's lifetime.
    _client: async_nats::Client,
    subscriber: async_nats::Subscriber,
    subject: String,
}

impl NatsEventFeed {
    /// Connect to `url` and subscribe to `subject`.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Nats`] if the connection or subscription fails.
    pub async fn connect(url: &str, subject: &str) -> Result<Self, IngestError> {
        let client = async_nats::connect(url)
            .await
            .map_err(|e| IngestError::Nats {
                message: format!("failed to connect to NATS at {url}: {e}"),
            })?;
        let subscriber = client
            .subscribe(subject.to_owned())
            .await
            .map_err(|e| IngestError::Nats {
                message: format!("failed to subscribe to {subject}: {e}"),
            })?;
        Ok(Self {
            _client: client,
            subscriber,
            subject: subject.to_owned(),
        })
    }

    /// Forward decoded events into `tx` until the subscription ends or the
    /// receiver is dropped.
    ///
    /// The task resolves to the number of messages that could not be
    /// decoded. Those are logged and skipped.
    pub fn spawn(self, tx: mpsc::Sender<ChainEvent>) -> JoinHandle<u64> {
        let Self {
            _client: client,
            mut subscriber,
            subject,
        } = self;
        tokio::spawn(async move {
            let _client = client;
            let mut undecodable: u64 = 0;
            while let Some(msg) = subscriber.next().await {
                match serde_json::from_slice::<ChainEvent>(&msg.payload) {
                    Ok(event) => {
                        debug!(
                            action_id = %event.action_id(),
                            block_index = event.block_index(),
                            "Received chain event"
                        );
                        if tx.send(event).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        undecodable = undecodable.saturating_add(1);
                        warn!(
                            subject = subject.as_str(),
                            bytes = msg.payload.len(),
                            error = %e,
                            "failed to deserialize chain event"
                        );
                    }
                }
            }
            info!(subject = subject.as_str(), "NATS feed stopped");
            undecodable
        })
    }
}
