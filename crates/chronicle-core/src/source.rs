//! Ordered event sources the dispatcher pulls from.

use std::collections::VecDeque;
use std::future::Future;

use chronicle_state::ChainEvent;
use tokio::sync::mpsc;

/// A strictly ordered stream of chain events.
///
/// `next_event` must be cancel-safe: the dispatcher races it against a
/// shutdown signal and a dropped call must not lose an event.
pub trait EventSource: Send {
    /// The next event, or `None` once the stream has ended.
    fn next_event(&mut self) -> impl Future<Output = Option<ChainEvent>> + Send;
}

/// Events arriving over a bounded channel from a producer task.
#[derive(Debug)]
pub struct ChannelSource {
    rx: mpsc::Receiver<ChainEvent>,
}

impl ChannelSource {
    /// Wrap an existing receiver.
    pub const fn new(rx: mpsc::Receiver<ChainEvent>) -> Self {
        Self { rx }
    }

    /// Create a channel of `capacity` events and its source half.
    pub fn channel(capacity: usize) -> (mpsc::Sender<ChainEvent>, Self) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (tx, Self::new(rx))
    }
}

impl EventSource for ChannelSource {
    async fn next_event(&mut self) -> Option<ChainEvent> {
        self.rx.recv().await
    }
}

/// A fixed, already-ordered list of events.
impl EventSource for VecDeque<ChainEvent> {
    async fn next_event(&mut self) -> Option<ChainEvent> {
        self.pop_front()
    }
}
