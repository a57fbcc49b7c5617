#![allow(dead_code)]

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::debug;

use soulfill_core_types::SoulError;

/// Trait implemented by payload types that can be carried on the bus.
pub trait Event: Clone + Send + Sync + std::fmt::Debug + 'static {}

impl<T> Event for T where T: Clone + Send + Sync + std::fmt::Debug + 'static {}

/// Synchronous publish side; inspect callbacks run inside UI handlers and cannot await.
pub trait EventBus<E>: Send + Sync
where
    E: Event,
{
    /// Publishes `event` and returns how many subscribers received it.
    fn publish(&self, event: E) -> Result<usize, SoulError>;
    fn subscribe(&self) -> broadcast::Receiver<E>;
}

/// Broadcast-backed bus. Publishing without subscribers is not an error.
pub struct InMemoryBus<E>
where
    E: Event,
{
    sender: broadcast::Sender<E>,
}

impl<E> InMemoryBus<E>
where
    E: Event,
{
    pub fn new(capacity: usize) -> Arc<Self> {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Arc::new(Self { sender })
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl<E> EventBus<E> for InMemoryBus<E>
where
    E: Event,
{
    fn publish(&self, event: E) -> Result<usize, SoulError> {
        if self.sender.receiver_count() == 0 {
            debug!("event dropped; no subscribers");
            return Ok(0);
        }
        self.sender
            .send(event)
            .map_err(|err| SoulError::new(err.to_string()))
    }

    fn subscribe(&self) -> broadcast::Receiver<E> {
        self.sender.subscribe()
    }
}

/// Bus that keeps every published event in memory, for assertions and CLI reporting.
pub struct RecordingBus<E>
where
    E: Event,
{
    inner: Arc<InMemoryBus<E>>,
    log: Mutex<Vec<E>>,
}

impl<E> RecordingBus<E>
where
    E: Event,
{
    pub fn new(capacity: usize) -> Arc<Self> {
        Arc::new(Self {
            inner: InMemoryBus::new(capacity),
            log: Mutex::new(Vec::new()),
        })
    }

    pub fn events(&self) -> Vec<E> {
        self.log.lock().clone()
    }

    pub fn drain(&self) -> Vec<E> {
        std::mem::take(&mut *self.log.lock())
    }
}

impl<E> EventBus<E> for RecordingBus<E>
where
    E: Event,
{
    fn publish(&self, event: E) -> Result<usize, SoulError> {
        self.log.lock().push(event.clone());
        self.inner.publish(event)
    }

    fn subscribe(&self) -> broadcast::Receiver<E> {
        self.inner.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    enum Ping {
        One,
        Two,
    }

    #[test]
    fn publish_without_subscribers_is_ok() {
        let bus = InMemoryBus::<Ping>::new(4);
        assert_eq!(bus.publish(Ping::One).unwrap(), 0);
    }

    #[tokio::test]
    async fn subscribers_receive_in_order() {
        let bus = InMemoryBus::<Ping>::new(4);
        let mut rx = bus.subscribe();
        bus.publish(Ping::One).unwrap();
        bus.publish(Ping::Two).unwrap();
        assert_eq!(rx.recv().await.unwrap(), Ping::One);
        assert_eq!(rx.recv().await.unwrap(), Ping::Two);
    }

    #[test]
    fn recording_bus_keeps_history() {
        let bus = RecordingBus::<Ping>::new(4);
        bus.publish(Ping::Two).unwrap();
        bus.publish(Ping::One).unwrap();
        assert_eq!(bus.events(), vec![Ping::Two, Ping::One]);
        assert_eq!(bus.drain().len(), 2);
        assert!(bus.events().is_empty());
    }
}
