use tabli_shared::FloorEvent;
use tokio::sync::broadcast;
use tracing::debug;

/// Fan-out of floor events to live staff streams.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<FloorEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publishing with no subscribers is not an error.
    pub fn publish(&self, event: FloorEvent) {
        let name = event.name();
        let restaurant_id = event.restaurant_id;
        let receivers = self.tx.send(event).unwrap_or(0);
        debug!(event = name, restaurant_id, receivers, "Floor event published");
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FloorEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
