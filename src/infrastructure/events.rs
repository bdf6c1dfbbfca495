use tokio::sync::broadcast;

use crate::domain::sales_target::{EventPublisher, SalesTargetEvent};

/// Fans sales target events out to any number of subscribers
///
/// Slow subscribers lose the oldest events rather than blocking writers.
pub struct BroadcastEventPublisher {
    sender: broadcast::Sender<SalesTargetEvent>,
}

impl BroadcastEventPublisher {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SalesTargetEvent> {
        self.sender.subscribe()
    }
}

impl Default for BroadcastEventPublisher {
    fn default() -> Self {
        Self::new(64)
    }
}

impl EventPublisher for BroadcastEventPublisher {
    fn publish(&self, event: SalesTargetEvent) {
        tracing::debug!(
            target_id = %event.target_id(),
            paths = ?event.revalidate_paths(),
            "Revalidating pages"
        );
        // No receivers is fine; nobody is rendering
        let _ = self.sender.send(event);
    }
}
