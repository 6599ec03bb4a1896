use tokio::sync::broadcast;

/// Fan-out bus: every subscriber sees every event published after it
/// subscribed. Slow subscribers lag rather than block the publisher.
pub struct EventBus<E> {
    sender: broadcast::Sender<E>,
}

impl<E: Clone> EventBus<E> {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<E> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: E) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl<E> Clone for EventBus<E> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Refreshed,
        StatusChanged { user_id: String, status: String },
        Shutdown,
    }

    #[tokio::test]
    async fn publish_and_receive() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        bus.publish(Event::Refreshed);

        let event = rx.recv().await.unwrap();
        assert_eq!(event, Event::Refreshed);
    }

    #[tokio::test]
    async fn multiple_subscribers() {
        let bus = EventBus::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(Event::Shutdown);

        assert_eq!(rx1.recv().await.unwrap(), Event::Shutdown);
        assert_eq!(rx2.recv().await.unwrap(), Event::Shutdown);
    }

    #[tokio::test]
    async fn events_arrive_in_publish_order() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        bus.publish(Event::StatusChanged {
            user_id: "alice".into(),
            status: "idle".into(),
        });
        bus.publish(Event::Refreshed);

        let e1 = rx.recv().await.unwrap();
        assert!(matches!(e1, Event::StatusChanged { ref user_id, .. } if user_id == "alice"));
        assert_eq!(rx.recv().await.unwrap(), Event::Refreshed);
    }

    #[test]
    fn publish_returns_zero_with_no_subscribers() {
        let bus = EventBus::new(16);
        assert_eq!(bus.publish(Event::Shutdown), 0);
    }

    #[tokio::test]
    async fn clones_share_subscribers() {
        let bus = EventBus::new(16);
        let _rx1 = bus.subscribe();
        let _rx2 = bus.subscribe();

        let clone = bus.clone();
        assert_eq!(clone.subscriber_count(), 2);
        assert_eq!(clone.publish(Event::Refreshed), 2);
    }
}
