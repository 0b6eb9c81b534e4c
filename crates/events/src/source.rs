//! Kind-filtered event subscriptions.
//!
//! [`EventSource`] abstracts "deliver events of one kind to a handler"
//! over the raw [`EventBus`](crate::bus::EventBus) broadcast channel.
//! Each subscription spawns a listener task that forwards matching events
//! to its [`EventHandler`] in receive order, and hands back a
//! [`Registration`] whose release is idempotent and also happens on Drop.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use toastd_core::{Event, EventKind};

use crate::bus::EventBus;

/// Receives events of a single kind from an [`EventSource`] subscription.
#[async_trait::async_trait]
pub trait EventHandler: Send + Sync {
    /// Handle one delivered event.
    ///
    /// Called sequentially per registration, in receive order. Must not
    /// panic on malformed payloads; there is no error channel back to the
    /// source.
    async fn handle(&self, event: Event);
}

/// A source of typed events that supports kind-filtered subscription.
pub trait EventSource: Send + Sync {
    /// Register `handler` for all future events of `kind`.
    ///
    /// Delivery is asynchronous: events published after this call are
    /// forwarded to the handler on a background task. Events of other
    /// kinds are never delivered. The subscription lasts until the
    /// returned [`Registration`] is released (or dropped).
    fn subscribe(&self, kind: EventKind, handler: Arc<dyn EventHandler>) -> Registration;
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

/// Handle to an active subscription.
///
/// [`release`](Registration::release) is idempotent: releasing twice, or
/// releasing an already-released handle, is a no-op, never an error. The
/// handle also releases on Drop, so a registration owned by a struct is
/// torn down on every exit path.
#[derive(Debug)]
pub struct Registration {
    kind: EventKind,
    cancel: CancellationToken,
}

impl Registration {
    /// The event kind this registration covers.
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// Stop delivery to the handler. Idempotent.
    pub fn release(&self) {
        self.cancel.cancel();
    }

    /// Whether this registration has been released.
    pub fn is_released(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

// ---------------------------------------------------------------------------
// EventSource for EventBus
// ---------------------------------------------------------------------------

impl EventSource for EventBus {
    fn subscribe(&self, kind: EventKind, handler: Arc<dyn EventHandler>) -> Registration {
        // Create the receiver before spawning so no event published after
        // this call returns can be missed.
        let receiver = EventBus::subscribe(self);
        let cancel = CancellationToken::new();

        tokio::spawn(listen(kind, receiver, handler, cancel.clone()));

        Registration { kind, cancel }
    }
}

/// Listener loop for one registration.
///
/// Awaits the handler per event, which preserves FIFO order within the
/// kind. Distinct kinds run on independent tasks with no cross-ordering.
async fn listen(
    kind: EventKind,
    mut receiver: broadcast::Receiver<Event>,
    handler: Arc<dyn EventHandler>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            // Cancellation wins over a buffered event: a released
            // registration delivers nothing further.
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!(%kind, "Registration released, listener exiting");
                break;
            }
            result = receiver.recv() => match result {
                Ok(event) => {
                    if event.kind() == kind {
                        handler.handle(event).await;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(%kind, skipped = n, "Listener lagged, some events were dropped");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::debug!(%kind, "Event bus closed, listener exiting");
                    break;
                }
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::test_utils::RecordingHandler;

    /// Poll until `handler` has recorded `expected` events or two seconds
    /// elapse. Delivery happens on a spawned task, so tests wait for it.
    async fn wait_for_count(handler: &RecordingHandler, expected: usize) {
        for _ in 0..200 {
            if handler.events().len() >= expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    #[tokio::test]
    async fn delivers_matching_kind_only() {
        let bus = Arc::new(EventBus::default());
        let handler = Arc::new(RecordingHandler::new());
        let source: &dyn EventSource = bus.as_ref();

        let _reg = source.subscribe(EventKind::BatteryLevel, handler.clone());

        bus.publish(Event::connectivity(true));
        bus.publish(Event::battery(Some(42)));

        wait_for_count(&handler, 1).await;
        let events = handler.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind(), EventKind::BatteryLevel);
    }

    #[tokio::test]
    async fn preserves_fifo_order_within_kind() {
        let bus = Arc::new(EventBus::default());
        let handler = Arc::new(RecordingHandler::new());
        let source: &dyn EventSource = bus.as_ref();

        let _reg = source.subscribe(EventKind::BatteryLevel, handler.clone());

        for level in [10u8, 20, 30, 40] {
            bus.publish(Event::battery(Some(level)));
        }

        wait_for_count(&handler, 4).await;
        let levels: Vec<_> = handler
            .events()
            .iter()
            .map(|e| match e.payload {
                toastd_core::EventPayload::BatteryLevelChanged { level } => level,
                _ => panic!("unexpected payload"),
            })
            .collect();
        assert_eq!(levels, vec![Some(10), Some(20), Some(30), Some(40)]);
    }

    #[tokio::test]
    async fn release_is_idempotent() {
        let bus = Arc::new(EventBus::default());
        let handler = Arc::new(RecordingHandler::new());
        let source: &dyn EventSource = bus.as_ref();

        let reg = source.subscribe(EventKind::Connectivity, handler);
        assert!(!reg.is_released());

        reg.release();
        assert!(reg.is_released());

        // Releasing again is a no-op, not an error.
        reg.release();
        assert!(reg.is_released());
    }

    #[tokio::test]
    async fn released_registration_delivers_nothing() {
        let bus = Arc::new(EventBus::default());
        let handler = Arc::new(RecordingHandler::new());
        let source: &dyn EventSource = bus.as_ref();

        let reg = source.subscribe(EventKind::BatteryLevel, handler.clone());
        reg.release();

        bus.publish(Event::battery(Some(95)));

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handler.events().is_empty());
    }

    #[tokio::test]
    async fn drop_releases_registration() {
        let bus = Arc::new(EventBus::default());
        let handler = Arc::new(RecordingHandler::new());
        let source: &dyn EventSource = bus.as_ref();

        {
            let _reg = source.subscribe(EventKind::BatteryLevel, handler.clone());
        }

        bus.publish(Event::battery(Some(95)));

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handler.events().is_empty());
    }
}
