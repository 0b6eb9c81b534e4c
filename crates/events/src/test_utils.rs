//! In-memory doubles for tests.
//!
//! Available to downstream crates via the `test-utils` feature.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use toastd_core::Event;

use crate::delivery::{NotificationSink, SinkError};
use crate::source::EventHandler;

/// A [`NotificationSink`] that records every delivered message.
///
/// In failing mode it rejects every delivery while still counting the
/// attempt, for exercising the swallow-and-continue path.
#[derive(Debug, Default)]
pub struct RecordingSink {
    messages: Mutex<Vec<String>>,
    attempts: AtomicUsize,
    fail: bool,
}

impl RecordingSink {
    /// A sink that accepts and records every message.
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that fails every delivery.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Messages delivered so far, in delivery order.
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().expect("sink mutex poisoned").clone()
    }

    /// Number of delivery attempts, including failed ones.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl NotificationSink for RecordingSink {
    async fn notify(&self, message: &str) -> Result<(), SinkError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(SinkError::Exit {
                binary: "recording-sink".to_string(),
                status: 1,
                stderr: "simulated failure".to_string(),
            });
        }
        self.messages
            .lock()
            .expect("sink mutex poisoned")
            .push(message.to_string());
        Ok(())
    }
}

/// An [`EventHandler`] that records every delivered event.
#[derive(Debug, Default)]
pub struct RecordingHandler {
    events: Mutex<Vec<Event>>,
}

impl RecordingHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events delivered so far, in delivery order.
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().expect("handler mutex poisoned").clone()
    }
}

#[async_trait::async_trait]
impl EventHandler for RecordingHandler {
    async fn handle(&self, event: Event) {
        self.events
            .lock()
            .expect("handler mutex poisoned")
            .push(event);
    }
}
