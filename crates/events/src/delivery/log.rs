//! Structured-log notification delivery.
//!
//! [`LogNotifier`] writes each message to the tracing output instead of a
//! desktop surface. Used on headless hosts where no notification daemon
//! is available.

use super::{NotificationSink, SinkError};

/// Delivers messages as structured log lines. Never fails.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl NotificationSink for LogNotifier {
    async fn notify(&self, message: &str) -> Result<(), SinkError> {
        tracing::info!(%message, "Notification");
        Ok(())
    }
}
