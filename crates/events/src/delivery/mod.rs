//! Notification delivery sinks.
//!
//! A [`NotificationSink`] presents a transient, best-effort user-visible
//! message. Callers (the dispatcher) log and swallow failures; a sink
//! error never interrupts event processing.

pub mod desktop;
pub mod log;

/// Error type for notification delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// The notifier subprocess could not be started.
    #[error("Failed to run notifier '{binary}': {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    /// The notifier subprocess exited with a non-zero status.
    #[error("Notifier '{binary}' failed (exit {status}): {stderr}")]
    Exit {
        binary: String,
        status: i32,
        stderr: String,
    },

    /// The notifier subprocess did not complete within the timeout.
    #[error("Notifier '{binary}' timed out after {timeout_secs}s")]
    Timeout { binary: String, timeout_secs: u64 },
}

/// Presents a transient user-visible message.
#[async_trait::async_trait]
pub trait NotificationSink: Send + Sync {
    /// Deliver `message`. Best-effort: no retry is expected of callers.
    async fn notify(&self, message: &str) -> Result<(), SinkError>;
}
