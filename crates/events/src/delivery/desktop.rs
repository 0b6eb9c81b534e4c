//! Desktop notification delivery via `notify-send`.
//!
//! [`DesktopNotifier`] shells out to the freedesktop `notify-send` binary
//! to raise a transient desktop notification. A hard timeout is applied;
//! a hung notifier is killed and reported as failed rather than blocking
//! the dispatcher.

use std::time::Duration;

use tokio::process::Command;

use super::{NotificationSink, SinkError};

/// Timeout for a single notifier invocation.
const NOTIFY_TIMEOUT: Duration = Duration::from_secs(10);

/// App name passed to the notification daemon.
const APP_NAME: &str = "toastd";

/// Delivers messages as desktop notifications through `notify-send`.
pub struct DesktopNotifier {
    binary: String,
}

impl DesktopNotifier {
    /// Create a notifier using the `notify-send` binary on `PATH`.
    pub fn new() -> Self {
        Self::with_binary("notify-send")
    }

    /// Create a notifier using a specific binary.
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for DesktopNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl NotificationSink for DesktopNotifier {
    async fn notify(&self, message: &str) -> Result<(), SinkError> {
        tracing::debug!(binary = %self.binary, %message, "Raising desktop notification");

        let result = tokio::time::timeout(
            NOTIFY_TIMEOUT,
            Command::new(&self.binary)
                .args(["--app-name", APP_NAME, "--", message])
                .output(),
        )
        .await;

        match result {
            Ok(Ok(output)) if output.status.success() => Ok(()),
            Ok(Ok(output)) => Err(SinkError::Exit {
                binary: self.binary.clone(),
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }),
            Ok(Err(e)) => Err(SinkError::Spawn {
                binary: self.binary.clone(),
                source: e,
            }),
            Err(_) => Err(SinkError::Timeout {
                binary: self.binary.clone(),
                timeout_secs: NOTIFY_TIMEOUT.as_secs(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_binary_reports_spawn_error() {
        let notifier = DesktopNotifier::with_binary("definitely-not-a-real-notifier-bin");
        let err = notifier.notify("hello").await.unwrap_err();
        assert!(matches!(err, SinkError::Spawn { .. }));
    }

    #[tokio::test]
    async fn failing_binary_reports_exit_error() {
        // `false` exits 1 without output on any POSIX host.
        let notifier = DesktopNotifier::with_binary("false");
        let err = notifier.notify("hello").await.unwrap_err();
        match err {
            SinkError::Exit { status, .. } => assert_eq!(status, 1),
            other => panic!("expected Exit error, got {other}"),
        }
    }

    #[tokio::test]
    async fn succeeding_binary_is_ok() {
        // `true` accepts and ignores the arguments.
        let notifier = DesktopNotifier::with_binary("true");
        assert!(notifier.notify("hello").await.is_ok());
    }

    #[test]
    fn sink_error_display() {
        let err = SinkError::Timeout {
            binary: "notify-send".to_string(),
            timeout_secs: 10,
        };
        assert_eq!(err.to_string(), "Notifier 'notify-send' timed out after 10s");
    }
}
