//! Network connectivity probe.
//!
//! Considers the host connected when any interface other than loopback
//! reports `operstate: up` under `/sys/class/net`, and publishes a
//! [`Event::connectivity`] when that boolean changes.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use toastd_core::Event;
use toastd_events::EventBus;

/// Default sysfs location for network interfaces.
pub const DEFAULT_SYSFS_ROOT: &str = "/sys/class/net";

/// Interval-driven connectivity reader.
pub struct ConnectivityProbe {
    sysfs_root: PathBuf,
    interval: Duration,
}

impl ConnectivityProbe {
    /// Probe the standard sysfs tree every `interval`.
    pub fn new(interval: Duration) -> Self {
        Self::with_sysfs_root(DEFAULT_SYSFS_ROOT, interval)
    }

    /// Probe a specific sysfs root (tests use a temp directory).
    pub fn with_sysfs_root(root: impl Into<PathBuf>, interval: Duration) -> Self {
        Self {
            sysfs_root: root.into(),
            interval,
        }
    }

    /// Poll until `shutdown` is cancelled, publishing connectivity changes.
    pub async fn run(self, bus: Arc<EventBus>, shutdown: CancellationToken) {
        let mut ticker = tokio::time::interval(self.interval);
        let mut last: Option<bool> = None;

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::debug!("Connectivity probe shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    match read_connectivity(&self.sysfs_root) {
                        Ok(connected) => {
                            if last != Some(connected) {
                                tracing::debug!(connected, "Connectivity changed");
                                bus.publish(Event::connectivity(connected));
                                last = Some(connected);
                            }
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, "Connectivity read failed, skipping tick");
                        }
                    }
                }
            }
        }
    }
}

/// Whether any non-loopback interface under `root` is operationally up.
pub fn read_connectivity(root: &Path) -> io::Result<bool> {
    for entry in std::fs::read_dir(root)? {
        let entry = entry?;
        if entry.file_name() == "lo" {
            continue;
        }
        let operstate_path = entry.path().join("operstate");
        if !operstate_path.is_file() {
            continue;
        }
        let contents = std::fs::read_to_string(&operstate_path)?;
        if parse_operstate(&contents) {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Parse a sysfs `operstate` reading. Anything but `up` (including
/// `unknown` and garbage) counts as not connected.
pub fn parse_operstate(contents: &str) -> bool {
    contents.trim() == "up"
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
