//! Battery level probe.
//!
//! Reads the charge percentage from `/sys/class/power_supply/*/capacity`
//! and publishes a [`Event::battery`] when it changes. A missing battery
//! or unreadable value is reported as `None` (rules never fire on an
//! unknown level); a failed directory read skips the tick.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use toastd_core::Event;
use toastd_events::EventBus;

/// Default sysfs location for power supplies.
pub const DEFAULT_SYSFS_ROOT: &str = "/sys/class/power_supply";

/// Interval-driven battery level reader.
pub struct BatteryProbe {
    sysfs_root: PathBuf,
    interval: Duration,
}

impl BatteryProbe {
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

    /// Poll until `shutdown` is cancelled, publishing level changes.
    pub async fn run(self, bus: Arc<EventBus>, shutdown: CancellationToken) {
        let mut ticker = tokio::time::interval(self.interval);
        let mut last: Option<Option<u8>> = None;

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::debug!("Battery probe shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    match read_battery_level(&self.sysfs_root) {
                        Ok(level) => {
                            if last != Some(level) {
                                tracing::debug!(?level, "Battery level changed");
                                bus.publish(Event::battery(level));
                                last = Some(level);
                            }
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, "Battery read failed, skipping tick");
                        }
                    }
                }
            }
        }
    }
}

/// Read the battery charge percentage from a sysfs tree.
///
/// Scans the supplies under `root` for one carrying a `capacity` file
/// (AC adapters have none). Returns `Ok(None)` when no battery is
/// present or its reading does not parse.
pub fn read_battery_level(root: &Path) -> io::Result<Option<u8>> {
    for entry in std::fs::read_dir(root)? {
        let capacity_path = entry?.path().join("capacity");
        if !capacity_path.is_file() {
            continue;
        }
        let contents = std::fs::read_to_string(&capacity_path)?;
        return Ok(parse_capacity(&contents));
    }
    Ok(None)
}

/// Parse a sysfs `capacity` reading, clamped to 100.
pub fn parse_capacity(contents: &str) -> Option<u8> {
    contents.trim().parse::<u8>().ok().map(|pct| pct.min(100))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_capacity_accepts_sysfs_readings() {
        assert_eq!(parse_capacity("85\n"), Some(85));
        assert_eq!(parse_capacity("0"), Some(0));
        assert_eq!(parse_capacity(" 100 "), Some(100));
    }

    #[test]
    fn parse_capacity_clamps_above_100() {
        // Some firmwares briefly report >100 while calibrating.
        assert_eq!(parse_capacity("103"), Some(100));
    }

    #[test]
    fn parse_capacity_rejects_garbage() {
        assert_eq!(parse_capacity(""), None);
        assert_eq!(parse_capacity("unknown"), None);
        assert_eq!(parse_capacity("-5"), None);
        assert_eq!(parse_capacity("1000"), None);
    }

    #[test]
    fn read_level_from_fake_sysfs() {
        let root = tempfile::tempdir().expect("tempdir");
        let bat = root.path().join("BAT0");
        std::fs::create_dir(&bat).expect("mkdir");
        std::fs::write(bat.join("capacity"), "91\n").expect("write");

        assert_eq!(read_battery_level(root.path()).expect("read"), Some(91));
    }

    #[test]
    fn read_level_skips_supplies_without_capacity() {
        let root = tempfile::tempdir().expect("tempdir");
        // AC adapter: no capacity file.
        std::fs::create_dir(root.path().join("AC")).expect("mkdir");
        let bat = root.path().join("BAT0");
        std::fs::create_dir(&bat).expect("mkdir");
        std::fs::write(bat.join("capacity"), "50").expect("write");

        assert_eq!(read_battery_level(root.path()).expect("read"), Some(50));
    }

    #[test]
    fn read_level_without_battery_is_none() {
        let root = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir(root.path().join("AC")).expect("mkdir");

        assert_eq!(read_battery_level(root.path()).expect("read"), None);
    }

    #[test]
    fn read_level_with_garbage_reading_is_none() {
        let root = tempfile::tempdir().expect("tempdir");
        let bat = root.path().join("BAT0");
        std::fs::create_dir(&bat).expect("mkdir");
        std::fs::write(bat.join("capacity"), "unknown\n").expect("write");

        assert_eq!(read_battery_level(root.path()).expect("read"), None);
    }

    #[test]
    fn read_level_missing_root_is_err() {
        let root = tempfile::tempdir().expect("tempdir");
        let missing = root.path().join("nope");
        assert!(read_battery_level(&missing).is_err());
    }
}
