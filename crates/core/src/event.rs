//! Typed events describing observed host state changes.
//!
//! An [`Event`] is created by a probe when the observed OS state changes,
//! evaluated against the configured rules, and then discarded. Events are
//! immutable once constructed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The kind of host state an event describes.
///
/// Subscriptions and rules are keyed by kind: a registration covers exactly
/// one kind, and a rule only ever matches events of its own kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Battery charge level observations.
    BatteryLevel,
    /// Network connectivity observations.
    Connectivity,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EventKind::BatteryLevel => "battery_level",
            EventKind::Connectivity => "connectivity",
        };
        f.write_str(name)
    }
}

/// Event-specific data, tagged by kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventPayload {
    /// The battery charge level changed.
    ///
    /// `level` is a percentage in `0..=100`, or `None` when the reading
    /// was missing or unparseable.
    BatteryLevelChanged { level: Option<u8> },

    /// Network connectivity changed. `connected` is the new state.
    ConnectivityChanged { connected: bool },
}

impl EventPayload {
    /// The kind of state this payload describes.
    pub fn kind(&self) -> EventKind {
        match self {
            EventPayload::BatteryLevelChanged { .. } => EventKind::BatteryLevel,
            EventPayload::ConnectivityChanged { .. } => EventKind::Connectivity,
        }
    }
}

/// A single observed host state change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// What changed and the new value.
    pub payload: EventPayload,

    /// When the change was observed (UTC).
    pub observed_at: DateTime<Utc>,
}

impl Event {
    /// Create a battery level event. `None` means the level could not be read.
    pub fn battery(level: Option<u8>) -> Self {
        Self {
            payload: EventPayload::BatteryLevelChanged { level },
            observed_at: Utc::now(),
        }
    }

    /// Create a connectivity event.
    pub fn connectivity(connected: bool) -> Self {
        Self {
            payload: EventPayload::ConnectivityChanged { connected },
            observed_at: Utc::now(),
        }
    }

    /// The kind of state this event describes.
    pub fn kind(&self) -> EventKind {
        self.payload.kind()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
